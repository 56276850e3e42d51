//! 縮圖預覽軌生成元件
//!
//! 兩階段管線：
//! A. 影格取樣（ffmpeg，每 N 秒一張縮圖）
//! B. 建立 WebVTT 字幕軌（時間範圍對應圖片 URL）

mod extraction_engine;
mod frame_sampler;
mod main;
mod pipeline;
mod sidecar_builder;

pub use extraction_engine::{
    ExitReport, ExtractionEngine, ExtractionHandle, ExtractionRequest, FfmpegEngine,
};
pub use frame_sampler::{
    FRAME_NAME_PATTERN, FrameSampler, ThumbnailEntry, ThumbnailSet, frame_file_name,
};
pub use main::{GenerationResult, PreviewTrackGenerator};
pub use pipeline::{PreviewTrack, generate_preview_track};
pub use sidecar_builder::{
    Cue, SIDECAR_FILE_NAME, build_cues, build_sidecar, render_sidecar, write_sidecar,
};
