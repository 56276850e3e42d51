use super::frame_sampler::{FrameSampler, ThumbnailSet};
use super::sidecar_builder::build_sidecar;
use crate::error::PreviewError;
use std::path::{Path, PathBuf};

/// 一次管線執行的產出：縮圖集合加上字幕軌
#[derive(Debug)]
pub struct PreviewTrack {
    /// 影片的邏輯名稱（不含副檔名），是產物的命名空間
    pub video_name: String,
    pub thumbnails: ThumbnailSet,
    pub sidecar_path: PathBuf,
}

/// 兩階段管線：取樣 → 建軌
///
/// Sidecar Builder 只會在 Frame Sampler 回傳非空集合後執行；
/// 任一階段失敗即整次失敗，不會產生部分成功的狀態。
/// 並行執行時呼叫端需為每次執行指定獨立的輸出資料夾
pub fn generate_preview_track(
    sampler: &FrameSampler,
    source_path: &Path,
    output_dir: &Path,
    interval_seconds: u64,
    base_url: &str,
) -> Result<PreviewTrack, PreviewError> {
    let video_name = source_path
        .file_stem()
        .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().to_string());

    let thumbnails = sampler.sample(source_path, output_dir, interval_seconds)?;

    // URL 的影片名稱段落做百分比編碼，`/thumbnails/` 分隔符維持原樣
    let url_prefix = format!(
        "{}/{}/thumbnails",
        base_url.trim_end_matches('/'),
        urlencoding::encode(&video_name)
    );
    let sidecar_path = build_sidecar(&thumbnails, interval_seconds, &url_prefix, output_dir)?;

    Ok(PreviewTrack {
        video_name,
        thumbnails,
        sidecar_path,
    })
}
