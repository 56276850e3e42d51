use super::frame_sampler::ThumbnailSet;
use crate::error::PreviewError;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// 字幕軌的固定檔名，寫在縮圖資料夾內
pub const SIDECAR_FILE_NAME: &str = "thumbnails.vtt";

const VTT_HEADER: &str = "WEBVTT";

/// 一筆時間範圍對圖片 URL 的對應
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub start_ms: u64,
    pub end_ms: u64,
    pub image_url: String,
}

/// 由縮圖集合導出 cue 列表
///
/// 第 i 張縮圖對應 `[i * interval, (i + 1) * interval)`，
/// 因此 cue 嚴格遞增、不重疊、頭尾相接。
/// 檔名會做百分比編碼後接在 `base_url` 之後；`base_url` 本身不再編碼
pub fn build_cues(
    thumbnails: &ThumbnailSet,
    interval_seconds: u64,
    base_url: &str,
) -> Result<Vec<Cue>, PreviewError> {
    if thumbnails.is_empty() {
        return Err(PreviewError::EmptyThumbnailSet);
    }

    let base = base_url.trim_end_matches('/');
    let interval_ms = interval_seconds * 1000;

    Ok(thumbnails
        .entries
        .iter()
        .map(|entry| {
            let index = entry.index as u64;
            Cue {
                start_ms: index * interval_ms,
                end_ms: (index + 1) * interval_ms,
                image_url: format!("{base}/{}", urlencoding::encode(&entry.file_name)),
            }
        })
        .collect())
}

/// 將 cue 列表序列化為 WebVTT 文字
///
/// 格式：`WEBVTT` 標頭、空行，之後每個 cue 一個區塊
/// （時間範圍一行、圖片 URL 一行），區塊之間以空行分隔
#[must_use]
pub fn render_sidecar(cues: &[Cue]) -> String {
    let mut content = String::new();
    content.push_str(VTT_HEADER);
    content.push_str("\n\n");

    for cue in cues {
        content.push_str(&format!(
            "{} --> {}\n{}\n\n",
            format_timestamp(cue.start_ms),
            format_timestamp(cue.end_ms),
            cue.image_url
        ));
    }

    content
}

/// 原子性寫入字幕軌：先寫暫存檔再改名，讀取端不會看到半成品
pub fn write_sidecar(output_dir: &Path, content: &str) -> Result<PathBuf, PreviewError> {
    let sidecar_path = output_dir.join(SIDECAR_FILE_NAME);
    let temp_path = output_dir.join(format!("{SIDECAR_FILE_NAME}.tmp"));

    let write_result = fs::write(&temp_path, content)
        .and_then(|()| fs::rename(&temp_path, &sidecar_path));

    if let Err(e) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(PreviewError::SidecarWriteFailed {
            path: sidecar_path,
            source: e,
        });
    }

    info!("字幕軌已建立: {}", sidecar_path.display());

    Ok(sidecar_path)
}

/// 建立字幕軌：導出 cue、序列化、寫入
///
/// 空的縮圖集合直接回報 `EmptyThumbnailSet`，不會留下只有標頭的檔案
pub fn build_sidecar(
    thumbnails: &ThumbnailSet,
    interval_seconds: u64,
    base_url: &str,
    output_dir: &Path,
) -> Result<PathBuf, PreviewError> {
    let cues = build_cues(thumbnails, interval_seconds, base_url)?;
    let content = render_sidecar(&cues);
    write_sidecar(output_dir, &content)
}

/// 將毫秒格式化為 `HH:MM:SS.mmm`
///
/// 間隔運算很容易超過 59 秒，分與時必須正確進位
fn format_timestamp(ms: u64) -> String {
    let h = ms / 3_600_000;
    let m = (ms % 3_600_000) / 60_000;
    let s = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{h:02}:{m:02}:{s:02}.{millis:03}")
}
