use super::extraction_engine::{ExtractionEngine, ExtractionRequest};
use crate::error::PreviewError;
use log::{debug, error, warn};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// 縮圖檔名樣板，流水號由 ffmpeg 從 001 起遞增
pub const FRAME_NAME_PATTERN: &str = "thumb_%03d.jpg";

static REGEX_FRAME_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^thumb_(\d+)\.jpg$").expect("Invalid regex"));

/// 一張已擷取的縮圖
///
/// `index` 是 0 起算的連續序號，對應時間窗
/// `[index * interval, (index + 1) * interval)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailEntry {
    pub index: usize,
    pub file_name: String,
}

/// 一次取樣產出的縮圖集合，序號連續且依擷取順序排列
#[derive(Debug, Clone)]
pub struct ThumbnailSet {
    pub entries: Vec<ThumbnailEntry>,
}

impl ThumbnailSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 影格取樣器
///
/// 驅動外部擷取引擎，每 interval 秒取一張縮圖寫入輸出資料夾，
/// 完成後重新讀取資料夾驗證產出
pub struct FrameSampler {
    engine: Box<dyn ExtractionEngine>,
    quality: u8,
}

impl FrameSampler {
    #[must_use]
    pub fn new(engine: Box<dyn ExtractionEngine>, quality: u8) -> Self {
        Self { engine, quality }
    }

    /// 對單一影片取樣
    ///
    /// 失敗模式：
    /// - `SourceNotFound`：來源不存在（引擎不會被呼叫）
    /// - `ExtractionProcessFailed`：引擎非零結束或周邊 I/O 失敗
    /// - `NoFramesExtracted`：引擎回報成功但沒有任何縮圖
    ///   （影片比一個取樣間隔短，或編碼格式不相容）
    pub fn sample(
        &self,
        source_path: &Path,
        output_dir: &Path,
        interval_seconds: u64,
    ) -> Result<ThumbnailSet, PreviewError> {
        if !source_path.is_file() {
            return Err(PreviewError::SourceNotFound {
                path: source_path.to_path_buf(),
            });
        }

        fs::create_dir_all(output_dir).map_err(|e| PreviewError::ExtractionProcessFailed {
            message: format!("無法建立輸出資料夾 {}: {e}", output_dir.display()),
        })?;

        // 重複使用的資料夾可能殘留上次的縮圖，先清掉同名樣式的檔案，
        // 避免新舊混在同一個集合裡
        clear_stale_frames(output_dir);

        let request = ExtractionRequest {
            source: source_path.to_path_buf(),
            output_pattern: output_dir.join(FRAME_NAME_PATTERN),
            interval_seconds,
            quality: self.quality,
        };

        debug!(
            "開始取樣: {} -> {}（每 {} 秒一張）",
            source_path.display(),
            output_dir.display(),
            interval_seconds
        );

        let handle = self.engine.start_extraction(&request)?;
        let report = handle.wait()?;

        if !report.success {
            error!("擷取引擎失敗: {}", report.detail);
            return Err(PreviewError::ExtractionProcessFailed {
                message: report.detail,
            });
        }

        let entries = list_extracted_frames(output_dir)?;
        if entries.is_empty() {
            return Err(PreviewError::NoFramesExtracted {
                output_dir: output_dir.to_path_buf(),
            });
        }

        debug!("取樣完成，共 {} 張縮圖", entries.len());

        Ok(ThumbnailSet { entries })
    }
}

/// 刪除輸出資料夾中符合縮圖命名樣式的舊檔案
fn clear_stale_frames(output_dir: &Path) {
    let Ok(read_dir) = fs::read_dir(output_dir) else {
        return;
    };

    for entry in read_dir.filter_map(Result::ok) {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if REGEX_FRAME_NAME.is_match(name) && fs::remove_file(entry.path()).is_err() {
            warn!("無法清除舊縮圖: {}", entry.path().display());
        }
    }
}

/// 列出輸出資料夾中的縮圖，依檔名流水號排序後編上連續序號
///
/// 明確以數字排序，不依賴目錄列舉順序
fn list_extracted_frames(output_dir: &Path) -> Result<Vec<ThumbnailEntry>, PreviewError> {
    let read_dir =
        fs::read_dir(output_dir).map_err(|e| PreviewError::ExtractionProcessFailed {
            message: format!("無法讀取輸出資料夾 {}: {e}", output_dir.display()),
        })?;

    let mut frames: Vec<(u32, String)> = read_dir
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let captures = REGEX_FRAME_NAME.captures(&name)?;
            let sequence: u32 = captures.get(1)?.as_str().parse().ok()?;
            Some((sequence, name))
        })
        .collect();

    frames.sort_by_key(|(sequence, _)| *sequence);

    Ok(frames
        .into_iter()
        .enumerate()
        .map(|(index, (_, file_name))| ThumbnailEntry { index, file_name })
        .collect())
}

/// 依樣板產生第 n 張縮圖的檔名（n 從 1 起算，與 ffmpeg 相同）
#[must_use]
pub fn frame_file_name(sequence: u32) -> String {
    format!("thumb_{sequence:03}.jpg")
}
