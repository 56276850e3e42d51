use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 5;

/// 預設取樣間隔（秒）
pub const DEFAULT_INTERVAL_SECONDS: u64 = 10;

/// 預設 JPEG 品質（1-31，數字越小品質越高）
pub const DEFAULT_JPEG_QUALITY: u8 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeTable {
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
}

impl FileTypeTable {
    #[must_use]
    pub fn video_extensions_set(&self) -> HashSet<String> {
        self.video_file
            .iter()
            .map(|ext| ext.to_lowercase())
            .collect()
    }

    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        let video_extensions = self.video_extensions_set();
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| video_extensions.contains(&format!(".{}", ext.to_lowercase())))
    }
}

/// 使用者設定（settings.json）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// 縮圖取樣間隔（秒），必須為正數
    pub interval_seconds: u64,
    /// 字幕軌中圖片 URL 的前綴
    pub base_url: String,
    /// ffmpeg 的 -q:v 品質參數
    pub jpeg_quality: u8,
    /// ffmpeg 執行檔位置；未設定時依 PATH 尋找
    pub ffmpeg_path: Option<PathBuf>,
    /// 最近使用的輸入/輸出路徑，作為提示的預設值
    pub recent_paths: Vec<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            base_url: "http://localhost:3000".to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            ffmpeg_path: None,
            recent_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file_type_table: FileTypeTable,
    pub settings: UserSettings,
}
