use crate::config::types::{Config, DEFAULT_INTERVAL_SECONDS, FileTypeTable, UserSettings};
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::Path;

/// 編譯時嵌入的影片副檔名表（不需要外部檔案）
const FILE_TYPE_TABLE_JSON: &str = include_str!("../data/file_type_table.json");

impl Config {
    pub fn new() -> Result<Self> {
        let file_type_table = Self::load_embedded_file_type_table()?;
        let settings = Self::load_settings().unwrap_or_else(|e| {
            warn!("無法載入 settings.json，使用預設值: {e}");
            UserSettings::default()
        });

        Ok(Self {
            file_type_table,
            settings: sanitize_settings(settings),
        })
    }

    fn load_settings() -> Result<UserSettings> {
        let path = Path::new("settings.json");
        if !path.exists() {
            return Ok(UserSettings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    /// 從編譯時嵌入的 JSON 載入影片副檔名表
    fn load_embedded_file_type_table() -> Result<FileTypeTable> {
        serde_json::from_str(FILE_TYPE_TABLE_JSON).context("無法解析嵌入的檔案類型設定")
    }
}

/// 修正不合法的設定值
///
/// 取樣間隔必須為正數，否則時間窗計算沒有意義
fn sanitize_settings(mut settings: UserSettings) -> UserSettings {
    if settings.interval_seconds == 0 {
        warn!("interval_seconds 不可為 0，改用預設值 {DEFAULT_INTERVAL_SECONDS}");
        settings.interval_seconds = DEFAULT_INTERVAL_SECONDS;
    }
    settings
}
