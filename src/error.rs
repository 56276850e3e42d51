//! 預覽軌生成管線的錯誤分類
//!
//! 每種錯誤對單次執行都是終止性的，管線內部不重試

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    /// 來源影片不存在或不是檔案（在呼叫擷取引擎前檢查）
    #[error("找不到來源影片: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// 擷取引擎回報非零結束狀態，或引擎周邊的 I/O 失敗
    ///
    /// `message` 保留引擎的診斷輸出，僅供日誌使用
    #[error("影格擷取程序失敗: {message}")]
    ExtractionProcessFailed { message: String },

    /// 引擎回報成功但輸出資料夾沒有任何縮圖
    /// （影片比一個取樣間隔還短，或編碼格式不相容）
    #[error("未擷取到任何縮圖: {}", output_dir.display())]
    NoFramesExtracted { output_dir: PathBuf },

    /// 以空的縮圖列表呼叫 Sidecar Builder 是呼叫端錯誤
    #[error("縮圖列表為空，無法建立字幕軌")]
    EmptyThumbnailSet,

    /// 字幕軌寫入失敗，不會留下寫到一半的檔案
    #[error("字幕軌寫入失敗: {}", path.display())]
    SidecarWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
