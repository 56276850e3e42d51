use crate::error::PreviewError;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// 一次影格擷取的參數
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub source: PathBuf,
    /// 輸出樣板，含零填充的流水號佔位（例如 `thumb_%03d.jpg`）
    pub output_pattern: PathBuf,
    /// 取樣間隔（秒），每 N 秒輸出一張影格
    pub interval_seconds: u64,
    /// ffmpeg 的 -q:v 品質參數
    pub quality: u8,
}

/// 擷取程序的結束狀態
///
/// `detail` 保留引擎的 stderr 診斷輸出，僅供日誌使用
#[derive(Debug)]
pub struct ExitReport {
    pub success: bool,
    pub detail: String,
}

/// 進行中的擷取程序
pub trait ExtractionHandle {
    /// 阻塞等待程序結束
    fn wait(self: Box<Self>) -> Result<ExitReport, PreviewError>;
}

/// 影格擷取引擎
///
/// 以動態分派抽象外部程序，測試可代換為不啟動程序的假引擎
pub trait ExtractionEngine {
    fn start_extraction(
        &self,
        request: &ExtractionRequest,
    ) -> Result<Box<dyn ExtractionHandle>, PreviewError>;
}

/// 以 ffmpeg 實作的擷取引擎
pub struct FfmpegEngine {
    binary: PathBuf,
}

impl FfmpegEngine {
    /// 建立引擎；`binary` 未指定時使用 `ffmpeg`，交由 PATH 尋找
    #[must_use]
    pub fn new(binary: Option<PathBuf>) -> Self {
        Self {
            binary: binary.unwrap_or_else(|| PathBuf::from("ffmpeg")),
        }
    }

    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn build_command(&self, request: &ExtractionRequest) -> Command {
        let args = vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-i".to_string(),
            request.source.to_string_lossy().to_string(),
            "-vf".to_string(),
            format!("fps=1/{}", request.interval_seconds),
            "-q:v".to_string(),
            request.quality.to_string(),
            "-y".to_string(),
            request.output_pattern.to_string_lossy().to_string(),
        ];

        let mut cmd = Command::new(&self.binary);
        cmd.args(&args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());

        cmd
    }
}

impl ExtractionEngine for FfmpegEngine {
    fn start_extraction(
        &self,
        request: &ExtractionRequest,
    ) -> Result<Box<dyn ExtractionHandle>, PreviewError> {
        let mut cmd = self.build_command(request);
        debug!(
            "啟動擷取程序: {} {:?}",
            self.binary.display(),
            cmd.get_args().collect::<Vec<_>>()
        );

        let child = cmd
            .spawn()
            .map_err(|e| PreviewError::ExtractionProcessFailed {
                message: format!("無法執行 {}: {e}", self.binary.display()),
            })?;

        Ok(Box::new(FfmpegHandle { child }))
    }
}

struct FfmpegHandle {
    child: Child,
}

impl ExtractionHandle for FfmpegHandle {
    fn wait(self: Box<Self>) -> Result<ExitReport, PreviewError> {
        let output =
            self.child
                .wait_with_output()
                .map_err(|e| PreviewError::ExtractionProcessFailed {
                    message: format!("等待擷取程序失敗: {e}"),
                })?;

        Ok(ExitReport {
            success: output.status.success(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
