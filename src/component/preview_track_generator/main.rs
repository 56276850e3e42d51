use super::extraction_engine::FfmpegEngine;
use super::frame_sampler::FrameSampler;
use super::pipeline::{PreviewTrack, generate_preview_track};
use super::sidecar_builder::SIDECAR_FILE_NAME;
use crate::config::{Config, add_recent_path, save_settings};
use crate::error::PreviewError;
use crate::tools::{
    ensure_directory_exists, get_video_info, scan_video_files, validate_directory_exists,
};
use anyhow::Result;
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 預覽軌生成結果
#[derive(Debug)]
pub struct GenerationResult {
    pub total_videos: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// 縮圖預覽軌生成器
///
/// 三階段流程：
/// A. 取得影片資訊（ffprobe，僅供顯示）
/// B. 擷取縮圖（ffmpeg，每 N 秒一張）
/// C. 建立 WebVTT 字幕軌
pub struct PreviewTrackGenerator {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl PreviewTrackGenerator {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        println!("{}", style("=== 縮圖預覽軌生成 ===").cyan().bold());

        let input_path = self.prompt_source_path()?;
        let source = PathBuf::from(&input_path);

        let output_path = self.prompt_output_path()?;
        let output_root = PathBuf::from(&output_path);
        ensure_directory_exists(&output_root)?;

        let settings = &self.config.settings;
        println!(
            "{}",
            style(format!(
                "取樣間隔: {} 秒，URL 前綴: {}",
                settings.interval_seconds, settings.base_url
            ))
            .dim()
        );

        let engine = FfmpegEngine::new(settings.ffmpeg_path.clone());
        let sampler = FrameSampler::new(Box::new(engine), settings.jpeg_quality);

        let result = if source.is_file() {
            self.run_single(&sampler, &source, &output_root)?
        } else {
            validate_directory_exists(&source)?;
            self.run_batch(&sampler, &source, &output_root)?
        };

        self.print_summary(&result);

        add_recent_path(&mut self.config.settings, &output_path);
        if let Err(e) = save_settings(&self.config.settings) {
            warn!("無法儲存設定: {e}");
        }

        Ok(())
    }

    /// 處理單一影片檔，逐階段顯示進度
    fn run_single(
        &self,
        sampler: &FrameSampler,
        source: &Path,
        output_root: &Path,
    ) -> Result<GenerationResult> {
        let video_name = source.file_stem().map_or_else(
            || "video".to_string(),
            |s| s.to_string_lossy().to_string(),
        );

        println!("\n{} {}", style("處理中").cyan(), style(&video_name).bold());

        if self.sidecar_exists(source, output_root) {
            println!("  {} 字幕軌已存在，跳過", style("⤳").dim());
            return Ok(GenerationResult {
                total_videos: 1,
                successful: 0,
                failed: 0,
                skipped: 1,
            });
        }

        // Stage A: 影片資訊僅供顯示，探測失敗不影響管線
        print!("  {} 讀取影片資訊...", style("A").dim());
        match get_video_info(source) {
            Ok(video_info) => {
                println!(
                    " {:.1}s, {}x{}（預計 {} 張縮圖）",
                    video_info.duration_seconds,
                    video_info.width,
                    video_info.height,
                    video_info.estimated_frame_count(self.config.settings.interval_seconds)
                );
            }
            Err(e) => {
                println!(" {}", style("無法取得").yellow());
                warn!("ffprobe 失敗 {}: {e}", source.display());
            }
        }

        print!("  {} 擷取縮圖與建立字幕軌...", style("B").dim());
        match self.process_single_video(sampler, source, output_root) {
            Ok(track) => {
                println!(
                    " {} {} 張縮圖",
                    style("✓").green(),
                    track.thumbnails.len()
                );
                println!("  字幕軌: {}", track.sidecar_path.display());
                Ok(GenerationResult {
                    total_videos: 1,
                    successful: 1,
                    failed: 0,
                    skipped: 0,
                })
            }
            Err(e) => {
                println!(" {} 處理失敗", style("✗").red());
                error!("處理影片失敗 {video_name}: {e}");
                Ok(GenerationResult {
                    total_videos: 1,
                    successful: 0,
                    failed: 1,
                    skipped: 0,
                })
            }
        }
    }

    /// 處理整個資料夾的影片，依檔案大小由小到大
    fn run_batch(
        &self,
        sampler: &FrameSampler,
        input_dir: &Path,
        output_root: &Path,
    ) -> Result<GenerationResult> {
        println!("{}", style("掃描影片檔案中...").dim());
        let video_files = scan_video_files(input_dir, &self.config.file_type_table)?;

        if video_files.is_empty() {
            println!("{}", style("找不到任何影片檔案").yellow());
            return Ok(GenerationResult {
                total_videos: 0,
                successful: 0,
                failed: 0,
                skipped: 0,
            });
        }

        println!(
            "{}",
            style(format!("找到 {} 個影片檔案", video_files.len())).green()
        );

        let progress_bar = ProgressBar::new(video_files.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );

        let mut successful = 0;
        let mut failed = 0;
        let mut skipped = 0;

        for video in &video_files {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                progress_bar.abandon_with_message("操作已中斷");
                warn!("收到中斷訊號，停止批次處理");
                break;
            }

            let video_name = video.path.file_stem().map_or_else(
                || "video".to_string(),
                |s| s.to_string_lossy().to_string(),
            );
            progress_bar.set_message(video_name.clone());

            if self.sidecar_exists(&video.path, output_root) {
                skipped += 1;
                progress_bar.inc(1);
                continue;
            }

            match self.process_single_video(sampler, &video.path, output_root) {
                Ok(track) => {
                    info!(
                        "預覽軌已建立: {}（{} 張縮圖）",
                        track.sidecar_path.display(),
                        track.thumbnails.len()
                    );
                    successful += 1;
                }
                Err(e) => {
                    error!("處理影片失敗 {video_name}: {e}");
                    failed += 1;
                }
            }
            progress_bar.inc(1);
        }

        if !progress_bar.is_finished() {
            progress_bar.finish_with_message("完成");
        }

        Ok(GenerationResult {
            total_videos: video_files.len(),
            successful,
            failed,
            skipped,
        })
    }

    /// 單一影片的完整管線：縮圖寫入 `<輸出根目錄>/<影片名>/thumbnails/`
    fn process_single_video(
        &self,
        sampler: &FrameSampler,
        video_path: &Path,
        output_root: &Path,
    ) -> Result<PreviewTrack, PreviewError> {
        let thumbnails_dir = self.thumbnails_dir(video_path, output_root);
        let settings = &self.config.settings;

        generate_preview_track(
            sampler,
            video_path,
            &thumbnails_dir,
            settings.interval_seconds,
            &settings.base_url,
        )
    }

    fn thumbnails_dir(&self, video_path: &Path, output_root: &Path) -> PathBuf {
        let video_name = video_path.file_stem().map_or_else(
            || "video".to_string(),
            |s| s.to_string_lossy().to_string(),
        );
        output_root.join(video_name).join("thumbnails")
    }

    fn sidecar_exists(&self, video_path: &Path, output_root: &Path) -> bool {
        self.thumbnails_dir(video_path, output_root)
            .join(SIDECAR_FILE_NAME)
            .exists()
    }

    fn prompt_source_path(&self) -> Result<String> {
        let path: String = Input::new()
            .with_prompt("請輸入影片檔案或資料夾路徑")
            .interact_text()?;
        Ok(path.trim().to_string())
    }

    fn prompt_output_path(&self) -> Result<String> {
        let mut input: Input<String> = Input::new().with_prompt("請輸入輸出資料夾路徑");
        if let Some(recent) = self.config.settings.recent_paths.first() {
            input = input.default(recent.clone());
        }
        let path = input.interact_text()?;
        Ok(path.trim().to_string())
    }

    fn print_summary(&self, result: &GenerationResult) {
        println!();
        println!("{}", style("=== 預覽軌生成摘要 ===").cyan().bold());
        println!("  總計: {} 個影片", result.total_videos);
        println!("  成功: {} 個", style(result.successful).green());

        if result.skipped > 0 {
            println!("  跳過: {} 個", style(result.skipped).yellow());
        }

        if result.failed > 0 {
            println!("  失敗: {} 個", style(result.failed).red());
        }

        info!(
            "預覽軌生成完成 - 成功: {}, 跳過: {}, 失敗: {}",
            result.successful, result.skipped, result.failed
        );
    }
}
