use anyhow::Result;
use console::style;
use log::{info, warn};
use video_preview_track::component::PreviewTrackGenerator;
use video_preview_track::config::Config;
use video_preview_track::init;
use video_preview_track::signal::setup_shutdown_signal;

fn main() -> Result<()> {
    init::init();
    let shutdown_signal = setup_shutdown_signal();

    let config = Config::new()?;
    let mut generator = PreviewTrackGenerator::new(config, shutdown_signal);

    if let Err(e) = generator.run() {
        warn!("程式執行錯誤: {e}");
        eprintln!("{} {e}", style("錯誤:").red().bold());
        std::process::exit(1);
    }

    info!("程式正常結束");
    Ok(())
}
