//! 預覽軌管線整合測試
//!
//! 以假引擎代換 ffmpeg，不啟動任何外部程序

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;
use video_preview_track::component::preview_track_generator::{
    ExitReport, ExtractionEngine, ExtractionHandle, ExtractionRequest, FrameSampler,
    SIDECAR_FILE_NAME, ThumbnailSet, build_sidecar, frame_file_name, generate_preview_track,
};
use video_preview_track::error::PreviewError;

/// 假擷取引擎：直接在輸出資料夾寫出指定數量的縮圖檔
struct FakeEngine {
    frames: usize,
    succeed: bool,
    diagnostic: String,
    invocations: Arc<AtomicUsize>,
}

impl FakeEngine {
    fn new(frames: usize) -> Self {
        Self {
            frames,
            succeed: true,
            diagnostic: String::new(),
            invocations: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing(diagnostic: &str) -> Self {
        Self {
            frames: 0,
            succeed: false,
            diagnostic: diagnostic.to_string(),
            invocations: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn invocation_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.invocations)
    }
}

struct FakeHandle {
    success: bool,
    detail: String,
}

impl ExtractionHandle for FakeHandle {
    fn wait(self: Box<Self>) -> Result<ExitReport, PreviewError> {
        Ok(ExitReport {
            success: self.success,
            detail: self.detail,
        })
    }
}

impl ExtractionEngine for FakeEngine {
    fn start_extraction(
        &self,
        request: &ExtractionRequest,
    ) -> Result<Box<dyn ExtractionHandle>, PreviewError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);

        let output_dir = request
            .output_pattern
            .parent()
            .expect("輸出樣板應該有父資料夾");
        for sequence in 1..=self.frames {
            fs::write(output_dir.join(frame_file_name(sequence as u32)), b"jpeg").unwrap();
        }

        Ok(Box::new(FakeHandle {
            success: self.succeed,
            detail: self.diagnostic.clone(),
        }))
    }
}

fn write_fake_video(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"not a real video").unwrap();
    path
}

fn sampler_with(engine: FakeEngine) -> FrameSampler {
    FrameSampler::new(Box::new(engine), 2)
}

/// 解析 WebVTT 內容為 (start, end, url) 三元組
fn parse_sidecar(content: &str) -> Vec<(String, String, String)> {
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("WEBVTT"), "第一行必須是 WEBVTT 標頭");

    let mut cues = Vec::new();
    let mut current: Option<(String, String)> = None;
    for line in lines {
        if line.is_empty() {
            continue;
        }
        if let Some((start, end)) = line.split_once(" --> ") {
            current = Some((start.to_string(), end.to_string()));
        } else if let Some((start, end)) = current.take() {
            cues.push((start, end, line.to_string()));
        }
    }
    cues
}

/// 測試 1: 完整管線（取樣 → 建軌）
#[test]
fn test_pipeline_end_to_end() {
    let dir = TempDir::new().unwrap();
    let source = write_fake_video(dir.path(), "demo.mp4");
    let output_dir = dir.path().join("demo").join("thumbnails");

    let sampler = sampler_with(FakeEngine::new(3));
    let track =
        generate_preview_track(&sampler, &source, &output_dir, 10, "http://localhost:3000")
            .unwrap();

    assert_eq!(track.video_name, "demo");
    assert_eq!(track.thumbnails.len(), 3);
    assert_eq!(track.sidecar_path, output_dir.join(SIDECAR_FILE_NAME));

    let content = fs::read_to_string(&track.sidecar_path).unwrap();
    let expected = "WEBVTT\n\n\
        00:00:00.000 --> 00:00:10.000\n\
        http://localhost:3000/demo/thumbnails/thumb_001.jpg\n\n\
        00:00:10.000 --> 00:00:20.000\n\
        http://localhost:3000/demo/thumbnails/thumb_002.jpg\n\n\
        00:00:20.000 --> 00:00:30.000\n\
        http://localhost:3000/demo/thumbnails/thumb_003.jpg\n\n";
    assert_eq!(content, expected);

    println!("✓ 完整管線測試通過");
}

/// 測試 2: 分鐘進位（間隔 10 秒，第 8 張縮圖從 70 秒開始）
#[test]
fn test_timestamp_rollover_past_minute() {
    let dir = TempDir::new().unwrap();
    let source = write_fake_video(dir.path(), "long.mp4");
    let output_dir = dir.path().join("long").join("thumbnails");

    let sampler = sampler_with(FakeEngine::new(8));
    let track =
        generate_preview_track(&sampler, &source, &output_dir, 10, "http://localhost:3000")
            .unwrap();

    let content = fs::read_to_string(&track.sidecar_path).unwrap();
    let cues = parse_sidecar(&content);

    assert_eq!(cues.len(), 8);
    assert_eq!(cues[7].0, "00:01:10.000");
    assert_eq!(cues[7].1, "00:01:20.000");
    assert!(!content.contains("00:00:70.000"));
}

/// 測試 3: 往返一致（解析產出的字幕軌可還原同樣的 cue 序列）
#[test]
fn test_sidecar_round_trip() {
    let dir = TempDir::new().unwrap();
    let source = write_fake_video(dir.path(), "clip.mp4");
    let output_dir = dir.path().join("clip").join("thumbnails");

    let interval = 7;
    let sampler = sampler_with(FakeEngine::new(5));
    let track = generate_preview_track(
        &sampler,
        &source,
        &output_dir,
        interval,
        "http://localhost:3000",
    )
    .unwrap();

    let content = fs::read_to_string(&track.sidecar_path).unwrap();
    let cues = parse_sidecar(&content);

    assert_eq!(cues.len(), track.thumbnails.len());
    for (i, (start, end, url)) in cues.iter().enumerate() {
        let start_secs = i as u64 * interval;
        let end_secs = (i as u64 + 1) * interval;
        assert_eq!(
            *start,
            format!("00:00:{start_secs:02}.000"),
            "cue {i} 開始時間"
        );
        assert_eq!(*end, format!("00:00:{end_secs:02}.000"), "cue {i} 結束時間");
        assert_eq!(
            *url,
            format!(
                "http://localhost:3000/clip/thumbnails/{}",
                track.thumbnails.entries[i].file_name
            )
        );
    }

    // 相鄰 cue 頭尾相接
    for pair in cues.windows(2) {
        assert_eq!(pair[0].1, pair[1].0);
    }
}

/// 測試 4: 來源不存在時不呼叫引擎
#[test]
fn test_missing_source_rejected_before_engine() {
    let dir = TempDir::new().unwrap();
    let engine = FakeEngine::new(3);
    let invocations = engine.invocation_counter();
    let sampler = sampler_with(engine);

    let result = generate_preview_track(
        &sampler,
        &dir.path().join("missing.mp4"),
        &dir.path().join("out"),
        10,
        "http://localhost:3000",
    );

    assert!(matches!(result, Err(PreviewError::SourceNotFound { .. })));
    assert_eq!(invocations.load(Ordering::SeqCst), 0, "引擎不應被呼叫");
}

/// 測試 5: 引擎回報成功但沒有縮圖
#[test]
fn test_zero_frames_extracted() {
    let dir = TempDir::new().unwrap();
    let source = write_fake_video(dir.path(), "tiny.mp4");
    let output_dir = dir.path().join("tiny").join("thumbnails");

    let sampler = sampler_with(FakeEngine::new(0));
    let result = generate_preview_track(&sampler, &source, &output_dir, 10, "http://localhost:3000");

    assert!(matches!(result, Err(PreviewError::NoFramesExtracted { .. })));
    // 失敗的執行不會留下字幕軌
    assert!(!output_dir.join(SIDECAR_FILE_NAME).exists());
}

/// 測試 6: 引擎失敗時保留診斷訊息
#[test]
fn test_engine_failure_preserves_diagnostic() {
    let dir = TempDir::new().unwrap();
    let source = write_fake_video(dir.path(), "bad.mp4");
    let output_dir = dir.path().join("bad").join("thumbnails");

    let sampler = sampler_with(FakeEngine::failing("Invalid data found when processing input"));
    let result = generate_preview_track(&sampler, &source, &output_dir, 10, "http://localhost:3000");

    match result {
        Err(PreviewError::ExtractionProcessFailed { message }) => {
            assert!(message.contains("Invalid data found"));
        }
        other => panic!("預期 ExtractionProcessFailed，得到 {other:?}"),
    }
}

/// 測試 7: 空縮圖列表直接拒絕，不寫任何檔案
#[test]
fn test_empty_thumbnail_set_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let empty = ThumbnailSet { entries: vec![] };

    let result = build_sidecar(&empty, 10, "http://localhost:3000/x/thumbnails", dir.path());

    assert!(matches!(result, Err(PreviewError::EmptyThumbnailSet)));
    assert!(!dir.path().join(SIDECAR_FILE_NAME).exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// 測試 8: 影片名稱含空白時 URL 做百分比編碼，分隔符不重複編碼
#[test]
fn test_url_encoding_of_video_name() {
    let dir = TempDir::new().unwrap();
    let source = write_fake_video(dir.path(), "my holiday clip.mp4");
    let output_dir = dir.path().join("my holiday clip").join("thumbnails");

    let sampler = sampler_with(FakeEngine::new(2));
    let track =
        generate_preview_track(&sampler, &source, &output_dir, 10, "http://localhost:3000")
            .unwrap();

    let content = fs::read_to_string(&track.sidecar_path).unwrap();
    for (_, _, url) in parse_sidecar(&content) {
        assert!(url.contains("/my%20holiday%20clip/thumbnails/"), "url: {url}");
        assert!(!url.contains(' '));
        assert!(!url.contains("%2F"), "路徑分隔符不應被編碼: {url}");
    }
}

/// 測試 9: 重複使用輸出資料夾時，舊縮圖不會混入新集合
#[test]
fn test_stale_frames_cleared_before_sampling() {
    let dir = TempDir::new().unwrap();
    let source = write_fake_video(dir.path(), "reuse.mp4");
    let output_dir = dir.path().join("reuse").join("thumbnails");

    // 模擬上一次執行留下的縮圖
    fs::create_dir_all(&output_dir).unwrap();
    fs::write(output_dir.join("thumb_007.jpg"), b"stale").unwrap();
    fs::write(output_dir.join("thumb_099.jpg"), b"stale").unwrap();

    let sampler = sampler_with(FakeEngine::new(2));
    let track =
        generate_preview_track(&sampler, &source, &output_dir, 10, "http://localhost:3000")
            .unwrap();

    assert_eq!(track.thumbnails.len(), 2);
    let names: Vec<&str> = track
        .thumbnails
        .entries
        .iter()
        .map(|e| e.file_name.as_str())
        .collect();
    assert_eq!(names, ["thumb_001.jpg", "thumb_002.jpg"]);
    assert!(!output_dir.join("thumb_099.jpg").exists());
}
