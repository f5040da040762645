//! 引擎集成测试
//!
//! 通过公开 API 驱动完整的转换运行，检查进度事件、输出文件与终止结果。

use std::fs;
use std::path::{Path, PathBuf};

use batchpix::batch::{collect_images, BatchEngine};
use batchpix::error::BatchPixError;
use batchpix::models::{
    ConversionJob, EngineState, ImagePath, OutputFormat, OutputSpec, ResizePolicy, RunOutcome,
};
use image::{ColorType, GenericImageView, Rgba, RgbaImage};
use tempfile::TempDir;

fn write_png(path: &Path, width: u32, height: u32) -> ImagePath {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, if x % 2 == 0 { 255 } else { 64 }])
    });
    img.save(path).unwrap();
    ImagePath::new(path).unwrap()
}

fn assert_progress_is_consecutive(progress: &[batchpix::models::ProgressState], total: usize) {
    for (i, state) in progress.iter().enumerate() {
        assert_eq!(state.completed, i + 1);
        assert_eq!(state.total, total);
    }
}

#[test]
fn test_progress_events_are_consecutive() {
    let dir = TempDir::new().unwrap();
    let inputs: Vec<_> = (0..5)
        .map(|i| write_png(&dir.path().join(format!("in/img{}.png", i)), 8, 8))
        .collect();
    let base = dir.path().join("out");
    fs::create_dir(&base).unwrap();
    let spec = OutputSpec::under_base(OutputFormat::Webp, 80, &base).unwrap();

    let summary = BatchEngine::new()
        .start(ConversionJob::new(inputs, ResizePolicy::None, spec))
        .unwrap()
        .wait();

    assert_eq!(summary.progress.len(), 5);
    assert_progress_is_consecutive(&summary.progress, 5);
    assert!(summary.progress.last().unwrap().is_done());
    assert_eq!(
        summary.outcome,
        RunOutcome::Success {
            output_directory: base.join("BatchPix_webp")
        }
    );
    assert_eq!(fs::read_dir(base.join("BatchPix_webp")).unwrap().count(), 5);
}

#[test]
fn test_jpg_scenario_resizes_and_flattens() {
    let dir = TempDir::new().unwrap();
    let input = write_png(&dir.path().join("a.png"), 100, 50);
    let base = dir.path().join("out");
    fs::create_dir(&base).unwrap();

    let policy = ResizePolicy::Absolute {
        width: Some(50),
        height: None,
        keep_aspect: true,
    };
    let spec = OutputSpec::under_base(OutputFormat::Jpg, 90, &base).unwrap();
    let summary = BatchEngine::new()
        .start(ConversionJob::new(vec![input], policy, spec))
        .unwrap()
        .wait();

    assert!(summary.outcome.is_success());
    let output = base.join("BatchPix_jpg").join("a.jpg");
    let decoded = image::open(&output).unwrap();
    assert_eq!(decoded.dimensions(), (50, 25));
    assert!(!decoded.color().has_alpha());
    assert_eq!(decoded.color(), ColorType::Rgb8);
}

#[test]
fn test_output_directory_failure_emits_no_progress() {
    let dir = TempDir::new().unwrap();
    let input = write_png(&dir.path().join("a.png"), 4, 4);
    // 以普通文件作为基础目录，子目录无法创建
    let base = dir.path().join("not_a_dir");
    fs::write(&base, b"file").unwrap();

    let spec = OutputSpec::under_base(OutputFormat::Png, 85, &base).unwrap();
    let engine = BatchEngine::new();
    let summary = engine
        .start(ConversionJob::new(vec![input], ResizePolicy::None, spec))
        .unwrap()
        .wait();

    assert!(summary.progress.is_empty());
    match summary.outcome {
        RunOutcome::Failure { message } => {
            assert!(message.contains("Failed to create output directory"))
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(engine.state(), EngineState::Failed);
}

#[test]
fn test_corrupt_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in");
    write_png(&src.join("a.png"), 6, 6);
    write_png(&src.join("c.png"), 6, 6);
    fs::write(src.join("b.png"), b"definitely not a png").unwrap();

    let inputs = collect_images(&[&src]);
    assert_eq!(inputs.len(), 3);

    let base = dir.path().join("out");
    fs::create_dir(&base).unwrap();
    let spec = OutputSpec::under_base(OutputFormat::Png, 85, &base).unwrap();
    let summary = BatchEngine::new()
        .start(ConversionJob::new(inputs, ResizePolicy::Percent { factor: 50 }, spec))
        .unwrap()
        .wait();

    assert!(summary.outcome.is_success());
    assert_eq!(summary.progress.len(), 3);
    assert_eq!(summary.converted(), 2);
    assert_eq!(summary.skipped(), 1);

    let out = base.join("BatchPix_png");
    assert!(out.join("a.png").exists());
    assert!(!out.join("b.png").exists());
    assert_eq!(image::image_dimensions(out.join("c.png")).unwrap(), (3, 3));
}

#[test]
fn test_existing_outputs_are_preserved() {
    let dir = TempDir::new().unwrap();
    let input = write_png(&dir.path().join("photo.png"), 4, 4);
    let base = dir.path().join("out");
    let out = base.join("BatchPix_png");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("photo.png"), b"keep me").unwrap();

    let spec = OutputSpec::under_base(OutputFormat::Png, 85, &base).unwrap();
    let summary = BatchEngine::new()
        .start(ConversionJob::new(vec![input], ResizePolicy::None, spec))
        .unwrap()
        .wait();

    assert!(summary.outcome.is_success());
    assert_eq!(fs::read(out.join("photo.png")).unwrap(), b"keep me");
    assert!(out.join("photo (1).png").exists());
}

#[test]
fn test_engine_rejects_second_run() {
    let dir = TempDir::new().unwrap();
    let inputs: Vec<_> = (0..10)
        .map(|i| write_png(&dir.path().join(format!("in/{}.png", i)), 256, 256))
        .collect();
    let base = dir.path().join("out");
    fs::create_dir(&base).unwrap();
    let spec = OutputSpec::under_base(OutputFormat::Png, 85, &base).unwrap();
    let job = ConversionJob::new(inputs.clone(), ResizePolicy::Percent { factor: 150 }, spec.clone());

    let engine = BatchEngine::new();
    let handle = engine.start(job).unwrap();
    let second = engine.start(ConversionJob::new(inputs, ResizePolicy::None, spec));
    assert!(matches!(second, Err(BatchPixError::EngineBusy)));

    assert!(handle.wait().outcome.is_success());
    assert_eq!(engine.state(), EngineState::Completed);
}

#[test]
fn test_cancellation_stops_between_files() {
    let dir = TempDir::new().unwrap();
    let inputs: Vec<_> = (0..20)
        .map(|i| write_png(&dir.path().join(format!("in/{}.png", i)), 200, 200))
        .collect();
    let base = dir.path().join("out");
    fs::create_dir(&base).unwrap();
    let spec = OutputSpec::under_base(OutputFormat::Jpg, 70, &base).unwrap();

    let handle = BatchEngine::new()
        .start(ConversionJob::new(inputs, ResizePolicy::Percent { factor: 200 }, spec))
        .unwrap();
    handle.cancel();
    let summary = handle.wait();

    assert_progress_is_consecutive(&summary.progress, 20);
    let completed = summary.progress.len();
    match summary.outcome {
        RunOutcome::Failure { message } => {
            assert_eq!(
                message,
                format!("conversion cancelled after {}/20 files", completed)
            );
        }
        // 工作线程在取消标志生效前已处理完全部文件
        RunOutcome::Success { .. } => assert_eq!(completed, 20),
    }
}

#[test]
fn test_parallel_run_keeps_names_unique() {
    let dir = TempDir::new().unwrap();
    let mut inputs = Vec::new();
    for folder in 0..4 {
        for i in 0..3 {
            let path: PathBuf = dir.path().join(format!("in/{}/img{}.png", folder, i));
            inputs.push(write_png(&path, 16, 16));
        }
    }
    let base = dir.path().join("out");
    fs::create_dir(&base).unwrap();
    let spec = OutputSpec::under_base(OutputFormat::Png, 85, &base).unwrap();

    let summary = BatchEngine::new()
        .with_jobs(4)
        .start(ConversionJob::new(inputs, ResizePolicy::None, spec))
        .unwrap()
        .wait();

    assert!(summary.outcome.is_success());
    assert_progress_is_consecutive(&summary.progress, 12);
    assert_eq!(summary.converted(), 12);

    let out = base.join("BatchPix_png");
    assert_eq!(fs::read_dir(&out).unwrap().count(), 12);
    for i in 0..3 {
        assert!(out.join(format!("img{}.png", i)).exists());
        for n in 1..=3 {
            assert!(out.join(format!("img{} ({}).png", i, n)).exists());
        }
    }
}

#[cfg(unix)]
#[test]
fn test_non_utf8_stem_survives_conversion() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    let name = OsStr::from_bytes(b"caf\xE9.png");
    let input = write_png(&dir.path().join("in").join(name), 4, 4);
    let base = dir.path().join("out");
    fs::create_dir(&base).unwrap();

    let spec = OutputSpec::under_base(OutputFormat::Jpg, 80, &base).unwrap();
    let summary = BatchEngine::new()
        .start(ConversionJob::new(vec![input], ResizePolicy::None, spec))
        .unwrap()
        .wait();

    assert!(summary.outcome.is_success());
    let expected = base
        .join("BatchPix_jpg")
        .join(OsStr::from_bytes(b"caf\xE9.jpg"));
    assert!(expected.exists());
    assert!(!base.join("BatchPix_jpg").join("image.jpg").exists());
}
