//! # convert 命令实现
//!
//! 批量转换图像格式，可选缩放。
//!
//! ## 功能
//! - 展开 glob 并收集输入图像
//! - 在后台引擎上执行转换，前台驱动进度条
//! - Ctrl-C 协作式取消（当前文件处理完后停止）
//! - 汇总跳过的文件，可选导出 CSV 报告
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用库中的 `batch/`, `models/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`, `utils/report.rs`

use super::expand_inputs;
use crate::cli::convert::ConvertArgs;
use crate::utils::{output, progress, report};
use batchpix::batch::{collect_images, BatchEngine};
use batchpix::error::{BatchPixError, Result};
use batchpix::models::{ConversionJob, EngineEvent, FileReport, FileStatus, OutputSpec, RunOutcome};

use std::sync::atomic::Ordering;
use tabled::{Table, Tabled};

/// 跳过文件表格行
#[derive(Debug, Tabled)]
struct SkippedRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    let policy = args.resize_policy();
    output::print_header(&format!("Converting to {} ({})", args.format, policy));

    if !args.output.is_dir() {
        return Err(BatchPixError::DirectoryNotFound {
            path: args.output.display().to_string(),
        });
    }

    if args.quality_ignored() {
        output::print_warning("PNG output is lossless, --quality is ignored");
    }

    // 收集输入文件
    let spinner = progress::create_spinner("Scanning inputs...");
    let paths = expand_inputs(&args.inputs)?;
    let images = collect_images(&paths);
    spinner.finish_and_clear();

    if images.is_empty() {
        return Err(BatchPixError::NoImagesFound {
            inputs: args.inputs.join(", "),
        });
    }

    output::print_info(&format!("Found {} image(s) to convert", images.len()));

    let spec = OutputSpec::under_base(args.format, args.effective_quality(), &args.output)?;
    let job = ConversionJob::new(images, policy, spec);
    let total = job.total();

    let engine = BatchEngine::new().with_jobs(args.jobs);
    log::debug!("starting engine with {} job(s)", engine.jobs());
    let handle = engine.start(job)?;

    let cancel = handle.cancel_token();
    if let Err(e) = ctrlc::set_handler(move || cancel.store(true, Ordering::SeqCst)) {
        log::warn!("failed to install Ctrl-C handler: {}", e);
    }

    let pb = progress::create_progress_bar(total as u64, "Converting");
    let mut files = Vec::with_capacity(total);
    let mut outcome = None;

    for event in handle.events().iter() {
        match event {
            EngineEvent::Progress { state, file } => {
                pb.set_position(state.completed as u64);
                if args.verbose {
                    pb.suspend(|| match &file.status {
                        FileStatus::Converted {
                            output: out,
                            width,
                            height,
                        } => output::print_conversion(&file.input, out, (*width, *height)),
                        FileStatus::Skipped { reason } => {
                            output::print_skip(&file.input, &single_line(reason))
                        }
                    });
                }
                files.push(file);
            }
            EngineEvent::Finished(result) => {
                outcome = Some(result);
                break;
            }
        }
    }
    pb.finish_and_clear();

    // 事件已在上面消费完，这里只回收工作线程
    let _ = handle.wait();

    if let Some(path) = &args.report {
        report::write_csv(&files, path)?;
        output::print_info(&format!("Report saved to '{}'", path.display()));
    }

    print_skipped(&files);

    match outcome {
        Some(RunOutcome::Success { output_directory }) => {
            let converted = files.iter().filter(|f| f.is_converted()).count();
            output::print_done(converted, files.len() - converted, &output_directory);
            Ok(())
        }
        Some(RunOutcome::Failure { message }) => Err(BatchPixError::Other(message)),
        None => Err(BatchPixError::Other(
            "conversion worker exited unexpectedly".to_string(),
        )),
    }
}

/// 打印被跳过文件的表格
fn print_skipped(files: &[FileReport]) {
    let rows: Vec<SkippedRow> = files
        .iter()
        .filter_map(|f| match &f.status {
            FileStatus::Skipped { reason } => Some(SkippedRow {
                file: output::file_label(&f.input),
                reason: single_line(reason),
            }),
            FileStatus::Converted { .. } => None,
        })
        .collect();

    if !rows.is_empty() {
        output::print_header(&format!("{} Skipped File(s)", rows.len()));
        println!("{}", Table::new(&rows));
    }
}

fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}
