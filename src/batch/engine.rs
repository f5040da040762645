//! # 批量转换引擎
//!
//! 在独立工作线程上执行 `ConversionJob`，通过通道向调用方发送事件。
//!
//! ## 状态机
//! `Idle → Running → {Completed, Failed}`
//! - `Completed`: 所有文件都已尝试（成功或跳过）
//! - `Failed`: 输出目录无法创建，或运行被取消
//!
//! ## 单文件流程
//! 解码 → 规划尺寸 → (Lanczos3 缩放) → 编码到内存 → 预留输出名 → 写入。
//! 任一步失败仅跳过该文件并记录 warn 日志，不留下残缺输出。
//! 每个文件处理后恰好发送一次进度事件。
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 调用
//! - 使用 `batch/naming.rs`, `imaging/`
//! - 使用 `crossbeam-channel` 传递事件，`rayon` 进行可选的并行处理

use super::naming::{candidate_path, unique_path_with};
use crate::error::{BatchPixError, Result};
use crate::imaging::{decode_file, encode, resize};
use crate::models::{
    ConversionJob, EngineEvent, EngineState, FileReport, FileStatus, ImagePath, ProgressState,
    RunOutcome,
};

use crossbeam_channel::{unbounded, Receiver, Sender};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

/// 批量转换引擎，同一时刻只允许一个运行
pub struct BatchEngine {
    state: Arc<Mutex<EngineState>>,
    /// 并行作业数，1 为顺序处理
    jobs: usize,
}

impl Default for BatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchEngine {
    /// 创建顺序处理的引擎
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(EngineState::Idle)),
            jobs: 1,
        }
    }

    /// 设置并行作业数（0 = 自动）
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn state(&self) -> EngineState {
        *lock(&self.state)
    }

    /// 启动一次运行
    ///
    /// 已有运行进行中时返回 `EngineBusy`。
    pub fn start(&self, job: ConversionJob) -> Result<RunHandle> {
        {
            let mut state = lock(&self.state);
            if state.is_running() {
                return Err(BatchPixError::EngineBusy);
            }
            *state = EngineState::Running;
        }

        let (tx, rx) = unbounded();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_state = Arc::clone(&self.state);
        let worker_cancel = Arc::clone(&cancel);
        let jobs = self.jobs;

        let spawned = thread::Builder::new()
            .name("batchpix-worker".to_string())
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    run_job(&job, jobs, &tx, &worker_cancel)
                }))
                .unwrap_or_else(|_| RunOutcome::Failure {
                    message: "conversion worker panicked".to_string(),
                });

                // 先更新状态再发送终止事件，收到事件的调用方可以立即开始下一次运行
                *lock(&worker_state) = if outcome.is_success() {
                    EngineState::Completed
                } else {
                    EngineState::Failed
                };
                let _ = tx.send(EngineEvent::Finished(outcome));
            });

        match spawned {
            Ok(worker) => Ok(RunHandle {
                events: rx,
                cancel,
                worker: Some(worker),
            }),
            Err(e) => {
                *lock(&self.state) = EngineState::Idle;
                Err(BatchPixError::WorkerSpawn(e))
            }
        }
    }
}

/// 一次运行的句柄
pub struct RunHandle {
    events: Receiver<EngineEvent>,
    cancel: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl RunHandle {
    /// 事件接收端，事件在工作线程上产生
    pub fn events(&self) -> &Receiver<EngineEvent> {
        &self.events
    }

    /// 请求协作式取消，在文件之间检查
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// 取消标志，可交给信号处理器等其他线程
    pub fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// 阻塞直到运行结束，收集全部事件
    pub fn wait(mut self) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut outcome = None;

        for event in self.events.iter() {
            match event {
                EngineEvent::Progress { state, file } => {
                    summary.progress.push(state);
                    summary.files.push(file);
                }
                EngineEvent::Finished(result) => {
                    outcome = Some(result);
                    break;
                }
            }
        }

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }

        summary.outcome = outcome.unwrap_or_else(|| RunOutcome::Failure {
            message: "conversion worker exited unexpectedly".to_string(),
        });
        summary
    }
}

/// 运行汇总
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub progress: Vec<ProgressState>,
    pub files: Vec<FileReport>,
    pub outcome: RunOutcome,
}

impl Default for RunSummary {
    fn default() -> Self {
        RunSummary {
            progress: Vec::new(),
            files: Vec::new(),
            outcome: RunOutcome::Failure {
                message: String::new(),
            },
        }
    }
}

impl RunSummary {
    pub fn converted(&self) -> usize {
        self.files.iter().filter(|f| f.is_converted()).count()
    }

    pub fn skipped(&self) -> usize {
        self.files.len() - self.converted()
    }
}

// ─────────────────────────────────────────────────────────────
// 工作线程
// ─────────────────────────────────────────────────────────────

fn run_job(
    job: &ConversionJob,
    jobs: usize,
    tx: &Sender<EngineEvent>,
    cancel: &AtomicBool,
) -> RunOutcome {
    let destination = job.output().destination();
    if let Err(e) = ensure_output_directory(destination) {
        log::error!("{}", e);
        return RunOutcome::Failure {
            message: e.to_string(),
        };
    }

    let total = job.total();
    log::info!(
        "converting {} file(s) to {} ({}) into {}",
        total,
        job.output().format(),
        job.policy(),
        destination.display()
    );

    let reporter = ProgressReporter::new(total, tx);
    let reservations = Reservations::default();
    let convert = |path: &ImagePath| {
        if cancel.load(Ordering::SeqCst) {
            return;
        }
        reporter.record(convert_file(path, job, &reservations));
    };

    if jobs <= 1 {
        job.inputs().iter().for_each(&convert);
    } else {
        match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(|| job.inputs().par_iter().for_each(&convert)),
            Err(e) => {
                log::warn!("failed to build thread pool, converting sequentially: {}", e);
                job.inputs().iter().for_each(&convert);
            }
        }
    }

    let completed = reporter.completed();
    if completed < total && cancel.load(Ordering::SeqCst) {
        log::warn!("conversion cancelled after {}/{} files", completed, total);
        return RunOutcome::Failure {
            message: format!("conversion cancelled after {}/{} files", completed, total),
        };
    }

    log::info!("finished {}/{} file(s)", completed, total);
    RunOutcome::Success {
        output_directory: destination.to_path_buf(),
    }
}

fn ensure_output_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| BatchPixError::OutputDirectory {
        path: path.display().to_string(),
        source: e,
    })
}

/// 处理单个文件，所有错误（包括 panic）都转换为跳过
fn convert_file(path: &ImagePath, job: &ConversionJob, reservations: &Reservations) -> FileReport {
    guarded_report(path, || convert_one(path, job, reservations))
}

/// 运行单文件流程并生成报告，流程中的 panic 视为该文件失败
fn guarded_report<F>(path: &ImagePath, pipeline: F) -> FileReport
where
    F: FnOnce() -> Result<(PathBuf, u32, u32)>,
{
    let result = panic::catch_unwind(AssertUnwindSafe(pipeline))
        .unwrap_or_else(|_| {
            Err(BatchPixError::Other(
                "image codec panicked while processing this file".to_string(),
            ))
        });

    let status = match result {
        Ok((output, width, height)) => {
            log::debug!("{} -> {}", path, output.display());
            FileStatus::Converted {
                output,
                width,
                height,
            }
        }
        Err(e) => {
            log::warn!("skipping {}: {}", path, e);
            FileStatus::Skipped {
                reason: e.to_string(),
            }
        }
    };

    FileReport {
        input: path.as_path().to_path_buf(),
        status,
    }
}

fn convert_one(
    path: &ImagePath,
    job: &ConversionJob,
    reservations: &Reservations,
) -> Result<(PathBuf, u32, u32)> {
    let spec = job.output();

    let img = decode_file(path.as_path())?;
    let img = resize::apply(img, &job.policy());
    let (width, height) = (img.width(), img.height());
    let bytes = encode(&img, spec.format(), spec.quality())?;
    drop(img);

    let candidate = candidate_path(spec.destination(), path.stem(), spec.format().extension());
    let output = reservations.reserve(&candidate);
    if let Err(e) = write_output(&output, &bytes) {
        reservations.release(&output);
        return Err(e);
    }

    Ok((output, width, height))
}

/// 写入输出文件，失败时删除残缺文件
fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_error = |e| BatchPixError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    };

    // create_new: 不覆盖命名后被外部创建的文件
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(write_error)?;

    if let Err(e) = file.write_all(bytes) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(write_error(e));
    }

    Ok(())
}

/// 本次运行中已预留的输出路径
#[derive(Default)]
struct Reservations {
    claimed: Mutex<HashSet<PathBuf>>,
}

impl Reservations {
    fn reserve(&self, candidate: &Path) -> PathBuf {
        let mut claimed = lock(&self.claimed);
        let path = unique_path_with(candidate, |p| p.exists() || claimed.contains(p));
        claimed.insert(path.clone());
        path
    }

    fn release(&self, path: &Path) {
        lock(&self.claimed).remove(path);
    }
}

/// 进度计数；持锁发送保证 `completed` 按 1 严格递增
struct ProgressReporter<'a> {
    total: usize,
    completed: Mutex<usize>,
    tx: &'a Sender<EngineEvent>,
}

impl<'a> ProgressReporter<'a> {
    fn new(total: usize, tx: &'a Sender<EngineEvent>) -> Self {
        Self {
            total,
            completed: Mutex::new(0),
            tx,
        }
    }

    fn record(&self, file: FileReport) {
        let mut completed = lock(&self.completed);
        *completed += 1;
        let state = ProgressState {
            completed: *completed,
            total: self.total,
        };
        // 接收端被丢弃时继续处理，调用方可能只关心输出文件
        let _ = self.tx.send(EngineEvent::Progress { state, file });
    }

    fn completed(&self) -> usize {
        *lock(&self.completed)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
