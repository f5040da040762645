//! # 运行事件数据模型
//!
//! 引擎通过通道发送给调用方的进度、单文件结果与终止结果。
//!
//! ## 依赖关系
//! - 被 `batch/engine.rs` 产生
//! - 被 `commands/convert.rs`, `utils/report.rs` 消费

use std::path::PathBuf;

/// 进度状态，`completed` 单调递增，`total` 在任务开始时固定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    pub completed: usize,
    pub total: usize,
}

impl ProgressState {
    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

/// 终止结果，每个任务恰好产生一个
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Success { output_directory: PathBuf },
    Failure { message: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success { .. })
    }
}

/// 单个文件的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// 已写出
    Converted {
        output: PathBuf,
        width: u32,
        height: u32,
    },
    /// 解码/编码/写入失败而跳过
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub input: PathBuf,
    pub status: FileStatus,
}

impl FileReport {
    pub fn is_converted(&self) -> bool {
        matches!(self.status, FileStatus::Converted { .. })
    }
}

/// 引擎事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// 每处理完一个文件（成功或跳过）发送一次
    Progress {
        state: ProgressState,
        file: FileReport,
    },
    /// 终止事件，之后通道关闭
    Finished(RunOutcome),
}

/// 引擎状态机: Idle → Running → {Completed, Failed}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Completed,
    Failed,
}

impl EngineState {
    pub fn is_running(&self) -> bool {
        matches!(self, EngineState::Running)
    }
}
