//! # 数据模型模块
//!
//! 定义批量转换任务、输出格式与运行事件的数据模型。
//!
//! ## 依赖关系
//! - 被 `batch/`, `imaging/` 和 `commands/` 使用
//! - 子模块: format, job, event

pub mod event;
pub mod format;
pub mod job;

pub use event::{EngineEvent, EngineState, FileReport, FileStatus, ProgressState, RunOutcome};
pub use format::{is_supported_extension, OutputFormat, SUPPORTED_EXTENSIONS};
pub use job::{ConversionJob, ImagePath, OutputSpec, ResizePolicy};
