//! # 批量处理模块
//!
//! 提供图像文件收集、输出命名与批量转换引擎。
//!
//! ## 功能
//! - 自动检测输入类型（文件/目录）并收集图像
//! - 不覆盖已有文件的输出命名
//! - 在独立线程上执行转换并通过通道报告进度
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `walkdir` 遍历目录
//! - 使用 `crossbeam-channel` 和 `rayon`

pub mod collector;
pub mod engine;
pub mod naming;

pub use collector::{collect_images, collect_images_with, scan_path, ImageCollector};
pub use engine::{BatchEngine, RunHandle, RunSummary};
pub use naming::unique_path;
