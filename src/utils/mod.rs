//! # 工具函数模块
//!
//! 提供美化输出、进度条与转换报告。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 子模块: output, progress, report

pub mod output;
pub mod progress;
pub mod report;
