//! # scan 子命令 CLI 定义
//!
//! 列出输入路径中可识别的图像文件
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/scan.rs`

use clap::Args;

/// scan 子命令参数
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Image files, folders or glob patterns to scan
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Do not follow symbolic links while walking folders
    #[arg(long, default_value_t = false)]
    pub no_follow: bool,
}
