//! # BatchPix - 离线批量图像转换工具
//!
//! 在 PNG / JPG / WEBP 之间批量转换图像，可选缩放。
//!
//! ## 子命令
//! - `convert` - 批量转换/缩放图像
//! - `scan`    - 列出输入中可识别的图像
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     └── batchpix (库: 收集、引擎、编解码)
//!   └── utils/      (输出、进度条、报告)
//! ```
//!
//! 日志通过 `RUST_LOG` 控制，默认只输出 warn 及以上。

mod cli;
mod commands;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
