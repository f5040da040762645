//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//! 每个常用参数都可通过 `BATCHPIX_*` 环境变量提供默认值。
//!
//! ## 命令结构
//! - `convert`: 批量转换/缩放图像
//! - `scan`: 列出输入中可识别的图像
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: convert, scan

pub mod convert;
pub mod scan;

use clap::{Parser, Subcommand};

/// BatchPix - offline batch image converter
#[derive(Parser)]
#[command(name = "batchpix")]
#[command(version)]
#[command(about = "Batch convert and resize images between PNG, JPG and WEBP", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Convert images (files, folders or glob patterns) to PNG, JPG or WEBP
    Convert(convert::ConvertArgs),

    /// List the images that would be picked up from the given inputs
    Scan(scan::ScanArgs),
}
