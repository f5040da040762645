//! # convert 子命令 CLI 定义
//!
//! 批量转换图像格式 (PNG / JPG / WEBP)，可选按尺寸或百分比缩放
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use batchpix::models::{OutputFormat, ResizePolicy};
use clap::Args;
use std::path::PathBuf;

/// 未指定 `--quality` 时的编码质量
pub const DEFAULT_QUALITY: u8 = 85;

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Image files, folders or glob patterns to convert
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Base output folder; results go to <OUTPUT>/BatchPix_<format>/
    #[arg(short, long, env = "BATCHPIX_OUTPUT")]
    pub output: PathBuf,

    /// Target output format
    #[arg(short, long, value_enum, ignore_case = true, default_value_t = OutputFormat::Png, env = "BATCHPIX_FORMAT")]
    pub format: OutputFormat,

    /// Encoding quality for JPG and WEBP, 1-100 [default: 85] (ignored for PNG)
    #[arg(short, long, env = "BATCHPIX_QUALITY",
          value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Target width in pixels
    #[arg(long, conflicts_with = "percent", value_parser = clap::value_parser!(u32).range(1..=20000))]
    pub width: Option<u32>,

    /// Target height in pixels
    #[arg(long, conflicts_with = "percent", value_parser = clap::value_parser!(u32).range(1..=20000))]
    pub height: Option<u32>,

    /// Stretch to the given width/height instead of keeping the aspect ratio
    #[arg(long, default_value_t = false)]
    pub stretch: bool,

    /// Scale both dimensions by a percentage
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=500))]
    pub percent: Option<u32>,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    #[arg(short, long, default_value_t = 1, env = "BATCHPIX_JOBS")]
    pub jobs: usize,

    /// Write a per-file CSV report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Print every converted file
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl ConvertArgs {
    /// 实际使用的编码质量
    pub fn effective_quality(&self) -> u8 {
        self.quality.unwrap_or(DEFAULT_QUALITY)
    }

    /// 显式给出了质量但输出格式不使用它
    pub fn quality_ignored(&self) -> bool {
        self.quality.is_some() && !self.format.uses_quality()
    }

    /// 由参数推导缩放策略
    pub fn resize_policy(&self) -> ResizePolicy {
        if let Some(factor) = self.percent {
            return ResizePolicy::Percent { factor };
        }
        if self.width.is_some() || self.height.is_some() {
            return ResizePolicy::Absolute {
                width: self.width,
                height: self.height,
                keep_aspect: !self.stretch,
            };
        }
        ResizePolicy::None
    }
}
