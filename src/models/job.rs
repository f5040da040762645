//! # 转换任务数据模型
//!
//! 一次 "convert" 调用对应一个不可变的 `ConversionJob`：
//! 有序输入列表 + 缩放策略 + 输出规格。
//!
//! ## 依赖关系
//! - 被 `batch/collector.rs`, `batch/engine.rs`, `imaging/resize.rs` 使用
//! - 使用 `models/format.rs`

use super::format::{is_supported_extension, OutputFormat};
use crate::error::{BatchPixError, Result};

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// 已确认指向受支持图像的绝对路径
///
/// 相等性按规范化路径比较，用于输入集合去重。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImagePath(PathBuf);

impl ImagePath {
    /// 路径是普通文件且扩展名受支持时返回 `Some`
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if !path.is_file() || !is_supported_extension(path) {
            return None;
        }
        Some(ImagePath(normalize(path)))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// 不含扩展名的文件名，用作输出文件名（保留非 UTF-8 字节）
    pub fn stem(&self) -> &OsStr {
        self.0.file_stem().unwrap_or_else(|| OsStr::new("image"))
    }
}

impl AsRef<Path> for ImagePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// 规范化路径：优先 canonicalize（解析符号链接），失败时退回绝对路径
fn normalize(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// 缩放策略，每次运行只有一种生效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizePolicy {
    /// 保持原尺寸
    #[default]
    None,
    /// 指定宽/高（任一可省略）
    Absolute {
        width: Option<u32>,
        height: Option<u32>,
        keep_aspect: bool,
    },
    /// 按百分比缩放，通常 1..=500
    Percent { factor: u32 },
}

impl fmt::Display for ResizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dim = |d: &Option<u32>| d.map_or_else(|| "auto".to_string(), |v| v.to_string());
        match self {
            ResizePolicy::None => write!(f, "no resize"),
            ResizePolicy::Absolute {
                width,
                height,
                keep_aspect,
            } => write!(
                f,
                "{}x{}{}",
                dim(width),
                dim(height),
                if *keep_aspect { " (keep aspect)" } else { "" }
            ),
            ResizePolicy::Percent { factor } => write!(f, "{}%", factor),
        }
    }
}

/// 输出规格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    format: OutputFormat,
    quality: u8,
    destination: PathBuf,
}

impl OutputSpec {
    /// 创建输出规格，质量必须在 1..=100 内（PNG 忽略质量但仍校验）
    pub fn new(format: OutputFormat, quality: u8, destination: impl Into<PathBuf>) -> Result<Self> {
        if !(1..=100).contains(&quality) {
            return Err(BatchPixError::InvalidArgument(format!(
                "quality must be within 1..=100, got {}",
                quality
            )));
        }
        Ok(OutputSpec {
            format,
            quality,
            destination: destination.into(),
        })
    }

    /// 使用约定目录 `{base}/BatchPix_{format}/` 作为输出目录
    pub fn under_base(format: OutputFormat, quality: u8, base: &Path) -> Result<Self> {
        Self::new(format, quality, base.join(format.output_dir_name()))
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

/// 一次批量转换任务，创建后不可变
#[derive(Debug, Clone)]
pub struct ConversionJob {
    inputs: Vec<ImagePath>,
    policy: ResizePolicy,
    output: OutputSpec,
}

impl ConversionJob {
    pub fn new(inputs: Vec<ImagePath>, policy: ResizePolicy, output: OutputSpec) -> Self {
        ConversionJob {
            inputs,
            policy,
            output,
        }
    }

    pub fn inputs(&self) -> &[ImagePath] {
        &self.inputs
    }

    pub fn policy(&self) -> ResizePolicy {
        self.policy
    }

    pub fn output(&self) -> &OutputSpec {
        &self.output
    }

    pub fn total(&self) -> usize {
        self.inputs.len()
    }
}
