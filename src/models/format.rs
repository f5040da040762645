//! # 图像格式定义
//!
//! 支持的输入扩展名与输出格式（封闭集合 PNG / JPG / WEBP）。
//!
//! ## 依赖关系
//! - 被 `batch/collector.rs`, `imaging/encoder.rs`, `cli/convert.rs` 使用
//! - 无外部模块依赖

use clap::ValueEnum;
use std::path::Path;
use std::str::FromStr;

use crate::error::BatchPixError;

/// 可识别的输入扩展名（小写，不含点）
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "tif", "tiff"];

/// 判断路径扩展名是否受支持（大小写不敏感）
pub fn is_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// 支持的输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Lossless PNG (quality is ignored)
    Png,
    /// Baseline JPEG, transparency flattened onto white
    Jpg,
    /// Lossy WebP, alpha preserved
    Webp,
}

impl OutputFormat {
    /// 输出文件扩展名，JPG 固定为 `jpg` 而不是 `jpeg`
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Webp => "webp",
        }
    }

    /// 输出目录名 `BatchPix_{format-lowercase}`
    pub fn output_dir_name(&self) -> String {
        format!("BatchPix_{}", self.extension())
    }

    /// 该格式是否使用质量参数
    pub fn uses_quality(&self) -> bool {
        !matches!(self, OutputFormat::Png)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "PNG"),
            OutputFormat::Jpg => write!(f, "JPG"),
            OutputFormat::Webp => write!(f, "WEBP"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = BatchPixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpg),
            "webp" => Ok(OutputFormat::Webp),
            other => Err(BatchPixError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extension_is_case_insensitive() {
        assert!(is_supported_extension(Path::new("a.PNG")));
        assert!(is_supported_extension(Path::new("dir/b.JpEg")));
        assert!(is_supported_extension(Path::new("c.tiff")));
        assert!(!is_supported_extension(Path::new("d.gif")));
        assert!(!is_supported_extension(Path::new("noext")));
    }

    #[test]
    fn test_output_naming() {
        assert_eq!(OutputFormat::Jpg.extension(), "jpg");
        assert_eq!(OutputFormat::Webp.output_dir_name(), "BatchPix_webp");
        assert_eq!("JPEG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpg);
        assert!("gif".parse::<OutputFormat>().is_err());
        assert!(!OutputFormat::Png.uses_quality());
    }
}
