//! # 图像解码
//!
//! 将文件完整解码到内存，读取结束后立即释放文件句柄。
//! 格式优先按文件内容识别，识别不出时退回扩展名。
//!
//! ## 依赖关系
//! - 被 `batch/engine.rs` 调用
//! - 使用 `image` crate

use crate::error::{BatchPixError, Result};

use image::{DynamicImage, ImageReader};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// 解码图像文件
pub fn decode_file(path: &Path) -> Result<DynamicImage> {
    let bytes = fs::read(path).map_err(|e| BatchPixError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut reader = ImageReader::new(Cursor::new(bytes));
    if let Ok(format) = image::ImageFormat::from_path(path) {
        reader.set_format(format);
    }
    let reader = reader
        .with_guessed_format()
        .map_err(|e| BatchPixError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

    reader.decode().map_err(|e| BatchPixError::DecodeError {
        path: path.display().to_string(),
        source: e,
    })
}
