//! # 统一错误处理模块
//!
//! 定义 BatchPix 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误等级
//! - 单文件错误（解码、编码、写入）：由引擎捕获并跳过，不会中断批处理
//! - 批处理错误（输出目录无法创建）：转换为 `RunOutcome::Failure`
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// BatchPix 统一错误类型
#[derive(Error, Debug)]
pub enum BatchPixError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path}: {source}")]
    OutputDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 图像编解码错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to decode image: {path}\nReason: {source}")]
    DecodeError {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode {format}: {reason}")]
    EncodeError { format: String, reason: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // ─────────────────────────────────────────────────────────────
    // 引擎错误
    // ─────────────────────────────────────────────────────────────
    #[error("A conversion run is already active on this engine")]
    EngineBusy,

    #[error("Failed to spawn conversion worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No image files found in: {inputs}")]
    NoImagesFound { inputs: String },

    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, BatchPixError>;
