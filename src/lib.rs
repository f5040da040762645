//! # BatchPix - 离线批量图像转换
//!
//! 在 PNG / JPG / WEBP 之间批量转换图像，可选缩放，
//! 输出到不覆盖已有文件的唯一路径。
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── batch/     (收集、命名、转换引擎)
//!   ├── imaging/   (解码、缩放规划、编码)
//!   ├── models/    (任务与事件数据模型)
//!   └── error.rs   (错误处理)
//! ```
//!
//! ## 示例
//! ```no_run
//! use batchpix::batch::{collect_images, BatchEngine};
//! use batchpix::models::{ConversionJob, OutputFormat, OutputSpec, ResizePolicy};
//! use std::path::Path;
//!
//! let inputs = collect_images(&["photos"]);
//! let output = OutputSpec::under_base(OutputFormat::Webp, 85, Path::new("out")).unwrap();
//! let job = ConversionJob::new(inputs, ResizePolicy::Percent { factor: 50 }, output);
//!
//! let summary = BatchEngine::new().start(job).unwrap().wait();
//! println!("{:?}", summary.outcome);
//! ```

pub mod batch;
pub mod error;
pub mod imaging;
pub mod models;

pub use error::{BatchPixError, Result};
