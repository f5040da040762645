//! # 图像处理模块
//!
//! 解码、缩放规划与格式编码。
//!
//! ## 依赖关系
//! - 被 `batch/engine.rs` 使用
//! - 使用 `image` 和 `webp` crate
//! - 子模块: decoder, resize, encoder

pub mod decoder;
pub mod encoder;
pub mod resize;

pub use decoder::decode_file;
pub use encoder::encode;
pub use resize::plan;
