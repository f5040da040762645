//! # 缩放规划
//!
//! 纯函数：根据缩放策略计算目标尺寸，并用 Lanczos3 执行缩放。
//!
//! ## 取整规则
//! - 统一使用 `f64::round`（四舍五入，.5 远离零）
//! - 任何输出维度最小为 1
//!
//! ## 依赖关系
//! - 被 `batch/engine.rs` 调用
//! - 使用 `models/job.rs` 中的 `ResizePolicy`

use crate::models::ResizePolicy;

use image::imageops::FilterType;
use image::DynamicImage;

/// 计算目标尺寸
///
/// `keep_aspect` 且宽高都给定时取较小比例（fit-within），
/// 保证结果不超过任一边界。
pub fn plan(width: u32, height: u32, policy: &ResizePolicy) -> (u32, u32) {
    match *policy {
        ResizePolicy::None => (width, height),
        ResizePolicy::Percent { factor } => {
            if factor == 0 {
                return (width, height);
            }
            let ratio = factor as f64 / 100.0;
            (scale(width, ratio), scale(height, ratio))
        }
        ResizePolicy::Absolute {
            width: target_w,
            height: target_h,
            keep_aspect,
        } => {
            // 0 与缺省等价
            let target_w = target_w.filter(|&v| v > 0);
            let target_h = target_h.filter(|&v| v > 0);

            match (target_w, target_h, keep_aspect) {
                (None, None, _) => (width, height),
                (w, h, false) => (w.unwrap_or(width), h.unwrap_or(height)),
                (Some(w), None, true) => {
                    let ratio = w as f64 / width as f64;
                    (w, scale(height, ratio))
                }
                (None, Some(h), true) => {
                    let ratio = h as f64 / height as f64;
                    (scale(width, ratio), h)
                }
                (Some(w), Some(h), true) => {
                    let ratio = (w as f64 / width as f64).min(h as f64 / height as f64);
                    (scale(width, ratio), scale(height, ratio))
                }
            }
        }
    }
}

fn scale(dim: u32, ratio: f64) -> u32 {
    ((dim as f64 * ratio).round() as u32).max(1)
}

/// 按策略缩放图像；尺寸不变时原样返回
pub fn apply(img: DynamicImage, policy: &ResizePolicy) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let (new_w, new_h) = plan(width, height, policy);
    if (new_w, new_h) == (width, height) {
        return img;
    }
    log::debug!("resizing {}x{} -> {}x{}", width, height, new_w, new_h);
    img.resize_exact(new_w, new_h, FilterType::Lanczos3)
}
