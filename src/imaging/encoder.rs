//! # 图像编码器
//!
//! 将解码后的图像编码为目标格式的字节。
//!
//! ## 格式策略
//! - PNG: 无损，最高压缩等级 + 自适应滤波，忽略质量参数
//! - JPG: 无 alpha 通道；透明图像先按 alpha 混合到白色背景
//! - WEBP: 有损编码，method 6（最高压缩努力），保留 alpha
//!
//! 编码结果写入内存缓冲区，失败时不会留下任何输出文件。
//!
//! ## 依赖关系
//! - 被 `batch/engine.rs` 调用
//! - 使用 `image` 完成 PNG/JPEG，使用 `webp`（libwebp）完成 WEBP

use crate::error::{BatchPixError, Result};
use crate::models::OutputFormat;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};

/// WebP 最高压缩努力等级
const WEBP_METHOD_BEST: i32 = 6;

/// JPG 合成时使用的背景色
const JPEG_BACKGROUND: [u8; 3] = [255, 255, 255];

/// 按目标格式编码图像
pub fn encode(img: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Png => encode_png(img),
        OutputFormat::Jpg => encode_jpeg(img, quality),
        OutputFormat::Webp => encode_webp(img, quality),
    }
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    // PNG 不支持浮点像素，先收窄到 16 位
    let normalized;
    let img = match img {
        DynamicImage::ImageRgb32F(_) => {
            normalized = DynamicImage::ImageRgb16(img.to_rgb16());
            &normalized
        }
        DynamicImage::ImageRgba32F(_) => {
            normalized = DynamicImage::ImageRgba16(img.to_rgba16());
            &normalized
        }
        other => other,
    };

    let mut buf = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(|e| encode_error(OutputFormat::Png, e))?;
    Ok(buf)
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = if img.color().has_alpha() {
        flatten_onto(&img.to_rgba8(), JPEG_BACKGROUND)
    } else {
        img.to_rgb8()
    };

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    encoder
        .encode_image(&rgb)
        .map_err(|e| encode_error(OutputFormat::Jpg, e))?;
    Ok(buf)
}

fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut config = webp::WebPConfig::new().map_err(|_| BatchPixError::EncodeError {
        format: OutputFormat::Webp.to_string(),
        reason: "failed to initialise libwebp config".to_string(),
    })?;
    config.lossless = 0;
    config.quality = quality.clamp(1, 100) as f32;
    config.method = WEBP_METHOD_BEST;

    let (width, height) = (img.width(), img.height());
    // libwebp 只接受 8 位 RGB / RGBA
    let has_alpha = img.color().has_alpha();
    let pixels = if has_alpha {
        img.to_rgba8().into_raw()
    } else {
        img.to_rgb8().into_raw()
    };
    let encoder = if has_alpha {
        webp::Encoder::from_rgba(&pixels, width, height)
    } else {
        webp::Encoder::from_rgb(&pixels, width, height)
    };
    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| encode_error(OutputFormat::Webp, format!("{:?}", e)))?;

    Ok(memory.to_vec())
}

/// 按每像素 alpha 将 RGBA 混合到不透明背景上
pub fn flatten_onto(rgba: &RgbaImage, background: [u8; 3]) -> RgbImage {
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let alpha = src[3] as u32;
        let blend = |fg: u8, bg: u8| -> u8 {
            ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8
        };
        *dst = Rgb([
            blend(src[0], background[0]),
            blend(src[1], background[1]),
            blend(src[2], background[2]),
        ]);
    }
    out
}

fn encode_error(format: OutputFormat, reason: impl std::fmt::Display) -> BatchPixError {
    BatchPixError::EncodeError {
        format: format.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, Rgba};

    fn checker_rgba(width: u32, height: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([200, 30, 30, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_flatten_blends_alpha_onto_background() {
        let mut rgba = RgbaImage::new(3, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
        rgba.put_pixel(2, 0, Rgba([0, 0, 0, 128]));

        let rgb = flatten_onto(&rgba, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([10, 20, 30]));
        assert_eq!(rgb.get_pixel(2, 0), &Rgb([127, 127, 127]));
    }

    #[test]
    fn test_jpeg_of_transparent_source_is_white() {
        let transparent = DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 0])));
        let bytes = encode(&transparent, OutputFormat::Jpg, 90).unwrap();

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert!(!decoded.color().has_alpha());
        for (_, _, px) in decoded.pixels() {
            assert!(px[0] > 245 && px[1] > 245 && px[2] > 245, "pixel {:?}", px);
        }
    }

    #[test]
    fn test_png_is_lossless_and_keeps_alpha() {
        let img = checker_rgba(8, 8);
        let bytes = encode(&img, OutputFormat::Png, 1).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn test_png_accepts_float_images() {
        let img = DynamicImage::ImageRgba32F(image::Rgba32FImage::new(4, 4));
        let bytes = encode(&img, OutputFormat::Png, 100).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 4));
    }

    #[test]
    fn test_webp_preserves_alpha() {
        let img = checker_rgba(32, 32);
        let bytes = encode(&img, OutputFormat::Webp, 80).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::WebP).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 32));
        assert!(decoded.color().has_alpha());
    }

    #[test]
    fn test_webp_opaque_source() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 6, Rgb([10, 200, 10])));
        let bytes = encode(&img, OutputFormat::Webp, 50).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::WebP).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 6));
    }
}
