//! # scan 命令实现
//!
//! 列出输入路径中可识别的图像文件，不做任何转换。
//! 只读取图像头部获取尺寸，无法读取的文件在尺寸列显示 `?`。
//!
//! ## 依赖关系
//! - 使用 `cli/scan.rs` 定义的参数
//! - 使用库中的 `batch/collector.rs`
//! - 使用 `tabled` 输出表格

use super::expand_inputs;
use crate::cli::scan::ScanArgs;
use crate::utils::output;
use batchpix::batch::collect_images_with;
use batchpix::error::{BatchPixError, Result};

use std::fs;
use tabled::{Table, Tabled};

/// 扫描结果表格行
#[derive(Debug, Tabled)]
struct ScanRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Bytes")]
    bytes: String,
}

/// 执行 scan 命令
pub fn execute(args: ScanArgs) -> Result<()> {
    let paths = expand_inputs(&args.inputs)?;
    let images = collect_images_with(&paths, !args.no_follow);

    if images.is_empty() {
        return Err(BatchPixError::NoImagesFound {
            inputs: args.inputs.join(", "),
        });
    }

    let rows: Vec<ScanRow> = images
        .iter()
        .enumerate()
        .map(|(i, image)| {
            let size = match image::image_dimensions(image.as_path()) {
                Ok((w, h)) => format!("{}x{}", w, h),
                Err(e) => {
                    log::debug!("cannot read dimensions of {}: {}", image, e);
                    "?".to_string()
                }
            };
            let bytes = fs::metadata(image.as_path())
                .map(|m| m.len().to_string())
                .unwrap_or_else(|_| "?".to_string());

            ScanRow {
                index: i + 1,
                file: image.to_string(),
                size,
                bytes,
            }
        })
        .collect();

    output::print_header(&format!("Found {} Image(s)", rows.len()));
    println!("{}", Table::new(&rows));

    Ok(())
}
