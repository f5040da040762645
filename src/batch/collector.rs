//! # 图像文件收集器
//!
//! 根据输入路径收集待转换的图像文件列表。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - 按扩展名过滤（大小写不敏感）
//! - 完整递归目录，兄弟条目按文件名排序，结果可复现
//! - 跟随符号链接，检测并跳过循环
//! - 多个输入合并去重
//!
//! 不存在或不受支持的路径返回空列表，不报错。
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs`, `commands/scan.rs` 调用
//! - 使用 `walkdir` 遍历目录

use crate::models::ImagePath;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 图像文件收集器
pub struct ImageCollector {
    /// 输入路径
    input: PathBuf,
    /// 是否跟随符号链接
    follow_links: bool,
}

impl ImageCollector {
    /// 创建新的收集器
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            follow_links: true,
        }
    }

    /// 设置是否跟随符号链接（默认跟随）
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// 收集所有受支持的图像文件
    pub fn collect(&self) -> Vec<ImagePath> {
        if self.input.is_file() {
            return ImagePath::new(&self.input).into_iter().collect();
        }

        if !self.input.is_dir() {
            log::debug!("skipping missing path {}", self.input.display());
            return vec![];
        }

        // 开启 follow_links 时 walkdir 会把符号链接循环报告为错误条目
        WalkDir::new(&self.input)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::debug!("skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| ImagePath::new(entry.path()))
            .collect()
    }
}

/// 扫描单个路径
pub fn scan_path(path: &Path) -> Vec<ImagePath> {
    ImageCollector::new(path).collect()
}

/// 合并多个输入路径的扫描结果，保留首次出现的顺序并去重
pub fn collect_images<P: AsRef<Path>>(paths: &[P]) -> Vec<ImagePath> {
    collect_images_with(paths, true)
}

/// 同 `collect_images`，可指定是否跟随符号链接
pub fn collect_images_with<P: AsRef<Path>>(paths: &[P], follow_links: bool) -> Vec<ImagePath> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for path in paths {
        let collector = ImageCollector::new(path.as_ref()).follow_links(follow_links);
        for image in collector.collect() {
            if seen.insert(image.clone()) {
                images.push(image);
            }
        }
    }

    images
}
