//! # 输出文件命名
//!
//! 生成不覆盖已有文件的输出路径：`name.ext` 被占用时依次尝试
//! `name (1).ext`, `name (2).ext`, ...
//!
//! 只做存在性检查，不创建文件。
//!
//! ## 依赖关系
//! - 被 `batch/engine.rs` 调用
//! - 无外部模块依赖

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// 返回第一个未被占用的路径
pub fn unique_path(path: &Path) -> PathBuf {
    unique_path_with(path, |candidate| candidate.exists())
}

/// 使用自定义占用判断生成路径
///
/// 并行转换时引擎会把已预留但尚未写出的路径也视为占用。
pub fn unique_path_with<F>(path: &Path, is_taken: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    if !is_taken(path) {
        return path.to_path_buf();
    }

    let stem = path.file_stem().unwrap_or_default();
    let extension = path.extension();
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    (1u64..)
        .map(|i| {
            let mut name = OsString::from(stem);
            name.push(format!(" ({})", i));
            if let Some(ext) = extension {
                name.push(".");
                name.push(ext);
            }
            parent.join(name)
        })
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| path.to_path_buf())
}

/// 输出文件的候选路径 `{dir}/{stem}.{ext}`
pub fn candidate_path(directory: &Path, stem: &OsStr, extension: &str) -> PathBuf {
    let mut name = OsString::from(stem);
    name.push(".");
    name.push(extension);
    directory.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_free_path_is_returned_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.jpg");
        assert_eq!(unique_path(&path), path);
    }

    #[test]
    fn test_lowest_free_slot() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        fs::write(dir.path().join("a (1).jpg"), b"x").unwrap();
        fs::write(dir.path().join("a (2).jpg"), b"x").unwrap();
        fs::write(dir.path().join("a (4).jpg"), b"x").unwrap();

        let path = dir.path().join("a.jpg");
        let first = unique_path(&path);
        assert_eq!(first, dir.path().join("a (3).jpg"));
        // 未创建文件时重复调用结果相同
        assert_eq!(unique_path(&path), first);
        assert!(!first.exists());
    }

    #[test]
    fn test_directory_entry_counts_as_taken() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("a.png")).unwrap();
        assert_eq!(
            unique_path(&dir.path().join("a.png")),
            dir.path().join("a (1).png")
        );
    }

    #[test]
    fn test_custom_predicate() {
        let reserved: HashSet<PathBuf> = [PathBuf::from("/out/x.webp"), PathBuf::from("/out/x (1).webp")]
            .into_iter()
            .collect();
        let path = unique_path_with(Path::new("/out/x.webp"), |p| reserved.contains(p));
        assert_eq!(path, PathBuf::from("/out/x (2).webp"));
    }

    #[test]
    fn test_candidate_path() {
        assert_eq!(
            candidate_path(Path::new("/out"), OsStr::new("photo"), "jpg"),
            PathBuf::from("/out/photo.jpg")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_stem_is_kept() {
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let stem = OsStr::from_bytes(b"caf\xE9");
        let candidate = candidate_path(dir.path(), stem, "jpg");
        assert_eq!(candidate.file_name().unwrap().as_bytes(), b"caf\xE9.jpg");

        fs::write(&candidate, b"x").unwrap();
        let next = unique_path(&candidate);
        assert_eq!(next.file_name().unwrap().as_bytes(), b"caf\xE9 (1).jpg");
    }
}
