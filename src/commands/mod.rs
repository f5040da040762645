//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `utils/` 以及库中的 `batch/`, `models/`
//! - 子模块: convert, scan

pub mod convert;
pub mod scan;

use crate::cli::Commands;
use batchpix::error::{BatchPixError, Result};

use std::path::PathBuf;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Convert(args) => convert::execute(args),
        Commands::Scan(args) => scan::execute(args),
    }
}

/// 展开命令行输入，含通配符的参数按 glob 匹配，其余原样保留
pub fn expand_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        if !input.contains(['*', '?', '[']) {
            paths.push(PathBuf::from(input));
            continue;
        }

        let entries = glob::glob(input).map_err(|e| BatchPixError::InvalidPattern {
            pattern: input.clone(),
            reason: e.to_string(),
        })?;

        let before = paths.len();
        for entry in entries {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => log::debug!("skipping unreadable glob match: {}", e),
            }
        }
        if paths.len() == before {
            log::warn!("pattern '{}' matched nothing", input);
        }
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_expand_inputs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();
        fs::write(dir.path().join("b.png"), b"x").unwrap();
        fs::write(dir.path().join("c.jpg"), b"x").unwrap();

        let pattern = format!("{}/*.png", dir.path().display());
        let plain = "plain/folder".to_string();
        let paths = expand_inputs(&[pattern, plain]).unwrap();

        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0], dir.path().join("a.png"));
        assert_eq!(paths[1], dir.path().join("b.png"));
        assert_eq!(paths[2], PathBuf::from("plain/folder"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = expand_inputs(&["[".to_string()]).unwrap_err();
        assert!(matches!(err, BatchPixError::InvalidPattern { .. }));
    }
}
