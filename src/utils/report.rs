//! # 转换报告导出
//!
//! 将每个文件的处理结果导出为 CSV，便于事后排查被跳过的文件。
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 调用
//! - 使用 `models/event.rs` 的 FileReport
//! - 使用 `csv` + `serde` 写入 CSV 文件

use batchpix::error::{BatchPixError, Result};
use batchpix::models::{FileReport, FileStatus};

use serde::Serialize;
use std::path::Path;

/// CSV 报告行
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    input: String,
    status: &'a str,
    output: String,
    width: Option<u32>,
    height: Option<u32>,
    reason: &'a str,
}

impl<'a> From<&'a FileReport> for ReportRow<'a> {
    fn from(report: &'a FileReport) -> Self {
        let input = report.input.display().to_string();
        match &report.status {
            FileStatus::Converted {
                output,
                width,
                height,
            } => ReportRow {
                input,
                status: "converted",
                output: output.display().to_string(),
                width: Some(*width),
                height: Some(*height),
                reason: "",
            },
            FileStatus::Skipped { reason } => ReportRow {
                input,
                status: "skipped",
                output: String::new(),
                width: None,
                height: None,
                reason,
            },
        }
    }
}

/// 导出转换报告为 CSV 格式
pub fn write_csv(files: &[FileReport], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for file in files {
        wtr.serialize(ReportRow::from(file))?;
    }

    wtr.flush().map_err(|e| BatchPixError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.csv");
        let files = vec![
            FileReport {
                input: PathBuf::from("/in/a.png"),
                status: FileStatus::Converted {
                    output: PathBuf::from("/out/a.jpg"),
                    width: 50,
                    height: 25,
                },
            },
            FileReport {
                input: PathBuf::from("/in/b.png"),
                status: FileStatus::Skipped {
                    reason: "bad header".to_string(),
                },
            },
        ];

        write_csv(&files, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "input,status,output,width,height,reason");
        assert_eq!(lines[1], "/in/a.png,converted,/out/a.jpg,50,25,");
        assert_eq!(lines[2], "/in/b.png,skipped,,,,bad header");
    }
}
