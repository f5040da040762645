//! # 美化输出工具
//!
//! 统一的终端输出样式。状态前缀：
//! `[OK]` 单个文件完成，`[SKIP]` 跳过，`[WARN]`，`[ERR]`，`[*]` 信息，`[DONE]` 汇总。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::Colorize;
use std::path::Path;

/// 打印错误消息（stderr）
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印被跳过的文件及原因
pub fn print_skip(input: &Path, reason: &str) {
    println!(
        "{} {} {}",
        "[SKIP]".dimmed(),
        file_label(input),
        reason.dimmed()
    );
}

/// 打印单个文件转换结果，附带输出尺寸
pub fn print_conversion(input: &Path, output: &Path, size: (u32, u32)) {
    println!(
        "{} {} {} {} {}",
        "[OK]".green().bold(),
        file_label(input).dimmed(),
        "->".cyan(),
        output.display(),
        format!("{}x{}", size.0, size.1).dimmed()
    );
}

/// 打印运行汇总
pub fn print_done(converted: usize, skipped: usize, output_dir: &Path) {
    let skipped_text = format!("{} skipped", skipped);
    println!(
        "{} Converted {} file(s) into '{}' ({})",
        "[DONE]".green().bold(),
        converted.to_string().bold(),
        output_dir.display(),
        if skipped > 0 {
            skipped_text.yellow()
        } else {
            skipped_text.normal()
        }
    );
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 文件名，没有文件名时退回完整路径
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_label() {
        assert_eq!(file_label(Path::new("/in/photos/a.png")), "a.png");
        assert_eq!(file_label(Path::new("/")), "/");
    }
}
