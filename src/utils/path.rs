//! # 路径工具函数
//!
//! 提供与文件路径相关的工具函数，包括：
//! - 获取 CodeForge 自身配置目录路径（`~/.codeforge/`）
//! - 获取导出文件的默认目标目录（系统下载目录）
//! - 将项目标题清洗为合法的文件名

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

/// 文件名中不允许出现的字符：Windows 保留字符 + ASCII 控制字符
///
/// 使用 `LazyLock` 实现全局唯一的预编译正则
static INVALID_FILE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).unwrap());

/// 获取 CodeForge 配置目录的绝对路径
///
/// 会话凭据（`session.json`）和客户端配置（`config.json`）都存放在此目录下。
///
/// # 错误
/// 如果无法确定用户主目录，返回错误信息。
pub fn get_app_config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "无法获取用户主目录".to_string())?;
    Ok(home.join(".codeforge"))
}

/// 获取导出文件的默认目录
///
/// 优先使用系统下载目录，部分 Linux 环境没有配置 XDG 下载目录时回退到主目录。
///
/// # 错误
/// 下载目录和主目录都无法确定时返回错误信息。
pub fn get_download_dir() -> Result<PathBuf, String> {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| "无法获取下载目录".to_string())
}

/// 将任意字符串清洗为可在各平台落盘的文件名
///
/// - 非法字符替换为 `_`
/// - 去除首尾空白和末尾的 `.`（Windows 不允许以点结尾）
/// - 清洗后为空时返回 `"project"`
///
/// # 示例
/// ```
/// # use app_lib::utils::path::sanitize_file_name;
/// assert_eq!(sanitize_file_name("a/b:c.py"), "a_b_c.py");
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    let replaced = INVALID_FILE_NAME_CHARS.replace_all(name, "_");
    let trimmed = replaced.trim().trim_end_matches('.').trim_end();

    if trimmed.is_empty() {
        "project".to_string()
    } else {
        trimmed.to_string()
    }
}
