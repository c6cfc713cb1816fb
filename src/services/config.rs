//! # 客户端配置读取
//!
//! 配置文件位于 `~/.codeforge/config.json`，字段均可省略（缺省取默认值）。
//! 环境变量 `CODEFORGE_API_URL` 非空时覆盖 `apiBaseUrl`。

use std::path::Path;

use crate::models::settings::AppConfig;
use crate::utils::path;

/// 覆盖 API 根地址的环境变量
pub const API_URL_ENV: &str = "CODEFORGE_API_URL";

/// 配置文件名
const CONFIG_FILE: &str = "config.json";

/// 读取客户端配置
///
/// 读取失败时静默返回默认配置，环境变量覆盖仍然生效。
pub async fn read_app_config_internal() -> AppConfig {
    let config = match path::get_app_config_path() {
        Ok(dir) => read_config_file(&dir.join(CONFIG_FILE)).await,
        Err(_) => AppConfig::default(),
    };
    apply_env_override(config, std::env::var(API_URL_ENV).ok())
}

/// 读取指定配置文件；文件不存在或解析失败时返回默认配置
pub async fn read_config_file(config_path: &Path) -> AppConfig {
    if !config_path.exists() {
        return AppConfig::default();
    }

    match tokio::fs::read_to_string(config_path).await {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("解析配置文件失败，使用默认配置: {}", e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

fn apply_env_override(mut config: AppConfig, api_url: Option<String>) -> AppConfig {
    if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
        config.api_base_url = url.trim().to_string();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::{DEFAULT_API_BASE_URL, PreviewMode};

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let config = read_config_file(Path::new("/nonexistent/codeforge/config.json")).await;
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.page_size, 6);
    }

    #[tokio::test]
    async fn test_partial_file_keeps_other_defaults() {
        let dir = std::env::temp_dir().join(format!("codeforge-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join(CONFIG_FILE);
        std::fs::write(&file, r#"{ "pageSize": 12, "previewMode": "file" }"#).unwrap();

        let config = read_config_file(&file).await;
        assert_eq!(config.page_size, 12);
        assert_eq!(config.preview_mode, PreviewMode::File);
        assert_eq!(config.project_cache_ttl_secs, 30);

        std::fs::write(&file, "not json").unwrap();
        assert_eq!(read_config_file(&file).await, AppConfig::default());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_env_override() {
        let config = apply_env_override(AppConfig::default(), Some(" https://api.test ".into()));
        assert_eq!(config.api_base_url, "https://api.test");

        let config = apply_env_override(AppConfig::default(), Some("  ".into()));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
