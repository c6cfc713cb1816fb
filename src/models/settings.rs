//! # 应用配置数据模型
//!
//! 定义了 CodeForge 客户端配置（AppConfig）的 Rust 结构体。
//! 配置存储在 `~/.codeforge/config.json`，所有字段均可省略，缺省时使用默认值。

use serde::{Deserialize, Serialize};

/// 默认的后端 API 地址（本地开发服务器）
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";

/// 首页项目列表每页条数
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// 项目列表缓存的默认有效期（秒）
pub const DEFAULT_PROJECT_CACHE_TTL_SECS: u64 = 30;

/// 同时保留在内存中的编辑器草稿数量上限
pub const DEFAULT_MAX_OPEN_EDITORS: usize = 8;

/// web 项目实时预览的渲染方式
///
/// 对应 `services::preview` 中的两种 `PreviewRenderer` 实现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreviewMode {
    /// 将合成文档作为 `srcdoc` 交给前端沙箱 iframe
    #[default]
    Srcdoc,
    /// 将合成文档写入临时目录下的 HTML 文件
    File,
}

/// 客户端配置
///
/// 对应 `~/.codeforge/config.json`：
/// ```json
/// {
///   "apiBaseUrl": "https://api.example.com",
///   "pageSize": 6,
///   "projectCacheTtlSecs": 30,
///   "maxOpenEditors": 8,
///   "previewMode": "srcdoc",
///   "downloadDir": null
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// 后端 API 根地址，所有接口路径拼接在其后；
    /// 环境变量 `CODEFORGE_API_URL` 优先于配置文件
    pub api_base_url: String,

    /// 首页项目列表每页条数
    pub page_size: usize,

    /// 项目列表缓存有效期（秒）
    pub project_cache_ttl_secs: u64,

    /// 同时打开的编辑器数量上限
    pub max_open_editors: usize,

    /// web 项目预览渲染方式
    pub preview_mode: PreviewMode,

    /// 导出文件的目标目录；为空时使用系统下载目录
    pub download_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            project_cache_ttl_secs: DEFAULT_PROJECT_CACHE_TTL_SECS,
            max_open_editors: DEFAULT_MAX_OPEN_EDITORS,
            preview_mode: PreviewMode::default(),
            download_dir: None,
        }
    }
}
