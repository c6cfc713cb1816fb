//! # 业务逻辑服务模块
//!
//! 包含核心业务逻辑的实现，与 Tauri command 层解耦：
//! - `api_client` - 远程 API 客户端（认证、项目存储、代码执行）
//! - `session` - 会话存储：登录/登出生命周期与持久化
//! - `cache` - 内存缓存管理（项目列表 TTL 缓存和删除墓碑）
//! - `config` - 客户端配置读取
//! - `editor` - 编辑器草稿：缓冲区、标签页、输出区
//! - `executor` - 代码执行状态机与输出文案
//! - `preview` - web 项目预览渲染
//! - `persistence` - 保存请求构造与结果文案
//! - `export` - 单文件导出和 ZIP 打包导出
//! - `project_query` - 项目列表的过滤、排序、分页和统计
//! - `shortcuts` - 编辑器快捷键
//! - `workspace` - 应用工作区：把以上服务组合为用户操作

pub mod api_client;
pub mod cache;
pub mod config;
pub mod editor;
pub mod executor;
pub mod export;
pub mod persistence;
pub mod preview;
pub mod project_query;
pub mod session;
pub mod shortcuts;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_support;
