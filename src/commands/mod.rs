//! # Tauri Command 处理模块
//!
//! 本模块包含所有注册到 Tauri 的 command 处理函数。
//! 每个子模块对应一个功能域：
//! - `auth` - 登录、注册、登出和会话查询
//! - `projects` - 首页项目列表、概览、新建和删除
//! - `editor` - 编辑器草稿、运行、保存和快捷键
//! - `export` - 单文件导出和 ZIP 打包导出

pub mod auth;
pub mod editor;
pub mod export;
pub mod projects;
