//! # 数据模型模块
//!
//! 定义了与后端接口和前端 TypeScript 类型一一对应的 Rust 数据结构。
//! - `project` - 项目记录、语言枚举和缓冲区标签变体
//! - `api` - 远程 REST 接口的请求体和响应体
//! - `session` - 登录会话凭据
//! - `settings` - 客户端配置

pub mod api;
pub mod project;
pub mod session;
pub mod settings;
