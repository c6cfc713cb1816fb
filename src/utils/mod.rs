//! # 通用工具模块
//!
//! - `path` - 配置目录、下载目录定位和文件名清洗
//! - `time` - ISO 8601 时间与文档 ID 时间戳解析

pub mod path;
pub mod time;
