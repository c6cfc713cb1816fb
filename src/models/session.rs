//! # 会话数据模型
//!
//! 登录成功后由后端签发的会话凭据。
//! 替代浏览器端散落在 `localStorage` 中的 `userId` / `token` / `isLoggedIn` 三个键，
//! 由 `services::session::SessionStore` 统一管理生命周期。

use serde::{Deserialize, Serialize};

/// 已登录用户的会话
///
/// 持久化到 `~/.codeforge/session.json`：
/// ```json
/// { "userId": "665f...", "token": "eyJhbGciOi..." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// 用户 ID：所有项目接口的 `userId` 参数
    pub user_id: String,

    /// 后端签发的令牌
    pub token: String,
}
