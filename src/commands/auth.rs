//! # 认证 Tauri Commands
//!
//! 提供登录会话相关的 Tauri command 处理函数：
//! - `login` - 登录并开始会话
//! - `sign_up` - 注册新账号
//! - `logout` - 结束会话，清空缓存和已打开的编辑器
//! - `current_session` - 查询当前会话（应用启动时用于决定进入首页还是登录页）

use tauri::State;

use crate::models::api::SignUpRequest;
use crate::models::session::Session;
use crate::services::workspace::Workspace;

/// 登录
///
/// # 错误
/// 后端拒绝时返回服务端说明；网络失败时返回 `Network error. Please try again.`
#[tauri::command]
pub async fn login(
    email: String,
    password: String,
    workspace: State<'_, Workspace>,
) -> Result<Session, String> {
    workspace.login(&email, &password).await
}

/// 注册新账号
///
/// # 返回值
/// 成功提示文案
#[tauri::command]
pub async fn sign_up(
    username: String,
    name: String,
    email: String,
    password: String,
    workspace: State<'_, Workspace>,
) -> Result<String, String> {
    let request = SignUpRequest {
        username,
        name,
        email,
        password,
    };
    workspace.sign_up(&request).await.map(String::from)
}

#[tauri::command]
pub async fn logout(workspace: State<'_, Workspace>) -> Result<(), String> {
    workspace.logout().await
}

#[tauri::command]
pub fn current_session(workspace: State<'_, Workspace>) -> Option<Session> {
    workspace.current_session()
}
