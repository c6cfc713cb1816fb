//! # 远程 API 线格式
//!
//! 定义了与后端 REST 接口交互的请求体和响应体结构。
//! 所有接口均为 `POST` + JSON，字段名为 camelCase。
//!
//! 响应体统一带 `success` 布尔字段；`success: false` 时可能附带 `message`
//! 或 `error` 说明。所有可选字段都声明 `#[serde(default)]`，
//! 后端省略字段时不会导致反序列化失败。

use serde::{Deserialize, Serialize};

use crate::models::project::{Language, ProjectRecord};

// ============ 请求体 ============

/// `/login` 请求体
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `/signUp` 请求体
#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// 仅携带用户 ID 的请求体（`/getProjects`、`/getUserDetails`、`/getProfileStats`）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub user_id: String,
}

/// `/createProject` 请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    pub user_id: String,
    pub language: Language,
}

/// `/getProject` 请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub user_id: String,
    pub proj_id: String,
}

/// `/updateProject` 请求体
///
/// 两种缓冲区布局的字段均为可选，且 `None` 时不序列化：
/// web 项目只发送 `htmlCode`/`cssCode`/`jsCode`，单文件项目只发送 `code`。
/// 由 `persistence::build_update_request` 按 `ProjectContent` 穷尽构造。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub user_id: String,
    pub proj_id: String,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub js_code: Option<String>,
}

/// `/deleteProject` 请求体
///
/// 注意后端此接口的项目 ID 字段名为 `progId`（与其他接口的 `projId` 不同）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProjectRequest {
    pub prog_id: String,
    pub user_id: String,
}

/// `/executeCode` 请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub user_id: String,
    pub proj_id: String,
    pub code: String,
    pub language: Language,
    pub input: String,
}

// ============ 响应体 ============

/// 只关心成功与否的通用应答（`/signUp`、`/updateProject`、`/deleteProject`）
#[derive(Debug, Clone, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// `/login` 响应体
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `/createProject` 响应体
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `/getProjects` 响应体
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `/getProject` 响应体
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub project: Option<ProjectRecord>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `/executeCode` 响应体
///
/// 成功时 `output` 为捕获的 stdout；失败时说明可能在 `error` 或 `message` 中
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `/getUserDetails` 响应体
#[derive(Debug, Clone, Deserialize)]
pub struct UserDetailsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<UserDetails>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 用户资料（首页头部展示）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// `/getProfileStats` 响应体
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileStatsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub stats: Option<ProfileStats>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 服务端统计的用户活跃数据
///
/// 每个字段都可能缺失，缺失时首页改用本地按项目列表计算的值。
///
/// ```json
/// {
///   "totalProjects": 12,
///   "activeDays": 9,
///   "daysCoding": 40,
///   "joinDate": "2024-01-15T08:00:00.000Z",
///   "languages": [{ "language": "python", "count": 5 }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    #[serde(default)]
    pub total_projects: Option<u64>,
    #[serde(default)]
    pub active_days: Option<u64>,
    /// 自注册以来的总天数
    #[serde(default)]
    pub days_coding: Option<u64>,
    #[serde(default)]
    pub join_date: Option<String>,
    /// 按使用次数降序排列
    #[serde(default)]
    pub languages: Vec<ProfileLanguage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileLanguage {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
}
