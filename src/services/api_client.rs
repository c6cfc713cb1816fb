//! # 远程 API 客户端
//!
//! 所有后端调用的唯一出口。基于一个可配置的根地址拼接接口路径，
//! 每个接口都是 `POST` + JSON 请求体。
//!
//! ## 错误分类
//! - `ApiError::Network`：请求发送失败或响应体无法解析（对应浏览器端 `fetch` 抛异常）
//! - `ApiError::Rejected`：后端返回 `success: false`，附带服务端说明（可能为空）
//!
//! 客户端不做重试、退避、超时或批量合并：每次用户操作恰好对应一次请求。

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::api::{
    AckResponse, CreateProjectRequest, CreateProjectResponse, DeleteProjectRequest,
    ExecuteRequest, ExecuteResponse, LoginRequest, LoginResponse, ProjectRequest,
    ProfileStats, ProfileStatsResponse, ProjectResponse, ProjectsResponse, SignUpRequest,
    UpdateProjectRequest, UserDetails, UserDetailsResponse, UserRequest,
};
use crate::models::project::{Language, ProjectRecord};
use crate::models::session::Session;

/// 后端未给出说明时的通用失败文案
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// API 调用错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 传输层失败：连接失败、响应不是合法 JSON 等
    Network(String),
    /// 应用层失败：后端返回 `success: false`，附带可选的服务端说明
    Rejected(Option<String>),
}

impl ApiError {
    /// 应用层失败的说明；没有说明时使用调用方给定的兜底文案
    pub fn rejection_or<'a>(&'a self, fallback: &'a str) -> Option<&'a str> {
        match self {
            ApiError::Rejected(message) => Some(message.as_deref().unwrap_or(fallback)),
            ApiError::Network(_) => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(message) => write!(f, "Network Error: {}", message),
            ApiError::Rejected(message) => {
                write!(f, "Error: {}", message.as_deref().unwrap_or(GENERIC_FAILURE))
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// 远程 API 客户端
///
/// 内部持有 `reqwest::Client`（自带连接池），克隆开销很小。
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// 创建指向 `base_url` 的客户端，末尾多余的 `/` 会被去掉
    ///
    /// 本机后端（`localhost` / 回环地址）不走系统代理。
    pub fn new(base_url: &str) -> Self {
        let http = if is_loopback(base_url) {
            reqwest::Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_else(|_| reqwest::Client::new())
        } else {
            reqwest::Client::new()
        };

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 当前使用的 API 根地址
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 发送一次 JSON POST 请求并解析响应体
    ///
    /// 不检查 HTTP 状态码：后端在业务失败时同样返回 JSON 并用 `success` 字段表达结果。
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        response
            .json::<R>()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    // ======== 认证 ========

    /// 登录，成功时返回后端签发的会话
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let data: LoginResponse = self.post("/login", &request).await?;

        match (data.success, data.user_id, data.token) {
            (true, Some(user_id), Some(token)) => Ok(Session { user_id, token }),
            (true, _, _) => Err(ApiError::Rejected(Some("登录响应缺少 userId 或 token".into()))),
            (false, _, _) => Err(ApiError::Rejected(data.message)),
        }
    }

    /// 注册新账号
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ApiError> {
        let data: AckResponse = self.post("/signUp", request).await?;
        ack(data)
    }

    /// 获取用户资料
    pub async fn get_user_details(&self, user_id: &str) -> Result<UserDetails, ApiError> {
        let request = UserRequest {
            user_id: user_id.to_string(),
        };
        let data: UserDetailsResponse = self.post("/getUserDetails", &request).await?;

        if data.success {
            Ok(data.user.unwrap_or_default())
        } else {
            Err(ApiError::Rejected(data.message))
        }
    }

    /// 获取服务端统计的用户活跃数据（首页统计卡片）
    pub async fn get_profile_stats(&self, user_id: &str) -> Result<ProfileStats, ApiError> {
        let request = UserRequest {
            user_id: user_id.to_string(),
        };
        let data: ProfileStatsResponse = self.post("/getProfileStats", &request).await?;

        if data.success {
            Ok(data.stats.unwrap_or_default())
        } else {
            Err(ApiError::Rejected(data.message))
        }
    }

    // ======== 项目存储 ========

    /// 创建项目，成功时返回新项目 ID
    pub async fn create_project(
        &self,
        user_id: &str,
        title: &str,
        language: Language,
    ) -> Result<String, ApiError> {
        let request = CreateProjectRequest {
            title: title.to_string(),
            user_id: user_id.to_string(),
            language,
        };
        let data: CreateProjectResponse = self.post("/createProject", &request).await?;

        match (data.success, data.project_id) {
            (true, Some(project_id)) => Ok(project_id),
            (true, None) => Err(ApiError::Rejected(Some("创建响应缺少 projectId".into()))),
            (false, _) => Err(ApiError::Rejected(data.message)),
        }
    }

    /// 获取用户的全部项目
    pub async fn get_projects(&self, user_id: &str) -> Result<Vec<ProjectRecord>, ApiError> {
        let request = UserRequest {
            user_id: user_id.to_string(),
        };
        let data: ProjectsResponse = self.post("/getProjects", &request).await?;

        if data.success {
            Ok(data.projects)
        } else {
            Err(ApiError::Rejected(data.message))
        }
    }

    /// 获取单个项目的完整记录
    pub async fn get_project(
        &self,
        user_id: &str,
        project_id: &str,
    ) -> Result<ProjectRecord, ApiError> {
        let request = ProjectRequest {
            user_id: user_id.to_string(),
            proj_id: project_id.to_string(),
        };
        let data: ProjectResponse = self.post("/getProject", &request).await?;

        match (data.success, data.project) {
            (true, Some(project)) => Ok(project),
            (true, None) => Err(ApiError::Rejected(Some("项目不存在".into()))),
            (false, _) => Err(ApiError::Rejected(data.message)),
        }
    }

    /// 覆盖写入项目缓冲区（后写者胜，无版本校验）
    pub async fn update_project(&self, request: &UpdateProjectRequest) -> Result<(), ApiError> {
        let data: AckResponse = self.post("/updateProject", request).await?;
        ack(data)
    }

    /// 删除项目
    pub async fn delete_project(&self, user_id: &str, project_id: &str) -> Result<(), ApiError> {
        let request = DeleteProjectRequest {
            prog_id: project_id.to_string(),
            user_id: user_id.to_string(),
        };
        let data: AckResponse = self.post("/deleteProject", &request).await?;
        ack(data)
    }

    // ======== 代码执行 ========

    /// 在远程执行服务上运行单文件代码，成功时返回捕获的输出
    ///
    /// 失败说明优先取 `error` 字段，其次 `message`
    pub async fn execute_code(&self, request: &ExecuteRequest) -> Result<String, ApiError> {
        let data: ExecuteResponse = self.post("/executeCode", request).await?;

        if data.success {
            Ok(data.output.unwrap_or_default())
        } else {
            Err(ApiError::Rejected(data.error.or(data.message)))
        }
    }
}

fn is_loopback(base_url: &str) -> bool {
    let Ok(url) = reqwest::Url::parse(base_url) else {
        return false;
    };
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_matches(['[', ']'])
            .parse::<std::net::IpAddr>()
            .is_ok_and(|ip| ip.is_loopback()),
        None => false,
    }
}

/// 将通用应答转换为 Result
fn ack(data: AckResponse) -> Result<(), ApiError> {
    if data.success {
        Ok(())
    } else {
        Err(ApiError::Rejected(data.message))
    }
}
