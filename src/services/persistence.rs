//! # 项目保存
//!
//! 显式保存（按钮或 `Ctrl+S`）将草稿的完整缓冲区连同 `input` 写回 `/updateProject`。
//! 请求体按 `ProjectContent` 穷尽构造：web 项目只带 HTML/CSS/JS 三件套，
//! 单文件项目只带 `code`，从不发送另一种布局的字段。
//!
//! 没有防抖、自动保存或冲突检测：后写者胜。

use serde::Serialize;

use crate::models::api::UpdateProjectRequest;
use crate::models::project::ProjectContent;
use crate::services::api_client::{ApiError, GENERIC_FAILURE};

/// 保存成功提示
pub const SAVE_SUCCESS: &str = "Project saved successfully";

/// 传输失败提示
pub const SAVE_NETWORK_FAILURE: &str = "Failed to save project. Please try again.";

/// 构造 `/updateProject` 请求体
pub fn build_update_request(
    user_id: &str,
    project_id: &str,
    content: &ProjectContent,
    input: &str,
) -> UpdateProjectRequest {
    let mut request = UpdateProjectRequest {
        user_id: user_id.to_string(),
        proj_id: project_id.to_string(),
        input: input.to_string(),
        code: None,
        html_code: None,
        css_code: None,
        js_code: None,
    };

    match content {
        ProjectContent::Web { html, css, js } => {
            request.html_code = Some(html.clone());
            request.css_code = Some(css.clone());
            request.js_code = Some(js.clone());
        }
        ProjectContent::SingleFile { code, .. } => {
            request.code = Some(code.clone());
        }
    }

    request
}

/// 一次保存的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SaveOutcome {
    Saved,
    /// 后端返回 `success: false`
    Rejected,
    /// 请求未能完成
    Failed,
}

impl SaveOutcome {
    pub fn from_result(result: &Result<(), ApiError>) -> Self {
        match result {
            Ok(()) => SaveOutcome::Saved,
            Err(ApiError::Rejected(_)) => SaveOutcome::Rejected,
            Err(ApiError::Network(_)) => SaveOutcome::Failed,
        }
    }

    /// 提示框文案
    pub fn message(self) -> &'static str {
        match self {
            SaveOutcome::Saved => SAVE_SUCCESS,
            SaveOutcome::Rejected => GENERIC_FAILURE,
            SaveOutcome::Failed => SAVE_NETWORK_FAILURE,
        }
    }
}

/// 返回给前端的保存报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReport {
    pub outcome: SaveOutcome,
    pub message: &'static str,
}

impl From<SaveOutcome> for SaveReport {
    fn from(outcome: SaveOutcome) -> Self {
        Self {
            outcome,
            message: outcome.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::Language;

    #[test]
    fn test_web_request_carries_only_the_triple() {
        let content = ProjectContent::Web {
            html: "<p>a</p>".into(),
            css: String::new(),
            js: "x()".into(),
        };
        let body = serde_json::to_value(build_update_request("u1", "w1", &content, "")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "userId": "u1",
                "projId": "w1",
                "input": "",
                "htmlCode": "<p>a</p>",
                "cssCode": "",
                "jsCode": "x()",
            })
        );
    }

    #[test]
    fn test_single_file_request_carries_only_code() {
        let content = ProjectContent::SingleFile {
            language: Language::Java,
            code: "class A {}".into(),
        };
        let body = serde_json::to_value(build_update_request("u1", "j1", &content, "5")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "userId": "u1", "projId": "j1", "input": "5", "code": "class A {}" })
        );
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            SaveOutcome::from_result(&Ok(())).message(),
            "Project saved successfully"
        );
        assert_eq!(
            SaveOutcome::from_result(&Err(ApiError::Rejected(Some("quota".into())))).message(),
            "Something went wrong"
        );
        assert_eq!(
            SaveOutcome::from_result(&Err(ApiError::Network("reset".into()))).message(),
            "Failed to save project. Please try again."
        );
    }
}
