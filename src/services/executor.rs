//! # 代码执行桥接
//!
//! 单文件语言的一次运行：`Idle → Executing → Idle(输出|错误)`。
//!
//! - 运行中输出区显示 `Executing code...`，运行按钮禁用
//! - 成功：原样显示后端返回的 stdout
//! - 后端拒绝：`Error: <error|message>`，没有说明时为 `Error: Something went wrong`
//! - 传输失败：`Network Error: <message>`
//!
//! 不重试、不超时、不可取消。

use serde::Serialize;

use crate::models::api::ExecuteRequest;
use crate::services::api_client::ApiError;

/// 运行中的输出区文案
pub const EXECUTING_TEXT: &str = "Executing code...";

/// 输出为空时的占位文案
pub const OUTPUT_PLACEHOLDER: &str = "Run your code to see output...";

/// 执行状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionState {
    #[default]
    Idle,
    /// 已发出 `/executeCode` 请求，尚未收到结果
    Executing,
}

/// 一次「运行」操作的计划
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunPlan {
    /// 需要发送远程执行请求
    Remote(ExecuteRequest),
    /// 已有运行在途：不发请求，状态保持不变
    AlreadyRunning,
    /// web 项目：只需刷新本地预览
    Preview,
}

/// 将一次执行结果转换为输出区文本
pub fn describe_outcome(outcome: Result<String, ApiError>) -> String {
    match outcome {
        Ok(output) => output,
        Err(e) => e.to_string(),
    }
}
