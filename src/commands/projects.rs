//! # 项目管理 Tauri Commands
//!
//! 提供首页项目列表相关的 Tauri command 处理函数：
//! - `list_projects` - 过滤、排序、分页后的项目列表
//! - `home_overview` - 用户资料和项目统计
//! - `create_project` - 新建项目
//! - `delete_project` - 删除项目（确认对话框由前端通过 dialog 插件弹出）
//! - `list_languages` - 新建项目对话框的语言选项
//!
//! 项目列表走内存缓存，创建和删除后自动失效。

use tauri::State;

use crate::models::project::{Language, LanguageOption};
use crate::services::project_query::{ListQuery, ProjectPage};
use crate::services::workspace::{CreatedProject, HomeOverview, Workspace};

/// 查询项目列表的一页
///
/// # 参数
/// - `query` - 搜索词、语言过滤、排序键、排序方向和页码，均可省略
/// - `workspace` - Tauri managed state，应用工作区
///
/// # 返回值
/// 当前页的项目、钳制后的页码和总页数
#[tauri::command]
pub async fn list_projects(
    query: Option<ListQuery>,
    workspace: State<'_, Workspace>,
) -> Result<ProjectPage, String> {
    workspace.list_projects(&query.unwrap_or_default()).await
}

#[tauri::command]
pub async fn home_overview(workspace: State<'_, Workspace>) -> Result<HomeOverview, String> {
    workspace.home_overview().await
}

/// 新建项目
///
/// # 返回值
/// 新项目 ID（前端据此跳转到编辑器）和成功提示
///
/// # 错误
/// 标题为空、后端拒绝或网络失败时返回可直接展示的提示文案
#[tauri::command]
pub async fn create_project(
    title: String,
    language: Language,
    workspace: State<'_, Workspace>,
) -> Result<CreatedProject, String> {
    workspace.create_project(&title, language).await
}

/// 删除项目
///
/// 删除不可撤销：成功后该项目不会再出现在本次会话的任何列表中。
#[tauri::command]
pub async fn delete_project(
    project_id: String,
    workspace: State<'_, Workspace>,
) -> Result<(), String> {
    workspace.delete_project(&project_id).await
}

#[tauri::command]
pub fn list_languages() -> Vec<LanguageOption> {
    Language::options()
}
