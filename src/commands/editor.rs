//! # 编辑器 Tauri Commands
//!
//! 提供项目编辑页相关的 Tauri command 处理函数。
//! 除 `close_project` 外，每个 command 都返回最新的 `EditorSnapshot`，
//! 前端直接用它重绘编辑器、输出区和预览。
//!
//! 保存结果的提示框由前端通过 dialog 插件弹出，文案取自 `SaveReport.message`。

use tauri::State;

use crate::services::editor::{EditorSnapshot, EditorTab};
use crate::services::persistence::SaveReport;
use crate::services::workspace::{ShortcutOutcome, Workspace};

/// 打开项目编辑器
///
/// 拉取完成前，其他编辑器 command 对该项目都返回「尚未加载」。
#[tauri::command]
pub async fn open_project(
    project_id: String,
    workspace: State<'_, Workspace>,
) -> Result<EditorSnapshot, String> {
    workspace.open_project(&project_id).await
}

#[tauri::command]
pub fn editor_snapshot(
    project_id: String,
    workspace: State<'_, Workspace>,
) -> Result<EditorSnapshot, String> {
    workspace.editor_snapshot(&project_id)
}

/// 替换一个缓冲区的内容（web 项目同时刷新预览）
#[tauri::command]
pub fn edit_buffer(
    project_id: String,
    tab: EditorTab,
    text: String,
    workspace: State<'_, Workspace>,
) -> Result<EditorSnapshot, String> {
    workspace.edit_buffer(&project_id, tab, text)
}

#[tauri::command]
pub fn select_tab(
    project_id: String,
    tab: EditorTab,
    workspace: State<'_, Workspace>,
) -> Result<EditorSnapshot, String> {
    workspace.select_tab(&project_id, tab)
}

#[tauri::command]
pub fn toggle_expanded(
    project_id: String,
    workspace: State<'_, Workspace>,
) -> Result<EditorSnapshot, String> {
    workspace.toggle_expanded(&project_id)
}

#[tauri::command]
pub fn set_input(
    project_id: String,
    input: String,
    workspace: State<'_, Workspace>,
) -> Result<EditorSnapshot, String> {
    workspace.set_input(&project_id, input)
}

/// 运行代码
///
/// 单文件项目会一直等到远程执行返回；运行期间前端可轮询 `editor_snapshot`
/// 看到 `Executing code...` 状态。
#[tauri::command]
pub async fn run_code(
    project_id: String,
    workspace: State<'_, Workspace>,
) -> Result<EditorSnapshot, String> {
    workspace.run_code(&project_id).await
}

#[tauri::command]
pub async fn save_project(
    project_id: String,
    workspace: State<'_, Workspace>,
) -> Result<SaveReport, String> {
    workspace.save_project(&project_id).await
}

/// 处理编辑器内的按键事件（`Ctrl+S` 保存，`Ctrl+Enter` 运行）
#[tauri::command]
pub async fn handle_shortcut(
    project_id: String,
    key: String,
    ctrl: bool,
    workspace: State<'_, Workspace>,
) -> Result<ShortcutOutcome, String> {
    workspace.handle_shortcut(&project_id, &key, ctrl).await
}

/// 关闭编辑器
///
/// # 返回值
/// 是否丢弃了未保存的修改
#[tauri::command]
pub fn close_project(project_id: String, workspace: State<'_, Workspace>) -> Result<bool, String> {
    workspace.close_project(&project_id)
}
