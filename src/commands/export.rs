//! # 导出 Tauri Commands
//!
//! - `export_project` - 将当前草稿导出为单个文件（web 项目为独立 HTML 文档）
//! - `export_project_bundle` - 将当前草稿打包为 ZIP
//!
//! 目标目录可由前端通过 dialog 插件选择后传入；省略时使用配置中的下载目录，
//! 再退回到系统下载目录。导出完成后前端可用 opener 插件在文件管理器中定位文件。

use std::path::PathBuf;

use tauri::State;

use crate::services::export::ExportResult;
use crate::services::workspace::Workspace;

#[tauri::command]
pub async fn export_project(
    project_id: String,
    dir: Option<String>,
    workspace: State<'_, Workspace>,
) -> Result<ExportResult, String> {
    workspace
        .export_project(&project_id, dir.map(PathBuf::from))
        .await
}

#[tauri::command]
pub async fn export_project_bundle(
    project_id: String,
    dir: Option<String>,
    workspace: State<'_, Workspace>,
) -> Result<ExportResult, String> {
    workspace
        .export_project_bundle(&project_id, dir.map(PathBuf::from))
        .await
}
