//! # CodeForge - 应用核心初始化模块
//!
//! 本模块负责应用的完整初始化流程，包括：
//! - 注册 Tauri 官方插件（对话框、文件管理器集成、日志）
//! - 注册自定义 Tauri commands（认证、项目管理、编辑器、导出）
//! - 初始化应用全局状态（工作区：配置、会话、缓存、编辑器草稿）
//! - 生成应用上下文并启动事件循环
//!
//! ## 架构说明
//! 通过将核心逻辑放在 `lib.rs` 而非 `main.rs` 中，
//! Tauri 可以在桌面端（`main.rs`）和移动端入口之间共享此初始化代码。
//!
//! Tauri 外壳位于 `desktop` 特性之后；`models`/`services`/`utils`
//! 不依赖 Tauri，可以单独编译和测试。
//!
//! ## 模块结构
//! - `commands/` - Tauri command 处理函数（IPC 接口层，`desktop` 特性）
//! - `models/` - 数据模型（对应远程接口和前端 TypeScript 类型）
//! - `services/` - 核心业务逻辑（API 客户端、会话、编辑器、执行、导出）
//! - `utils/` - 通用工具函数

#[cfg(feature = "desktop")]
mod commands;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(feature = "desktop")]
use tauri::Manager;

#[cfg(feature = "desktop")]
use services::workspace::Workspace;

// `#[cfg_attr(mobile, tauri::mobile_entry_point)]`：条件编译属性
// 当目标平台为移动端（Android/iOS）时，此属性将 `run()` 函数标记为
// Tauri 移动端入口点。在桌面端编译时，此属性不生效，`run()` 由 `main.rs` 直接调用。
#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
/// Tauri 应用启动函数
///
/// 构建并运行 Tauri 应用实例。该函数完成以下工作：
/// 1. 创建 `tauri::Builder` 默认实例
/// 2. 注册所需的 Tauri 插件（对话框、文件管理器集成）
/// 3. 注册所有自定义 Tauri commands
/// 4. 在 `setup` 钩子中按需注册调试专用插件（日志），
///    并构造工作区（读取配置、恢复会话）注册为 managed state
/// 5. 生成应用上下文并启动主事件循环
///
/// # Panics
/// 如果 Tauri 应用启动失败（例如配置文件缺失或窗口创建失败），
/// 将通过 `.expect()` 触发 panic 并输出错误信息。
pub fn run() {
    tauri::Builder::default()
        // === 官方插件注册 ===
        // 对话框插件：删除确认、保存结果提示、导出目录选择
        .plugin(tauri_plugin_dialog::init())
        // Opener 插件：导出完成后在系统文件管理器中定位文件
        .plugin(tauri_plugin_opener::init())
        // === 自定义 Tauri Commands 注册 ===
        .invoke_handler(tauri::generate_handler![
            // 认证 commands
            commands::auth::login,
            commands::auth::sign_up,
            commands::auth::logout,
            commands::auth::current_session,
            // 项目管理 commands
            commands::projects::list_projects,
            commands::projects::home_overview,
            commands::projects::create_project,
            commands::projects::delete_project,
            commands::projects::list_languages,
            // 编辑器 commands
            commands::editor::open_project,
            commands::editor::editor_snapshot,
            commands::editor::edit_buffer,
            commands::editor::select_tab,
            commands::editor::toggle_expanded,
            commands::editor::set_input,
            commands::editor::run_code,
            commands::editor::save_project,
            commands::editor::handle_shortcut,
            commands::editor::close_project,
            // 导出 commands
            commands::export::export_project,
            commands::export::export_project_bundle,
        ])
        // `setup` 闭包：在应用窗口创建之前执行的初始化钩子
        .setup(|app| {
            // 仅在开发调试模式下启用日志插件
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }

            // 工作区需要异步读取配置和会话文件，在 Tauri 自带的 tokio runtime 上完成
            let workspace = tauri::async_runtime::block_on(Workspace::bootstrap())?;
            app.manage(workspace);
            Ok(())
        })
        // 编译时读取 `tauri.conf.json`，生成应用名称、窗口配置、安全策略等上下文
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
