//! # CodeForge - Tauri 桌面应用原生入口点
//!
//! `main.rs` 仅负责启动应用，插件注册、状态初始化和 command 注册均在
//! `lib.rs` 的 `run()` 中完成，以便桌面端和移动端共享同一套初始化代码。

// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    app_lib::run();
}
