//! # CodeForge - Cargo 构建脚本
//!
//! 仅在启用 `desktop` 特性时调用 Tauri 的构建准备工作：
//! - 生成 Tauri 运行时所需的资源绑定代码
//! - 处理应用图标、权限清单等静态资源
//! - 在 Windows 平台上生成应用程序清单（manifest）和资源文件（.rc）
//!
//! 核心库单独编译（默认特性）时，构建脚本什么也不做。

fn main() {
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
