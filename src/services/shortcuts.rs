//! # 编辑器快捷键
//!
//! - `Ctrl+S`：保存
//! - `Ctrl+Enter`：运行
//!
//! 其他按键组合一律忽略，交给前端编辑器自行处理。

use serde::{Deserialize, Serialize};

/// 快捷键触发的编辑器动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorAction {
    Save,
    Run,
}

/// 解析按键事件
///
/// # 参数
/// - `key` - 前端 `KeyboardEvent.key` 的值
/// - `ctrl` - 是否按下了 Ctrl
pub fn resolve_shortcut(key: &str, ctrl: bool) -> Option<EditorAction> {
    if !ctrl {
        return None;
    }
    match key {
        "s" => Some(EditorAction::Save),
        "Enter" => Some(EditorAction::Run),
        _ => None,
    }
}
