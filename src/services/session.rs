//! # 会话管理服务
//!
//! 显式的会话对象，替代浏览器端直接读写 `localStorage` 的做法：
//! - `begin()`：登录成功后调用，记录会话并持久化到 `~/.codeforge/session.json`
//! - `restore()`：应用启动时调用，从持久化文件恢复上次的会话
//! - `end()`：登出时调用，清除内存中的会话并删除持久化文件
//!
//! 所有需要 `userId` 的操作都通过 `require()` 取得当前会话，未登录时统一报错。
//!
//! ## 线程安全
//! 使用 `std::sync::RwLock` 保存当前会话；锁只在同步代码段内持有，不跨越 await。

use std::path::PathBuf;
use std::sync::RwLock;

use crate::models::session::Session;

/// 未登录时的错误文案
pub const NOT_LOGGED_IN: &str = "尚未登录，请先登录";

/// 会话存储
pub struct SessionStore {
    /// 持久化文件路径；为 None 时仅保存在内存中
    path: Option<PathBuf>,
    /// 当前会话
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// 仅内存的会话存储（测试和无持久化场景）
    pub fn in_memory() -> Self {
        Self {
            path: None,
            current: RwLock::new(None),
        }
    }

    /// 持久化到指定文件的会话存储
    pub fn persistent(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            current: RwLock::new(None),
        }
    }

    /// 从持久化文件恢复会话
    ///
    /// 文件不存在或内容无法解析时视为未登录，不返回错误。
    ///
    /// # 返回值
    /// 恢复出的会话（如有）
    pub async fn restore(&self) -> Option<Session> {
        let path = self.path.as_ref()?;
        if !path.exists() {
            return None;
        }

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) => {
                log::warn!("读取会话文件失败: {}", e);
                return None;
            }
        };

        let session: Session = match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("解析会话文件失败: {}", e);
                return None;
            }
        };

        self.set(Some(session.clone()));
        Some(session)
    }

    /// 开始新会话（登录成功后调用）
    ///
    /// 先写持久化文件，成功后才替换内存中的会话。
    ///
    /// # 错误
    /// 持久化目录创建失败或文件写入失败时返回错误；此时当前会话保持不变
    pub async fn begin(&self, session: Session) -> Result<(), String> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| format!("创建配置目录失败: {}", e))?;
                }
            }

            let content = serde_json::to_string_pretty(&session)
                .map_err(|e| format!("序列化会话失败: {}", e))?;

            tokio::fs::write(path, content)
                .await
                .map_err(|e| format!("写入会话文件失败: {}", e))?;
        }

        self.set(Some(session));
        Ok(())
    }

    /// 结束会话（登出时调用）
    ///
    /// # 错误
    /// 持久化文件存在但删除失败时返回错误
    pub async fn end(&self) -> Result<(), String> {
        self.set(None);

        match &self.path {
            Some(path) if path.exists() => tokio::fs::remove_file(path)
                .await
                .map_err(|e| format!("删除会话文件失败: {}", e)),
            _ => Ok(()),
        }
    }

    /// 当前会话的克隆
    pub fn current(&self) -> Option<Session> {
        self.current.read().ok()?.clone()
    }

    /// 获取当前会话，未登录时返回错误
    pub fn require(&self) -> Result<Session, String> {
        self.current().ok_or_else(|| NOT_LOGGED_IN.to_string())
    }

    fn set(&self, session: Option<Session>) {
        if let Ok(mut current) = self.current.write() {
            *current = session;
        }
    }
}
