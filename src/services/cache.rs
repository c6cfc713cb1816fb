//! # 内存缓存管理服务
//!
//! 提供基于内存的缓存层，减少重复的项目列表请求：
//! - **项目列表缓存**：存储上次拉取的结果，带用户 ID 和时间戳用于判断有效性
//! - **删除墓碑**：记录本次会话内已成功删除的项目 ID
//!
//! ## 缓存失效策略
//! - 项目列表缓存：基于 TTL（生存时间），超过阈值后重新拉取；
//!   创建、保存、删除项目后立即失效
//! - 删除墓碑：删除成功后项目 ID 立即从缓存列表中剔除，
//!   之后每次拉取到的列表都会过滤掉这些 ID，即使后端列表尚未同步；
//!   登出时随会话一起清空
//!
//! ## 线程安全
//! 使用 `std::sync::RwLock` 保证多线程安全访问。
//! Tauri 的 command 可能在不同线程上并发执行，RwLock 允许多个读操作并发进行。

use std::collections::HashSet;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::models::project::ProjectSummary;

/// 应用全局缓存状态
pub struct AppCache {
    /// 项目列表缓存：最近一次拉取的结果和拉取时间
    projects: RwLock<Option<ProjectCacheEntry>>,

    /// 本次会话内已删除的项目 ID
    deleted: RwLock<HashSet<String>>,

    /// 项目列表缓存有效期
    ttl: Duration,
}

/// 项目列表缓存条目
struct ProjectCacheEntry {
    /// 列表所属用户，切换账号后旧缓存不可复用
    user_id: String,
    /// 缓存的项目数据
    data: Vec<ProjectSummary>,
    /// 缓存创建的时间点（用于 TTL 判断）
    cached_at: Instant,
}

impl AppCache {
    /// 创建新的空缓存实例
    ///
    /// # 参数
    /// - `ttl_secs` - 项目列表缓存有效期（秒），为 0 时每次都重新拉取
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            projects: RwLock::new(None),
            deleted: RwLock::new(HashSet::new()),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    // ======== 项目列表缓存方法 ========

    /// 获取缓存的项目列表（如果缓存仍然有效且属于该用户）
    ///
    /// # 返回值
    /// - `Some(projects)` - 缓存有效时返回缓存数据的克隆
    /// - `None` - 缓存不存在、已过期或属于其他用户
    pub fn get_projects(&self, user_id: &str) -> Option<Vec<ProjectSummary>> {
        let cache = self.projects.read().ok()?;
        let entry = cache.as_ref()?;

        if entry.user_id == user_id && entry.cached_at.elapsed() < self.ttl {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    /// 更新项目列表缓存
    ///
    /// 写入前先剔除已删除的项目，返回实际缓存的列表
    pub fn set_projects(&self, user_id: &str, projects: Vec<ProjectSummary>) -> Vec<ProjectSummary> {
        let projects = self.without_deleted(projects);

        if let Ok(mut cache) = self.projects.write() {
            *cache = Some(ProjectCacheEntry {
                user_id: user_id.to_string(),
                data: projects.clone(),
                cached_at: Instant::now(),
            });
        }

        projects
    }

    /// 使项目列表缓存失效
    ///
    /// 在执行修改操作（创建、保存）后调用，确保下次查询会重新拉取
    pub fn invalidate_projects(&self) {
        if let Ok(mut cache) = self.projects.write() {
            *cache = None;
        }
    }

    // ======== 删除墓碑方法 ========

    /// 记录一次成功的删除
    ///
    /// 项目 ID 立即从缓存列表中剔除，并且之后的列表中不再出现
    pub fn mark_deleted(&self, project_id: &str) {
        if let Ok(mut deleted) = self.deleted.write() {
            deleted.insert(project_id.to_string());
        }
        if let Ok(mut cache) = self.projects.write() {
            if let Some(entry) = cache.as_mut() {
                entry.data.retain(|p| p.id != project_id);
            }
        }
    }

    /// 项目是否已在本次会话中被删除
    pub fn is_deleted(&self, project_id: &str) -> bool {
        self.deleted
            .read()
            .map(|deleted| deleted.contains(project_id))
            .unwrap_or(false)
    }

    /// 过滤掉已删除的项目
    pub fn without_deleted(&self, projects: Vec<ProjectSummary>) -> Vec<ProjectSummary> {
        match self.deleted.read() {
            Ok(deleted) if !deleted.is_empty() => projects
                .into_iter()
                .filter(|p| !deleted.contains(&p.id))
                .collect(),
            _ => projects,
        }
    }

    /// 清空全部缓存（登出时调用）
    pub fn clear(&self) {
        self.invalidate_projects();
        if let Ok(mut deleted) = self.deleted.write() {
            deleted.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> ProjectSummary {
        ProjectSummary {
            id: id.into(),
            title: id.to_uppercase(),
            language: "python".into(),
            date: None,
        }
    }

    #[test]
    fn test_cache_is_per_user() {
        let cache = AppCache::new(30);
        cache.set_projects("u1", vec![summary("a")]);

        assert_eq!(cache.get_projects("u1").unwrap().len(), 1);
        assert!(cache.get_projects("u2").is_none());
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let cache = AppCache::new(0);
        cache.set_projects("u1", vec![summary("a")]);
        assert!(cache.get_projects("u1").is_none());
    }

    #[test]
    fn test_deleted_project_is_evicted_and_filtered() {
        let cache = AppCache::new(30);
        cache.set_projects("u1", vec![summary("a"), summary("b")]);

        cache.mark_deleted("a");
        let cached = cache.get_projects("u1").unwrap();
        assert_eq!(cached, vec![summary("b")]);

        // 后端列表滞后，仍然返回已删除的项目
        let stored = cache.set_projects("u1", vec![summary("a"), summary("b")]);
        assert_eq!(stored, vec![summary("b")]);
        assert!(cache.is_deleted("a"));
    }

    #[test]
    fn test_clear_forgets_tombstones() {
        let cache = AppCache::new(30);
        cache.mark_deleted("a");
        cache.clear();
        assert!(!cache.is_deleted("a"));
        assert_eq!(cache.without_deleted(vec![summary("a")]).len(), 1);
    }
}
