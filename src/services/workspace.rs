//! # 应用工作区
//!
//! 应用的全局状态和所有用户操作的入口，Tauri command 层只是对这里的薄封装：
//! - 配置（`AppConfig`）
//! - 远程 API 客户端
//! - 会话（`SessionStore`）
//! - 项目列表缓存和删除墓碑（`AppCache`）
//! - 已打开的编辑器草稿（LRU，上限由 `maxOpenEditors` 决定）
//! - web 预览渲染器
//!
//! ## 锁与异步
//! 编辑器注册表由 `std::sync::Mutex` 保护，锁只在同步闭包内持有，从不跨越 await：
//! 运行代码时先在锁内把草稿切换到 `Executing` 并取出请求，释放锁后再发请求，
//! 结果返回后重新加锁写回。web 预览同理：锁内取出渲染任务，锁外渲染，再加锁写回。

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Mutex;

use lru::LruCache;
use serde::Serialize;

use crate::models::api::{SignUpRequest, UserDetails};
use crate::models::project::{Language, ProjectSummary};
use crate::models::session::Session;
use crate::models::settings::{AppConfig, PreviewMode};
use crate::services::api_client::{ApiClient, ApiError, GENERIC_FAILURE};
use crate::services::cache::AppCache;
use crate::services::config::read_app_config_internal;
use crate::services::editor::{EditorSnapshot, EditorSurface, EditorTab};
use crate::services::executor::{ExecutionState, RunPlan};
use crate::services::export::{self, ExportArtifact, ExportResult};
use crate::services::persistence::{SaveOutcome, SaveReport, build_update_request};
use crate::services::preview::{PreviewRenderer, SrcdocRenderer, TempFileRenderer};
use crate::services::project_query::{self, ListQuery, OverviewStats, ProjectPage};
use crate::services::session::SessionStore;
use crate::services::shortcuts::{EditorAction, resolve_shortcut};
use crate::utils::path;

/// 新建项目时标题为空
pub const TITLE_REQUIRED: &str = "Please enter a project title";

/// 新建项目成功提示
pub const PROJECT_CREATED: &str = "Project created successfully";

/// 新建项目传输失败
pub const CREATE_NETWORK_FAILURE: &str = "Network error: Unable to create project";

/// 删除项目被拒绝且没有说明
pub const DELETE_FALLBACK: &str = "Unable to delete project";

/// 登录、注册、删除的传输失败提示
pub const NETWORK_RETRY: &str = "Network error. Please try again.";

/// 注册成功提示
pub const ACCOUNT_CREATED: &str = "Account created successfully";

/// 项目尚未打开（或仍在加载）
pub const NOT_LOADED: &str = "项目尚未加载";

/// 会话文件名
const SESSION_FILE: &str = "session.json";

/// 新建项目的结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProject {
    /// 新项目 ID，前端据此跳转到编辑器
    pub project_id: String,
    pub message: &'static str,
}

/// 首页概览
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeOverview {
    pub user: UserDetails,
    pub stats: OverviewStats,
}

/// 快捷键处理结果
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", content = "result", rename_all = "camelCase")]
pub enum ShortcutOutcome {
    Saved(SaveReport),
    Ran(EditorSnapshot),
    Ignored,
}

/// 应用工作区
pub struct Workspace {
    config: AppConfig,
    api: ApiClient,
    session: SessionStore,
    cache: AppCache,
    editors: Mutex<LruCache<String, EditorSurface>>,
    renderer: Box<dyn PreviewRenderer>,
}

impl Workspace {
    /// 应用启动时构造工作区
    ///
    /// 读取配置、按配置选择预览渲染器，并尝试恢复上一次的会话。
    ///
    /// # 错误
    /// 无法确定配置目录时返回错误
    pub async fn bootstrap() -> Result<Self, String> {
        let config = read_app_config_internal().await;
        let session = SessionStore::persistent(path::get_app_config_path()?.join(SESSION_FILE));

        let renderer: Box<dyn PreviewRenderer> = match config.preview_mode {
            PreviewMode::Srcdoc => Box::new(SrcdocRenderer),
            PreviewMode::File => Box::new(TempFileRenderer::in_temp_dir()),
        };

        if let Some(restored) = session.restore().await {
            log::info!("已恢复用户 {} 的会话", restored.user_id);
        }

        let workspace = Self::with_parts(config, session, renderer);
        log::info!("API 根地址: {}", workspace.api.base_url());
        Ok(workspace)
    }

    /// 由已准备好的组件构造工作区
    pub fn with_parts(
        config: AppConfig,
        session: SessionStore,
        renderer: Box<dyn PreviewRenderer>,
    ) -> Self {
        let capacity = NonZeroUsize::new(config.max_open_editors).unwrap_or(NonZeroUsize::MIN);
        Self {
            api: ApiClient::new(&config.api_base_url),
            cache: AppCache::new(config.project_cache_ttl_secs),
            editors: Mutex::new(LruCache::new(capacity)),
            config,
            session,
            renderer,
        }
    }

    // ======== 认证 ========

    /// 登录并开始新会话
    ///
    /// 会话持久化成功后，之前账号的缓存和已打开的编辑器全部清空；
    /// 持久化失败时登录失败，原有状态保持不变。
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, String> {
        let session = self.api.login(email, password).await.map_err(auth_error)?;

        self.session.begin(session.clone()).await?;
        self.reset_state();
        log::info!("用户 {} 已登录", session.user_id);
        Ok(session)
    }

    /// 注册新账号，成功时返回提示文案
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<&'static str, String> {
        self.api.sign_up(request).await.map_err(auth_error)?;
        Ok(ACCOUNT_CREATED)
    }

    /// 登出：删除持久化会话，清空缓存和编辑器
    pub async fn logout(&self) -> Result<(), String> {
        self.reset_state();
        self.session.end().await
    }

    pub fn current_session(&self) -> Option<Session> {
        self.session.current()
    }

    fn reset_state(&self) {
        self.cache.clear();
        let closed: Vec<String> = match self.editors.lock() {
            Ok(mut editors) => {
                let ids: Vec<String> = editors.iter().map(|(id, _)| id.clone()).collect();
                editors.clear();
                ids
            }
            Err(_) => Vec::new(),
        };
        for id in closed {
            self.renderer.discard(&id);
        }
    }

    // ======== 项目列表 ========

    /// 查询首页项目列表的一页
    pub async fn list_projects(&self, query: &ListQuery) -> Result<ProjectPage, String> {
        let session = self.session.require()?;
        let projects = self.fetch_summaries(&session.user_id).await?;
        Ok(project_query::query_projects(
            &projects,
            query,
            self.config.page_size,
        ))
    }

    /// 首页概览：用户资料、服务端统计与项目列表并发获取
    ///
    /// 用户资料或服务端统计获取失败不影响概览，仅记录警告；
    /// 统计卡片缺失的值用本地项目列表计算
    pub async fn home_overview(&self) -> Result<HomeOverview, String> {
        let session = self.session.require()?;

        let (user, profile_stats, projects) = tokio::join!(
            self.api.get_user_details(&session.user_id),
            self.api.get_profile_stats(&session.user_id),
            self.fetch_summaries(&session.user_id),
        );

        let user = user.unwrap_or_else(|e| {
            log::warn!("获取用户资料失败: {}", e);
            UserDetails::default()
        });
        let profile_stats = profile_stats
            .inspect_err(|e| log::warn!("获取用户统计失败: {}", e))
            .ok();

        let local = project_query::project_stats(&projects?);
        Ok(HomeOverview {
            user,
            stats: project_query::overview_stats(local, profile_stats),
        })
    }

    /// 获取项目列表（优先使用缓存），已删除的项目不会出现
    async fn fetch_summaries(&self, user_id: &str) -> Result<Vec<ProjectSummary>, String> {
        if let Some(cached) = self.cache.get_projects(user_id) {
            return Ok(cached);
        }

        let records = self
            .api
            .get_projects(user_id)
            .await
            .map_err(|e| e.to_string())?;
        let summaries = records.iter().map(ProjectSummary::from).collect();

        Ok(self.cache.set_projects(user_id, summaries))
    }

    /// 新建项目
    ///
    /// 标题去掉首尾空白后为空时不发请求。
    pub async fn create_project(
        &self,
        title: &str,
        language: Language,
    ) -> Result<CreatedProject, String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TITLE_REQUIRED.to_string());
        }
        let session = self.session.require()?;

        let project_id = self
            .api
            .create_project(&session.user_id, title, language)
            .await
            .map_err(|e| match e.rejection_or(GENERIC_FAILURE) {
                Some(message) => format!("Error: {}", message),
                None => CREATE_NETWORK_FAILURE.to_string(),
            })?;

        self.cache.invalidate_projects();
        log::info!("已创建项目 {} ({})", project_id, language.as_str());

        Ok(CreatedProject {
            project_id,
            message: PROJECT_CREATED,
        })
    }

    /// 删除项目
    ///
    /// 删除成功后该 ID 在本次会话内不会再出现在任何列表中，对应的编辑器一并关闭。
    /// 确认对话框由调用方负责。
    pub async fn delete_project(&self, project_id: &str) -> Result<(), String> {
        let session = self.session.require()?;

        self.api
            .delete_project(&session.user_id, project_id)
            .await
            .map_err(|e| match e.rejection_or(DELETE_FALLBACK) {
                Some(message) => message.to_string(),
                None => NETWORK_RETRY.to_string(),
            })?;

        self.cache.mark_deleted(project_id);
        self.cache.invalidate_projects();
        if let Ok(mut editors) = self.editors.lock() {
            editors.pop(project_id);
        }
        self.renderer.discard(project_id);
        log::info!("已删除项目 {}", project_id);
        Ok(())
    }

    // ======== 编辑器 ========

    /// 打开项目编辑器
    ///
    /// 拉取完成之前注册表中没有该项目，所有编辑器操作都会返回「尚未加载」。
    /// 重新打开已打开的项目会丢弃旧草稿；旧草稿的运行仍在途时保留旧草稿，
    /// 运行结果照常写回。
    pub async fn open_project(&self, project_id: &str) -> Result<EditorSnapshot, String> {
        let session = self.session.require()?;
        if self.cache.is_deleted(project_id) {
            return Err(format!("项目 {} 已被删除", project_id));
        }

        let record = self
            .api
            .get_project(&session.user_id, project_id)
            .await
            .map_err(|e| e.to_string())?;

        let mut surface = EditorSurface::from_record(&record)?;
        surface.refresh_preview(self.renderer.as_ref())?;
        let snapshot = surface.snapshot();

        let evicted_id = {
            let mut editors = self
                .editors
                .lock()
                .map_err(|e| format!("编辑器状态锁异常: {}", e))?;
            if let Some(running) = editors
                .get(project_id)
                .filter(|s| s.execution() == ExecutionState::Executing)
            {
                log::debug!("项目 {} 正在运行，保留当前草稿", project_id);
                return Ok(running.snapshot());
            }

            match editors.push(project_id.to_string(), surface) {
                Some((evicted_id, evicted)) if evicted_id != project_id => {
                    if evicted.is_dirty() {
                        log::warn!("编辑器数量已达上限，项目 {} 的未保存修改被丢弃", evicted_id);
                    }
                    Some(evicted_id)
                }
                _ => None,
            }
        };
        if let Some(evicted_id) = evicted_id {
            self.renderer.discard(&evicted_id);
        }

        Ok(snapshot)
    }

    /// 在已打开的草稿上执行同步操作
    fn with_editor<T>(
        &self,
        project_id: &str,
        op: impl FnOnce(&mut EditorSurface) -> Result<T, String>,
    ) -> Result<T, String> {
        self.session.require()?;
        let mut editors = self
            .editors
            .lock()
            .map_err(|e| format!("编辑器状态锁异常: {}", e))?;
        let surface = editors
            .get_mut(project_id)
            .ok_or_else(|| NOT_LOADED.to_string())?;
        op(surface)
    }

    pub fn editor_snapshot(&self, project_id: &str) -> Result<EditorSnapshot, String> {
        self.with_editor(project_id, |s| Ok(s.snapshot()))
    }

    pub fn edit_buffer(
        &self,
        project_id: &str,
        tab: EditorTab,
        text: String,
    ) -> Result<EditorSnapshot, String> {
        self.with_editor(project_id, |s| s.edit(tab, text))?;
        self.render_preview(project_id)
    }

    /// 在编辑器锁之外渲染 web 预览并写回，返回最新快照
    ///
    /// 渲染期间草稿被关闭时释放刚写出的预览资源。
    fn render_preview(&self, project_id: &str) -> Result<EditorSnapshot, String> {
        let Some(job) = self.with_editor(project_id, |s| Ok(s.preview_job()))? else {
            return self.editor_snapshot(project_id);
        };
        let frame = job.render(self.renderer.as_ref())?;

        self.with_editor(project_id, |s| {
            s.apply_preview(job.revision(), frame);
            Ok(s.snapshot())
        })
        .inspect_err(|_| self.renderer.discard(project_id))
    }

    pub fn select_tab(&self, project_id: &str, tab: EditorTab) -> Result<EditorSnapshot, String> {
        self.with_editor(project_id, |s| {
            s.select_tab(tab)?;
            Ok(s.snapshot())
        })
    }

    pub fn toggle_expanded(&self, project_id: &str) -> Result<EditorSnapshot, String> {
        self.with_editor(project_id, |s| {
            s.toggle_expanded();
            Ok(s.snapshot())
        })
    }

    pub fn set_input(&self, project_id: &str, input: String) -> Result<EditorSnapshot, String> {
        self.with_editor(project_id, |s| {
            s.set_input(input);
            Ok(s.snapshot())
        })
    }

    /// 运行代码
    ///
    /// - web 项目：重新渲染预览，不发请求
    /// - 单文件项目：发送 `/executeCode`，结果写回输出区
    /// - 已有运行在途：不发请求，返回当前状态
    pub async fn run_code(&self, project_id: &str) -> Result<EditorSnapshot, String> {
        let session = self.session.require()?;
        let plan = self.with_editor(project_id, |s| Ok(s.begin_run(&session.user_id)))?;

        let request = match plan {
            RunPlan::Remote(request) => request,
            RunPlan::AlreadyRunning => {
                log::debug!("项目 {} 已在运行，忽略本次运行", project_id);
                return self.editor_snapshot(project_id);
            }
            RunPlan::Preview => return self.render_preview(project_id),
        };

        let outcome = self.api.execute_code(&request).await;

        self.with_editor(project_id, |s| {
            s.finish_run(outcome);
            Ok(s.snapshot())
        })
        .inspect_err(|_| log::warn!("项目 {} 已关闭，运行结果被丢弃", project_id))
    }

    /// 保存草稿
    ///
    /// 后写者胜：不做版本校验，直接覆盖后端记录。
    /// 保存期间又有新的编辑时，草稿保持为未保存状态。
    pub async fn save_project(&self, project_id: &str) -> Result<SaveReport, String> {
        let session = self.session.require()?;
        let request = self.with_editor(project_id, |s| {
            Ok(build_update_request(
                &session.user_id,
                s.project_id(),
                s.content(),
                s.input(),
            ))
        })?;

        let result = self.api.update_project(&request).await;
        let outcome = SaveOutcome::from_result(&result);

        match &result {
            Ok(()) => {
                self.cache.invalidate_projects();
                let _ = self.with_editor(project_id, |s| {
                    let current =
                        build_update_request(&session.user_id, s.project_id(), s.content(), s.input());
                    if current == request {
                        s.mark_saved();
                    }
                    Ok(())
                });
            }
            Err(e) => log::error!("保存项目 {} 失败: {}", project_id, e),
        }

        Ok(outcome.into())
    }

    /// 处理编辑器内的按键事件
    pub async fn handle_shortcut(
        &self,
        project_id: &str,
        key: &str,
        ctrl: bool,
    ) -> Result<ShortcutOutcome, String> {
        match resolve_shortcut(key, ctrl) {
            Some(EditorAction::Save) => Ok(ShortcutOutcome::Saved(
                self.save_project(project_id).await?,
            )),
            Some(EditorAction::Run) => Ok(ShortcutOutcome::Ran(self.run_code(project_id).await?)),
            None => Ok(ShortcutOutcome::Ignored),
        }
    }

    /// 关闭编辑器，返回是否丢弃了未保存的修改
    pub fn close_project(&self, project_id: &str) -> Result<bool, String> {
        let mut editors = self
            .editors
            .lock()
            .map_err(|e| format!("编辑器状态锁异常: {}", e))?;
        let discarded = editors
            .pop(project_id)
            .is_some_and(|surface| surface.is_dirty());
        drop(editors);
        self.renderer.discard(project_id);

        if discarded {
            log::warn!("项目 {} 关闭时有未保存的修改", project_id);
        }
        Ok(discarded)
    }

    // ======== 导出 ========

    /// 导出当前草稿为单个文件
    pub async fn export_project(
        &self,
        project_id: &str,
        dir: Option<PathBuf>,
    ) -> Result<ExportResult, String> {
        let artifact =
            self.with_editor(project_id, |s| Ok(export::export_single(s.title(), s.content())))?;
        self.write_export(dir, &artifact).await
    }

    /// 导出当前草稿为 ZIP 包
    pub async fn export_project_bundle(
        &self,
        project_id: &str,
        dir: Option<PathBuf>,
    ) -> Result<ExportResult, String> {
        let artifact = self.with_editor(project_id, |s| {
            export::export_bundle(s.title(), s.content(), s.input())
        })?;
        self.write_export(dir, &artifact).await
    }

    async fn write_export(
        &self,
        dir: Option<PathBuf>,
        artifact: &ExportArtifact,
    ) -> Result<ExportResult, String> {
        let dir = match dir.or_else(|| self.config.download_dir.as_ref().map(PathBuf::from)) {
            Some(dir) => dir,
            None => path::get_download_dir()?,
        };
        export::write_artifact(&dir, artifact).await
    }
}

/// 登录/注册失败文案
fn auth_error(e: ApiError) -> String {
    match e.rejection_or(GENERIC_FAILURE) {
        Some(message) => message.to_string(),
        None => NETWORK_RETRY.to_string(),
    }
}
