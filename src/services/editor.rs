//! # 编辑器草稿
//!
//! `EditorSurface` 是一个已打开项目的内存草稿：缓冲区、当前标签页、
//! 最大化开关、标准输入、输出区以及执行状态。
//!
//! 编辑只修改内存状态，直到显式保存才写回后端。
//! web 项目每次编辑后都要重新渲染预览：`preview_job()` 取出缓冲区拷贝，
//! 调用方在编辑器锁之外交给 `PreviewRenderer` 渲染，再用 `apply_preview()` 写回。
//! 每次编辑递增版本号，过期版本的渲染结果不会覆盖较新的预览。
//!
//! 每次操作后由 `snapshot()` 生成可序列化的 `EditorSnapshot` 返回给前端。

use serde::{Deserialize, Serialize};

use crate::models::api::ExecuteRequest;
use crate::models::project::{Language, ProjectContent, ProjectRecord};
use crate::services::api_client::ApiError;
use crate::services::executor::{
    EXECUTING_TEXT, ExecutionState, OUTPUT_PLACEHOLDER, RunPlan, describe_outcome,
};
use crate::services::preview::{PreviewFrame, PreviewRenderer};

/// 编辑器标签页
///
/// web 项目有 `html`/`css`/`js` 三个标签页，单文件项目只有一个隐式的 `main`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorTab {
    Html,
    Css,
    Js,
    Main,
}

impl EditorTab {
    /// 该布局打开时默认选中的标签页
    fn initial_for(content: &ProjectContent) -> Self {
        match content {
            ProjectContent::Web { .. } => EditorTab::Html,
            ProjectContent::SingleFile { .. } => EditorTab::Main,
        }
    }

    /// 标签页是否属于该布局
    fn belongs_to(self, content: &ProjectContent) -> bool {
        match content {
            ProjectContent::Web { .. } => !matches!(self, EditorTab::Main),
            ProjectContent::SingleFile { .. } => matches!(self, EditorTab::Main),
        }
    }
}

/// 返回给前端的编辑器状态快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub project_id: String,
    pub title: String,
    pub language: Language,
    pub editor_mode: &'static str,
    pub content: ProjectContent,
    pub active_tab: EditorTab,
    pub expanded: bool,
    pub input: String,
    /// 输出区文本；没有输出时为占位文案
    pub output: String,
    /// 输出区是否有实际内容（占位文案不算）
    pub output_pane_active: bool,
    pub execution: ExecutionState,
    pub run_enabled: bool,
    /// 最近一次渲染的 web 预览
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewFrame>,
    /// 是否有未保存的修改
    pub dirty: bool,
}

/// 一次待执行的预览渲染
#[derive(Debug, Clone)]
pub struct PreviewJob {
    revision: u64,
    project_id: String,
    html: String,
    css: String,
    js: String,
}

impl PreviewJob {
    /// 生成该任务时草稿的编辑版本号
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn render(&self, renderer: &dyn PreviewRenderer) -> Result<PreviewFrame, String> {
        renderer.render(&self.project_id, &self.html, &self.css, &self.js)
    }
}

/// 一个已打开项目的内存草稿
#[derive(Debug, Clone)]
pub struct EditorSurface {
    project_id: String,
    title: String,
    content: ProjectContent,
    active_tab: EditorTab,
    expanded: bool,
    input: String,
    output: String,
    execution: ExecutionState,
    preview: Option<PreviewFrame>,
    /// 缓冲区编辑版本号，每次 `edit` 递增
    revision: u64,
    dirty: bool,
}

impl EditorSurface {
    /// 从后端记录构造草稿
    ///
    /// 上一次运行的 `input`/`output` 一并恢复。
    ///
    /// # 错误
    /// 记录的语言不受支持时返回错误
    pub fn from_record(record: &ProjectRecord) -> Result<Self, String> {
        let content = record.content()?;
        Ok(Self {
            project_id: record.id.clone(),
            title: record.title.clone(),
            active_tab: EditorTab::initial_for(&content),
            content,
            expanded: false,
            input: record.input.clone().unwrap_or_default(),
            output: record.output.clone().unwrap_or_default(),
            execution: ExecutionState::Idle,
            preview: None,
            revision: 0,
            dirty: false,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &ProjectContent {
        &self.content
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn execution(&self) -> ExecutionState {
        self.execution
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 替换一个缓冲区的内容
    ///
    /// 预览不在这里渲染，web 项目需要随后调用 `preview_job()`。
    ///
    /// # 错误
    /// 标签页不属于该项目布局时返回错误，草稿保持不变
    pub fn edit(&mut self, tab: EditorTab, text: String) -> Result<(), String> {
        match (&mut self.content, tab) {
            (ProjectContent::Web { html, .. }, EditorTab::Html) => *html = text,
            (ProjectContent::Web { css, .. }, EditorTab::Css) => *css = text,
            (ProjectContent::Web { js, .. }, EditorTab::Js) => *js = text,
            (ProjectContent::SingleFile { code, .. }, EditorTab::Main) => *code = text,
            _ => return Err(foreign_tab(tab)),
        }
        self.revision += 1;
        self.dirty = true;
        Ok(())
    }

    /// 切换当前标签页
    ///
    /// # 错误
    /// 标签页不属于该项目布局时返回错误，当前标签页保持不变
    pub fn select_tab(&mut self, tab: EditorTab) -> Result<(), String> {
        if !tab.belongs_to(&self.content) {
            return Err(foreign_tab(tab));
        }
        self.active_tab = tab;
        Ok(())
    }

    /// 切换编辑区最大化，返回切换后的状态
    pub fn toggle_expanded(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// 更新标准输入草稿
    pub fn set_input(&mut self, input: String) {
        if self.input != input {
            self.input = input;
            self.dirty = true;
        }
    }

    /// 取出当前缓冲区的预览渲染任务；单文件项目没有预览
    pub fn preview_job(&self) -> Option<PreviewJob> {
        let ProjectContent::Web { html, css, js } = &self.content else {
            return None;
        };
        Some(PreviewJob {
            revision: self.revision,
            project_id: self.project_id.clone(),
            html: html.clone(),
            css: css.clone(),
            js: js.clone(),
        })
    }

    /// 写回渲染结果，版本号过期时丢弃并返回 false
    pub fn apply_preview(&mut self, revision: u64, frame: PreviewFrame) -> bool {
        if revision != self.revision {
            return false;
        }
        self.preview = Some(frame);
        true
    }

    /// 在当前线程内直接渲染并写回预览（草稿尚未共享时使用）
    pub fn refresh_preview(&mut self, renderer: &dyn PreviewRenderer) -> Result<(), String> {
        if let Some(job) = self.preview_job() {
            let frame = job.render(renderer)?;
            self.apply_preview(job.revision, frame);
        }
        Ok(())
    }

    /// 开始一次运行
    ///
    /// 单文件项目空闲时切换到 `Executing` 并返回待发送的请求；
    /// 已在运行时不做任何修改。
    pub fn begin_run(&mut self, user_id: &str) -> RunPlan {
        let ProjectContent::SingleFile { language, code } = &self.content else {
            return RunPlan::Preview;
        };
        if self.execution == ExecutionState::Executing {
            return RunPlan::AlreadyRunning;
        }

        let request = ExecuteRequest {
            user_id: user_id.to_string(),
            proj_id: self.project_id.clone(),
            code: code.clone(),
            language: *language,
            input: self.input.clone(),
        };
        self.execution = ExecutionState::Executing;
        self.output = EXECUTING_TEXT.to_string();
        RunPlan::Remote(request)
    }

    /// 记录运行结果并回到空闲状态
    pub fn finish_run(&mut self, outcome: Result<String, ApiError>) {
        self.output = describe_outcome(outcome);
        self.execution = ExecutionState::Idle;
    }

    /// 保存成功后清除脏标记
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// 生成状态快照
    pub fn snapshot(&self) -> EditorSnapshot {
        let language = self.content.language();
        EditorSnapshot {
            project_id: self.project_id.clone(),
            title: self.title.clone(),
            language,
            editor_mode: language.editor_mode(),
            content: self.content.clone(),
            active_tab: self.active_tab,
            expanded: self.expanded,
            input: self.input.clone(),
            output: if self.output.is_empty() {
                OUTPUT_PLACEHOLDER.to_string()
            } else {
                self.output.clone()
            },
            output_pane_active: !self.output.is_empty(),
            execution: self.execution,
            run_enabled: self.execution == ExecutionState::Idle,
            preview: self.preview.clone(),
            dirty: self.dirty,
        }
    }
}

fn foreign_tab(tab: EditorTab) -> String {
    format!("当前项目没有 {:?} 标签页", tab)
}
