//! # 项目数据模型
//!
//! 定义了项目（Project）相关的 Rust 结构体和枚举：
//! - `Language`：固定的语言枚举及其展示名、文件扩展名、编辑器模式
//! - `ProjectRecord`：后端返回的项目原始记录（线格式，字段名与后端一致）
//! - `ProjectContent`：按语言区分的缓冲区标签变体（web 三件套 或 单文件）
//! - `ProjectSummary`：项目列表卡片所需的精简信息
//!
//! 后端以字符串 `language` 字段区分两种缓冲区布局，
//! 客户端在加载时一次性转换为 `ProjectContent`，之后编辑、保存、导出、运行
//! 都对该枚举做穷尽匹配，不再到处判断 `language == "web"`。

use serde::{Deserialize, Serialize};

/// web 项目 HTML 缓冲区缺失时的默认内容
pub const DEFAULT_HTML: &str = "<h1>Hello world</h1>";

/// web 项目 CSS 缓冲区缺失时的默认内容
pub const DEFAULT_CSS: &str = "body { background-color: #f4f4f4; }";

/// web 项目 JS 缓冲区缺失时的默认内容
pub const DEFAULT_JS: &str = "// some comment";

/// 项目语言
///
/// 创建项目时选定，之后不可修改。序列化为小写字符串，
/// 与后端存储的 `language` 字段取值一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// HTML/CSS/JS 三文件项目，客户端本地预览
    Web,
    Python,
    Java,
    Cpp,
    C,
    Nodejs,
    Typescript,
}

impl Language {
    /// 所有支持的语言，按新建项目对话框中的展示顺序排列
    pub const ALL: [Language; 7] = [
        Language::Web,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::Nodejs,
        Language::Typescript,
    ];

    /// 线格式字符串（与后端 `language` 字段一致）
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Web => "web",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Nodejs => "nodejs",
            Language::Typescript => "typescript",
        }
    }

    /// 从线格式字符串解析，未知取值返回 None
    pub fn parse(value: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|lang| lang.as_str() == value)
    }

    /// 界面展示名称
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Web => "Web Development",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Cpp => "C++",
            Language::C => "C",
            Language::Nodejs => "Node.js",
            Language::Typescript => "TypeScript",
        }
    }

    /// 下载/导出时使用的文件扩展名（含前导点）
    ///
    /// web 项目导出为单个独立 HTML 文档，因此是 `.html`
    pub fn file_extension(self) -> &'static str {
        match self {
            Language::Web => ".html",
            Language::Python => ".py",
            Language::Java => ".java",
            Language::Cpp => ".cpp",
            Language::C => ".c",
            Language::Nodejs => ".js",
            Language::Typescript => ".ts",
        }
    }

    /// 前端代码编辑器使用的语法模式
    pub fn editor_mode(self) -> &'static str {
        match self {
            Language::Web => "html",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Nodejs => "javascript",
            Language::Typescript => "typescript",
        }
    }

    /// 新建项目对话框的全部选项，顺序同 `ALL`
    pub fn options() -> Vec<LanguageOption> {
        Language::ALL
            .into_iter()
            .map(|value| LanguageOption {
                value,
                label: value.display_name(),
                extension: value.file_extension(),
            })
            .collect()
    }
}

/// 新建项目对话框中的一个语言选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub value: Language,
    pub label: &'static str,
    pub extension: &'static str,
}

/// 项目缓冲区内容（标签变体）
///
/// 每个项目恰好有一种有效布局：
/// - `Web`：HTML/CSS/JS 三个独立缓冲区
/// - `SingleFile`：单个 `code` 缓冲区，`language` 决定执行与导出方式
///
/// 序列化给前端时带 `kind` 标签：`{"kind": "web", ...}` / `{"kind": "singleFile", ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ProjectContent {
    Web {
        html: String,
        css: String,
        js: String,
    },
    SingleFile {
        language: Language,
        code: String,
    },
}

impl ProjectContent {
    /// 该内容对应的项目语言
    pub fn language(&self) -> Language {
        match self {
            ProjectContent::Web { .. } => Language::Web,
            ProjectContent::SingleFile { language, .. } => *language,
        }
    }
}

/// 后端返回的项目原始记录
///
/// 对应 `/getProject`、`/getProjects` 响应中的项目对象：
/// ```json
/// {
///   "_id": "665f1c...",
///   "title": "Demo",
///   "language": "python",
///   "code": "print(1)",
///   "input": "",
///   "output": "1\n",
///   "date": "2024-06-04T10:00:00.000Z"
/// }
/// ```
///
/// 两种布局的字段同时声明为可选：后端可能保留未使用布局的陈旧默认值，
/// 客户端一律忽略，只取 `language` 选定的那一组。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// 项目 ID（后端文档主键）
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// 项目标题
    #[serde(default)]
    pub title: String,

    /// 语言线格式字符串；保留原始字符串以便列表能展示未知语言
    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub html_code: Option<String>,
    #[serde(default)]
    pub css_code: Option<String>,
    #[serde(default)]
    pub js_code: Option<String>,
    #[serde(default)]
    pub code: Option<String>,

    /// 上一次运行时的标准输入
    #[serde(default)]
    pub input: Option<String>,

    /// 上一次运行时捕获的输出
    #[serde(default)]
    pub output: Option<String>,

    /// 创建时间（ISO 8601），仅用于展示和排序
    #[serde(default)]
    pub date: Option<String>,
}

impl ProjectRecord {
    /// 将原始记录转换为标签变体
    ///
    /// 仅对缺失（`null`/不存在）的缓冲区填充默认值；显式存储的空字符串保持为空，
    /// 用户清空过的缓冲区不会在重新打开时被默认内容覆盖。
    ///
    /// # 错误
    /// `language` 不在支持列表中时返回错误
    pub fn content(&self) -> Result<ProjectContent, String> {
        let language = Language::parse(&self.language)
            .ok_or_else(|| format!("不支持的项目语言: {}", self.language))?;

        Ok(match language {
            Language::Web => ProjectContent::Web {
                html: self
                    .html_code
                    .clone()
                    .unwrap_or_else(|| DEFAULT_HTML.to_string()),
                css: self
                    .css_code
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CSS.to_string()),
                js: self.js_code.clone().unwrap_or_else(|| DEFAULT_JS.to_string()),
            },
            language => ProjectContent::SingleFile {
                language,
                code: self.code.clone().unwrap_or_default(),
            },
        })
    }
}

/// 项目列表条目
///
/// 首页项目卡片只需要这些字段；缓冲区内容不进入列表缓存。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub title: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl From<&ProjectRecord> for ProjectSummary {
    fn from(record: &ProjectRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            language: record.language.clone(),
            date: record.date.clone(),
        }
    }
}
