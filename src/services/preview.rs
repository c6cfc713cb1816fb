//! # web 项目实时预览
//!
//! 将 HTML/CSS/JS 三个缓冲区合成为一个文档，交给预览渲染器：
//!
//! ```text
//! html + "<style>" + css + "</style>" + "<script>" + js + "</script>"
//! ```
//!
//! 渲染方式通过 `PreviewRenderer` 能力接口隔离，编辑器只依赖接口，
//! 更换沙箱机制（iframe srcdoc、临时文件、独立 WebView 等）不影响编辑器逻辑。
//!
//! 预览文档中的脚本/样式错误由承载它的沙箱自行处理，宿主不捕获也不上报。

use std::path::PathBuf;

use serde::Serialize;

use crate::utils::path::sanitize_file_name;

/// 一次渲染的产物，随编辑器快照返回给前端
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum PreviewFrame {
    /// 作为 iframe `srcdoc` 使用的完整文档
    Srcdoc(String),
    /// 已写入磁盘的预览文件路径
    File(PathBuf),
}

/// 预览渲染能力接口
pub trait PreviewRenderer: Send + Sync {
    /// 渲染某个项目三个缓冲区的当前内容
    ///
    /// # 错误
    /// 渲染器自身失败时（如临时文件写入失败）返回错误；
    /// 文档内容本身的错误不在此处体现
    fn render(
        &self,
        project_id: &str,
        html: &str,
        css: &str,
        js: &str,
    ) -> Result<PreviewFrame, String>;

    /// 项目编辑器关闭后释放该项目占用的渲染资源
    fn discard(&self, _project_id: &str) {}
}

/// 合成预览文档
pub fn compose_document(html: &str, css: &str, js: &str) -> String {
    let mut doc = String::with_capacity(html.len() + css.len() + js.len() + 34);
    doc.push_str(html);
    doc.push_str("<style>");
    doc.push_str(css);
    doc.push_str("</style>");
    doc.push_str("<script>");
    doc.push_str(js);
    doc.push_str("</script>");
    doc
}

/// srcdoc 渲染器：文档交给前端的沙箱 iframe
pub struct SrcdocRenderer;

impl PreviewRenderer for SrcdocRenderer {
    fn render(
        &self,
        _project_id: &str,
        html: &str,
        css: &str,
        js: &str,
    ) -> Result<PreviewFrame, String> {
        Ok(PreviewFrame::Srcdoc(compose_document(html, css, js)))
    }
}

/// 临时文件渲染器：每个项目一个 `<dir>/preview-<项目 ID>.html`
///
/// 每次渲染覆盖同一个文件，`discard` 时删除。
pub struct TempFileRenderer {
    dir: PathBuf,
}

impl TempFileRenderer {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// 使用系统临时目录下的 `codeforge-preview/`
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("codeforge-preview"))
    }

    fn file_for(&self, project_id: &str) -> PathBuf {
        self.dir
            .join(format!("preview-{}.html", sanitize_file_name(project_id)))
    }
}

impl PreviewRenderer for TempFileRenderer {
    fn render(
        &self,
        project_id: &str,
        html: &str,
        css: &str,
        js: &str,
    ) -> Result<PreviewFrame, String> {
        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir)
                .map_err(|e| format!("创建预览目录失败: {}", e))?;
        }

        let path = self.file_for(project_id);
        std::fs::write(&path, compose_document(html, css, js))
            .map_err(|e| format!("写入预览文件失败: {}", e))?;

        Ok(PreviewFrame::File(path))
    }

    fn discard(&self, project_id: &str) {
        let path = self.file_for(project_id);
        match std::fs::remove_file(&path) {
            Ok(()) => log::debug!("已删除预览文件 {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("删除预览文件 {} 失败: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_wraps_css_and_js() {
        assert_eq!(
            compose_document("<h1>Hi</h1>", "h1 { color: red; }", "console.log(1)"),
            "<h1>Hi</h1><style>h1 { color: red; }</style><script>console.log(1)</script>"
        );
    }

    #[test]
    fn test_srcdoc_renderer() {
        let frame = SrcdocRenderer.render("p1", "", "", "").unwrap();
        assert_eq!(
            frame,
            PreviewFrame::Srcdoc("<style></style><script></script>".into())
        );
    }

    fn files_in(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
    }

    #[test]
    fn test_temp_file_renderer_overwrites_one_file_per_project() {
        let dir = std::env::temp_dir().join(format!("codeforge-preview-test-{}", std::process::id()));
        let renderer = TempFileRenderer::new(dir.clone());

        let mut last = None;
        for css in ["p{}", "p{color:red}", "p{margin:0}"] {
            last = Some(renderer.render("p1", "<p>x</p>", css, "1").unwrap());
        }
        let Some(PreviewFrame::File(path)) = last else {
            panic!("expected a file frame");
        };
        assert_eq!(path, dir.join("preview-p1.html"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "<p>x</p><style>p{margin:0}</style><script>1</script>"
        );
        assert_eq!(files_in(&dir), 1);

        renderer.render("p2", "", "", "").unwrap();
        assert_eq!(files_in(&dir), 2);

        renderer.discard("p1");
        renderer.discard("p1");
        assert!(!path.exists());
        assert_eq!(files_in(&dir), 1);

        let _ = std::fs::remove_dir_all(dir);
    }
}
