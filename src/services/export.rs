//! # 项目导出服务
//!
//! 将编辑器中的当前草稿（而非后端已保存的版本）打包为可下载的文件。
//! 纯本地操作，不发起任何网络请求。
//!
//! ## 导出策略
//! - **单文件导出**：web 项目生成一个独立 HTML 文档（CSS 放进唯一的 `<style>`，
//!   JS 放进唯一的 `<script>`）；其他语言原样导出 `code`，扩展名取自语言表
//! - **ZIP 打包导出**：web 项目拆分为 `index.html` / `style.css` / `script.js`；
//!   单文件项目为 `main<ext>`，标准输入草稿非空时附带 `input.txt`
//!
//! 文件名取项目标题，标题为空时使用 `project`，写盘前会清洗掉文件系统不允许的字符。

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::models::project::ProjectContent;
use crate::utils::path::sanitize_file_name;

/// 标题为空时使用的文件名
const FALLBACK_TITLE: &str = "project";

/// 一个待写盘的导出产物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// 建议的文件名（未清洗）
    pub file_name: String,
    /// 文件内容
    pub contents: Vec<u8>,
}

/// 导出完成后返回给前端的信息
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    /// 实际写入的文件路径
    pub path: PathBuf,
    /// 写入的字节数
    pub bytes: usize,
}

fn display_title(title: &str) -> &str {
    if title.is_empty() {
        FALLBACK_TITLE
    } else {
        title
    }
}

/// 生成 web 项目的独立 HTML 文档
///
/// 缓冲区内容按字节原样嵌入，不做转义。
pub fn to_html_document(title: &str, html: &str, css: &str, js: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n\
         <title>{}</title>\n<style>\n{}\n</style>\n</head>\n<body>\n{}\n\
         <script>\n{}\n</script>\n</body>\n</html>",
        display_title(title),
        css,
        html,
        js
    )
}

/// 单文件导出
pub fn export_single(title: &str, content: &ProjectContent) -> ExportArtifact {
    let base = display_title(title);
    match content {
        ProjectContent::Web { html, css, js } => ExportArtifact {
            file_name: format!("{}.html", base),
            contents: to_html_document(title, html, css, js).into_bytes(),
        },
        ProjectContent::SingleFile { language, code } => ExportArtifact {
            file_name: format!("{}{}", base, language.file_extension()),
            contents: code.clone().into_bytes(),
        },
    }
}

/// ZIP 打包导出
///
/// # 错误
/// 压缩写入失败时返回错误
pub fn export_bundle(
    title: &str,
    content: &ProjectContent,
    input: &str,
) -> Result<ExportArtifact, String> {
    let mut entries: Vec<(String, Vec<u8>)> = Vec::new();
    match content {
        ProjectContent::Web { html, css, js } => {
            entries.push((
                "index.html".into(),
                to_html_document(title, html, css, js).into_bytes(),
            ));
            entries.push(("style.css".into(), css.clone().into_bytes()));
            entries.push(("script.js".into(), js.clone().into_bytes()));
        }
        ProjectContent::SingleFile { language, code } => {
            entries.push((
                format!("main{}", language.file_extension()),
                code.clone().into_bytes(),
            ));
            if !input.is_empty() {
                entries.push(("input.txt".into(), input.as_bytes().to_vec()));
            }
        }
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in &entries {
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| format!("写入压缩条目 {} 失败: {}", name, e))?;
        writer
            .write_all(data)
            .map_err(|e| format!("写入压缩条目 {} 失败: {}", name, e))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| format!("完成 ZIP 文件失败: {}", e))?;

    Ok(ExportArtifact {
        file_name: format!("{}.zip", display_title(title)),
        contents: cursor.into_inner(),
    })
}

/// 将导出产物写入目录
///
/// 目录不存在时自动创建；同名文件会被覆盖。
///
/// # 错误
/// 目录创建或文件写入失败时返回错误
pub async fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<ExportResult, String> {
    if !dir.exists() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| format!("创建导出目录失败: {}", e))?;
    }

    let path = dir.join(sanitize_file_name(&artifact.file_name));
    tokio::fs::write(&path, &artifact.contents)
        .await
        .map_err(|e| format!("写入导出文件失败: {}", e))?;

    log::info!("已导出 {} ({} 字节)", path.display(), artifact.contents.len());

    Ok(ExportResult {
        path,
        bytes: artifact.contents.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::Language;
    use std::io::Read;

    fn web(html: &str, css: &str, js: &str) -> ProjectContent {
        ProjectContent::Web {
            html: html.into(),
            css: css.into(),
            js: js.into(),
        }
    }

    #[test]
    fn test_web_document_layout() {
        let doc = to_html_document("Site", "<h1>x</h1>", "h1{color:red}", "alert(1)");
        assert_eq!(
            doc,
            "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n\
             <title>Site</title>\n<style>\nh1{color:red}\n</style>\n</head>\n<body>\n\
             <h1>x</h1>\n<script>\nalert(1)\n</script>\n</body>\n</html>"
        );
    }

    #[test]
    fn test_web_export_wraps_buffers_once() {
        let css = "a { b: c; }\n/* </styl */";
        let js = "let s = '<scrip';\nconsole.log(s);";
        let artifact = export_single("", &web("<p>hi</p>", css, js));
        let doc = String::from_utf8(artifact.contents).unwrap();

        assert_eq!(artifact.file_name, "project.html");
        assert_eq!(doc.matches("<style>").count(), 1);
        assert_eq!(doc.matches("<script>").count(), 1);
        assert!(doc.contains(&format!("<style>\n{}\n</style>", css)));
        assert!(doc.contains(&format!("<script>\n{}\n</script>", js)));
        assert!(doc.contains("<title>project</title>"));
    }

    #[test]
    fn test_single_file_export_is_verbatim() {
        let content = ProjectContent::SingleFile {
            language: Language::Cpp,
            code: "int main() {}\n".into(),
        };
        let artifact = export_single("Algo", &content);
        assert_eq!(artifact.file_name, "Algo.cpp");
        assert_eq!(artifact.contents, b"int main() {}\n");
    }

    #[test]
    fn test_bundle_entries() {
        let content = ProjectContent::SingleFile {
            language: Language::Python,
            code: "print(input())".into(),
        };
        let artifact = export_bundle("Echo", &content, "hello").unwrap();
        assert_eq!(artifact.file_name, "Echo.zip");

        let mut archive = zip::ZipArchive::new(Cursor::new(artifact.contents)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        assert_eq!(names, vec!["input.txt", "main.py"]);

        let mut code = String::new();
        archive
            .by_name("main.py")
            .unwrap()
            .read_to_string(&mut code)
            .unwrap();
        assert_eq!(code, "print(input())");
    }

    #[test]
    fn test_web_bundle_without_input_file() {
        let artifact = export_bundle("Site", &web("<p/>", "p{}", "f()"), "ignored").unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(artifact.contents)).unwrap();
        let mut names: Vec<&str> = archive.file_names().collect();
        names.sort();
        assert_eq!(names, vec!["index.html", "script.js", "style.css"]);
    }

    #[tokio::test]
    async fn test_write_artifact_sanitizes_name() {
        let dir = std::env::temp_dir().join(format!("codeforge-export-{}", std::process::id()));
        let artifact = ExportArtifact {
            file_name: "a/b:c.py".into(),
            contents: b"x".to_vec(),
        };

        let result = write_artifact(&dir, &artifact).await.unwrap();
        assert_eq!(result.path, dir.join("a_b_c.py"));
        assert_eq!(result.bytes, 1);
        assert_eq!(std::fs::read(&result.path).unwrap(), b"x");

        let _ = std::fs::remove_dir_all(dir);
    }
}
