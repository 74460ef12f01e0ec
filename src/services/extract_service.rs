//! 文档文本提取服务 - 业务能力层
//!
//! 只负责"把上传内容变成纯文本"这一件事，不关心出题流程
//!
//! ## 技术栈
//! - `pdf-extract` 提取 PDF 全部页面的文本
//! - `docx-rs` 提取 DOCX 正文文本（丢弃样式）
//! - 纯文本文件按 UTF-8 原样读取

use crate::config::Config;
use crate::error::{AppError, AppResult, ExtractError};
use phf::phf_map;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// 支持的文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    Docx,
}

/// 扩展名（小写）到文档类型的静态映射
static SUPPORTED_EXTENSIONS: phf::Map<&'static str, DocumentKind> = phf_map! {
    "txt" => DocumentKind::PlainText,
    "pdf" => DocumentKind::Pdf,
    "docx" => DocumentKind::Docx,
};

/// 文档文本提取服务
///
/// 职责：
/// - 按扩展名识别文档类型
/// - 把上传内容落盘为临时文件，提取后删除（成功失败都删）
/// - 只产出纯文本，不出现题目结构
pub struct ExtractService {
    upload_dir: PathBuf,
}

impl ExtractService {
    /// 创建新的提取服务
    pub fn new(config: &Config) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.upload_dir),
        }
    }

    /// 识别文件类型，不支持的类型返回 None
    pub fn kind_of(original_name: &str) -> Option<DocumentKind> {
        let ext = Path::new(original_name)
            .extension()?
            .to_str()?
            .to_lowercase();
        SUPPORTED_EXTENSIONS.get(ext.as_str()).copied()
    }

    /// 把上传文件提取为纯文本
    ///
    /// # 参数
    /// - `original_name`: 用户上传时的原始文件名（用于识别类型）
    /// - `bytes`: 文件内容
    ///
    /// # 返回
    /// 返回提取出的纯文本；空白内容的判断交给上层流程
    pub async fn extract(&self, original_name: &str, bytes: &[u8]) -> AppResult<String> {
        let kind = Self::kind_of(original_name).ok_or_else(|| ExtractError::Unsupported {
            extension: extension_of(original_name),
        })?;

        debug!("识别文件类型: {} -> {:?}", original_name, kind);

        // 临时文件由守卫持有，本函数的所有退出路径都会触发删除
        let temp = TempUpload::create(&self.upload_dir, original_name, bytes).await?;

        let text = match kind {
            DocumentKind::PlainText => {
                let raw = fs::read(temp.path()).await.map_err(|source| ExtractError::Io {
                    path: temp.path().display().to_string(),
                    source,
                })?;
                String::from_utf8_lossy(&raw).into_owned()
            }
            DocumentKind::Pdf => extract_pdf(temp.path().to_path_buf()).await?,
            DocumentKind::Docx => extract_docx(temp.path().to_path_buf()).await?,
        };

        debug!("提取完成，共 {} 字符", text.chars().count());

        // PDF 提取结果常带成片的空行，压缩成最多一个空行
        let re = Regex::new(r"\n{3,}").map_err(|e| AppError::Other(e.to_string()))?;
        Ok(re.replace_all(&text, "\n\n").into_owned())
    }
}

/// 取出文件扩展名（小写），没有扩展名返回 None
fn extension_of(original_name: &str) -> Option<String> {
    Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// 上传内容的临时落盘守卫
///
/// Drop 时删除文件，保证提取失败时也不残留
struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    async fn create(dir: &Path, original_name: &str, bytes: &[u8]) -> Result<Self, ExtractError> {
        fs::create_dir_all(dir).await.map_err(|source| ExtractError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let file_name = match extension_of(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let path = dir.join(file_name);

        fs::write(&path, bytes).await.map_err(|source| ExtractError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("删除临时文件失败 ({}): {}", self.path.display(), e);
        }
    }
}

/// 提取 PDF 全部页面的文本（阻塞解析放到 blocking 线程）
async fn extract_pdf(path: PathBuf) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text(&path).map_err(|e| ExtractError::PdfParse {
            detail: e.to_string(),
        })
    })
    .await
    .map_err(|e| ExtractError::PdfParse {
        detail: e.to_string(),
    })?
}

/// 提取 DOCX 正文文本，丢弃样式
async fn extract_docx(path: PathBuf) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || {
        let buf = std::fs::read(&path).map_err(|source| ExtractError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let docx = docx_rs::read_docx(&buf).map_err(|e| ExtractError::DocxParse {
            detail: e.to_string(),
        })?;
        Ok(docx_text(&docx))
    })
    .await
    .map_err(|e| ExtractError::DocxParse {
        detail: e.to_string(),
    })?
}

/// 遍历文档段落，拼出纯文本
fn docx_text(docx: &docx_rs::Docx) -> String {
    use docx_rs::{DocumentChild, ParagraphChild, RunChild};

    let mut out = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for pc in &paragraph.children {
                if let ParagraphChild::Run(run) = pc {
                    for rc in &run.children {
                        if let RunChild::Text(text) = rc {
                            line.push_str(&text.text);
                        }
                    }
                }
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> (ExtractService, PathBuf) {
        let dir = std::env::temp_dir().join(format!("studyallo-extract-{}", Uuid::new_v4()));
        let config = Config {
            upload_dir: dir.display().to_string(),
            ..Config::default()
        };
        (ExtractService::new(&config), dir)
    }

    #[test]
    fn test_kind_of_supported_extensions() {
        assert_eq!(
            ExtractService::kind_of("notes.txt"),
            Some(DocumentKind::PlainText)
        );
        // 扩展名大小写不敏感
        assert_eq!(ExtractService::kind_of("slides.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(
            ExtractService::kind_of("chapter.docx"),
            Some(DocumentKind::Docx)
        );
    }

    #[test]
    fn test_kind_of_rejects_others() {
        assert_eq!(ExtractService::kind_of("virus.exe"), None);
        assert_eq!(ExtractService::kind_of("photo.jpg"), None);
        assert_eq!(ExtractService::kind_of("no_extension"), None);
    }

    #[test]
    fn test_extract_txt_and_cleanup() {
        tokio_test::block_on(async {
            let (service, dir) = test_service();

            let text = service
                .extract("notes.txt", "光合作用发生在叶绿体中。".as_bytes())
                .await
                .expect("txt 提取应该成功");
            assert_eq!(text, "光合作用发生在叶绿体中。");

            // 临时文件必须已被删除
            let mut entries = fs::read_dir(&dir).await.expect("上传目录应该存在");
            assert!(entries.next_entry().await.unwrap().is_none(), "临时文件应该已删除");

            let _ = fs::remove_dir_all(&dir).await;
        });
    }

    #[tokio::test]
    async fn test_extract_unsupported_extension() {
        let (service, dir) = test_service();

        let err = service.extract("virus.exe", b"MZ").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Extract(ExtractError::Unsupported { .. })
        ));

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_extract_broken_pdf_cleans_up() {
        let (service, dir) = test_service();

        let result = service.extract("broken.pdf", b"not a real pdf").await;
        assert!(result.is_err(), "损坏的 PDF 应该提取失败");

        // 失败路径同样不残留临时文件
        let mut entries = fs::read_dir(&dir).await.expect("上传目录应该存在");
        assert!(entries.next_entry().await.unwrap().is_none(), "临时文件应该已删除");

        let _ = fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_extract_collapses_blank_runs() {
        let (service, dir) = test_service();

        let text = service
            .extract("notes.txt", b"line one\n\n\n\n\nline two")
            .await
            .unwrap();
        assert_eq!(text, "line one\n\nline two");

        let _ = fs::remove_dir_all(&dir).await;
    }
}
