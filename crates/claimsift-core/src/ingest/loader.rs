use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The file '{}' was not found", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
}

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Pdf,
    PlainText,
    Markdown,
}

impl SourceFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::PlainText),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| LoadError::UnsupportedFormat("no extension".into()))?;

        Self::from_extension(ext).ok_or_else(|| LoadError::UnsupportedFormat(ext.into()))
    }
}

/// Produces the raw text of a source document.
#[async_trait::async_trait]
pub trait SourceLoader: Send + Sync {
    fn supported_formats(&self) -> &[SourceFormat];

    fn can_load(&self, format: SourceFormat) -> bool {
        self.supported_formats().contains(&format)
    }

    async fn load_bytes(&self, data: &[u8], format: SourceFormat) -> LoadResult<String>;

    async fn load(&self, path: &Path) -> LoadResult<String> {
        if !tokio::fs::try_exists(path).await? {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let format = SourceFormat::from_path(path)?;
        if !self.can_load(format) {
            return Err(LoadError::UnsupportedFormat(format!("{format:?}")));
        }

        let data = tokio::fs::read(path).await?;
        let text = self.load_bytes(&data, format).await?;
        tracing::info!(
            "Loaded {} characters from '{}'",
            text.chars().count(),
            path.display()
        );
        Ok(text)
    }
}

/// Extracts page text with `pdf-extract`. Pages are joined with a single
/// space.
pub struct PdfLoader;

impl PdfLoader {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn join_pages(pages: &[String]) -> String {
        let text: Vec<&str> = pages
            .iter()
            .map(|page| page.trim())
            .filter(|page| !page.is_empty())
            .collect();
        tracing::debug!(
            "PDF has {} pages, {} with text",
            pages.len(),
            text.len()
        );
        text.join(" ")
    }
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SourceLoader for PdfLoader {
    fn supported_formats(&self) -> &[SourceFormat] {
        &[SourceFormat::Pdf]
    }

    async fn load_bytes(&self, data: &[u8], _format: SourceFormat) -> LoadResult<String> {
        let data = data.to_vec();
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&data)
                .map_err(|e| LoadError::Pdf(e.to_string()))
        })
        .await
        .map_err(|e| LoadError::Pdf(e.to_string()))??;

        Ok(Self::join_pages(&pages))
    }
}

pub struct PlainTextLoader;

impl PlainTextLoader {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for PlainTextLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SourceLoader for PlainTextLoader {
    fn supported_formats(&self) -> &[SourceFormat] {
        &[SourceFormat::PlainText, SourceFormat::Markdown]
    }

    async fn load_bytes(&self, data: &[u8], _format: SourceFormat) -> LoadResult<String> {
        String::from_utf8(data.to_vec()).map_err(|e| LoadError::Encoding(e.to_string()))
    }
}

pub struct CompositeLoader {
    loaders: Vec<Box<dyn SourceLoader>>,
}

impl CompositeLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_loader(mut self, loader: Box<dyn SourceLoader>) -> Self {
        self.loaders.push(loader);
        self
    }

    fn find_loader(&self, format: SourceFormat) -> Option<&dyn SourceLoader> {
        self.loaders
            .iter()
            .find(|l| l.can_load(format))
            .map(|l| l.as_ref())
    }
}

impl Default for CompositeLoader {
    fn default() -> Self {
        Self::new()
            .with_loader(Box::new(PdfLoader::new()))
            .with_loader(Box::new(PlainTextLoader::new()))
    }
}

#[async_trait::async_trait]
impl SourceLoader for CompositeLoader {
    fn supported_formats(&self) -> &[SourceFormat] {
        &[
            SourceFormat::Pdf,
            SourceFormat::PlainText,
            SourceFormat::Markdown,
        ]
    }

    fn can_load(&self, format: SourceFormat) -> bool {
        self.find_loader(format).is_some()
    }

    async fn load_bytes(&self, data: &[u8], format: SourceFormat) -> LoadResult<String> {
        let loader = self
            .find_loader(format)
            .ok_or_else(|| LoadError::UnsupportedFormat(format!("{format:?}")))?;

        loader.load_bytes(data, format).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_extension("PDF"), Some(SourceFormat::Pdf));
        assert_eq!(SourceFormat::from_extension("md"), Some(SourceFormat::Markdown));
        assert_eq!(SourceFormat::from_extension("docx"), None);
    }

    #[test]
    fn test_join_pages() {
        let pages = vec![
            "Page one text.\n".to_string(),
            "  \n".to_string(),
            "\n  Page two.".to_string(),
            String::new(),
        ];
        assert_eq!(PdfLoader::join_pages(&pages), "Page one text. Page two.");
        assert_eq!(PdfLoader::join_pages(&[]), "");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let loader = CompositeLoader::default();
        let err = loader
            .load(Path::new("/definitely/not/here.pdf"))
            .await
            .unwrap_err();

        assert!(matches!(err, LoadError::NotFound(_)));
        assert!(err.to_string().contains("was not found"));
    }

    #[tokio::test]
    async fn test_unreadable_parent_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();

        let err = CompositeLoader::default()
            .load(&blocker.join("doc.pdf"))
            .await
            .unwrap_err();

        assert!(matches!(err, LoadError::Io(_)));
        assert!(!err.to_string().contains("was not found"));
    }

    #[tokio::test]
    async fn test_load_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "Scope: equities only.").unwrap();

        let text = CompositeLoader::default().load(&path).await.unwrap();
        assert_eq!(text, "Scope: equities only.");
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.docx");
        std::fs::write(&path, "x").unwrap();

        let err = CompositeLoader::default().load(&path).await.unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_invalid_pdf_bytes() {
        let err = PdfLoader::new()
            .load_bytes(b"not a pdf", SourceFormat::Pdf)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Pdf(_)));
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let err = PlainTextLoader::new()
            .load_bytes(&[0xff, 0xfe, 0x00], SourceFormat::PlainText)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Encoding(_)));
    }
}
