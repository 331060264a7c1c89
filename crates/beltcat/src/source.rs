//! Document text sources.
//!
//! A [`TextSource`] yields the text of each page of a catalog document. PDF
//! documents are read through `lopdf`; plain text files separate pages with a
//! form feed (`\x0c`), which is how `pdftotext` and most text dumps mark them.

use std::path::Path;

use tracing::debug;

use crate::error::SourceError;
use crate::page_range::parse_page_range;

/// Separator placed between selected pages when they are joined.
pub const PAGE_BREAK: &str = "\n\x0c";

/// Page-addressable document text.
pub trait TextSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Text of the page at 0-based `index`.
    fn page_text(&self, index: usize) -> Result<String, SourceError>;

    /// Text of the selected pages joined by [`PAGE_BREAK`].
    ///
    /// `pages` is a 1-based page range string such as `"24"` or `"23-25"`;
    /// `None` selects every page.
    fn text(&self, pages: Option<&str>) -> Result<String, SourceError> {
        let indices = match pages {
            Some(range) => parse_page_range(range, self.page_count())?,
            None => (0..self.page_count()).collect(),
        };
        let texts = indices
            .into_iter()
            .map(|i| self.page_text(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(texts.join(PAGE_BREAK))
    }
}

fn out_of_range(index: usize, count: usize) -> SourceError {
    SourceError::PageRange(format!("page index {index} out of range (0..{count})"))
}

/// A PDF document read with `lopdf`.
pub struct PdfSource {
    doc: lopdf::Document,
    /// 1-based page numbers in document order.
    page_numbers: Vec<u32>,
}

impl PdfSource {
    /// Parse a PDF from bytes.
    ///
    /// Encrypted documents are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SourceError> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| SourceError::Pdf(format!("failed to parse PDF: {e}")))?;
        Self::from_document(doc)
    }

    /// Read and parse a PDF file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    fn from_document(doc: lopdf::Document) -> Result<Self, SourceError> {
        if doc.is_encrypted() {
            return Err(SourceError::Pdf("document is encrypted".to_string()));
        }
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        debug!(pages = page_numbers.len(), "opened PDF source");
        Ok(Self { doc, page_numbers })
    }
}

impl TextSource for PdfSource {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String, SourceError> {
        let number = *self
            .page_numbers
            .get(index)
            .ok_or_else(|| out_of_range(index, self.page_numbers.len()))?;
        self.doc
            .extract_text(&[number])
            .map_err(|e| SourceError::Pdf(format!("page {number}: {e}")))
    }
}

/// Plain text with form-feed page breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainTextSource {
    pages: Vec<String>,
}

impl PlainTextSource {
    /// Split `text` into pages at form feeds.
    ///
    /// A trailing form feed does not start an empty page. Text without form
    /// feeds is a single page.
    pub fn from_text(text: &str) -> Self {
        let body = text.strip_suffix('\x0c').unwrap_or(text);
        let pages = body
            .split('\x0c')
            .map(|p| p.strip_prefix('\n').unwrap_or(p).to_string())
            .collect();
        Self { pages }
    }

    /// Read a UTF-8 text file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_text(&text))
    }
}

impl TextSource for PlainTextSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, SourceError> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_range(index, self.pages.len()))
    }
}

/// Returns true if `bytes` start with a PDF header.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}

/// Open a document as PDF or plain text.
///
/// The format is detected from the `%PDF-` header; a `.pdf` extension on a
/// file without one is reported as a PDF parse error rather than read as text.
pub fn open_source(path: impl AsRef<Path>) -> Result<Box<dyn TextSource>, SourceError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let pdf_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf(&bytes) || pdf_extension {
        return Ok(Box::new(PdfSource::from_bytes(&bytes)?));
    }
    let text = String::from_utf8(bytes).map_err(|e| {
        SourceError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    debug!(path = %path.display(), "opened plain text source");
    Ok(Box::new(PlainTextSource::from_text(&text)))
}
