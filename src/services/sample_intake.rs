// Writing Sample Intake
// Extracts plain text from pasted content, uploaded files and web pages,
// validates it and produces the metadata that confidence scoring consumes

use chrono::{DateTime, Utc};
use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild, TableCellContent, TableChild,
    TableRowChild,
};
use reqwest::Client;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{SampleDescriptor, SourceKind};
use crate::services::text_processor::count_words;

/// Samples below this are too thin to say anything about a writer's style.
pub const MIN_SAMPLE_WORDS: usize = 50;

const URL_FETCH_TIMEOUT_SECS: u64 = 30;
const URL_USER_AGENT: &str = "Mozilla/5.0 (compatible; VoiceCloneBot/1.0; +https://voiceclone.app)";
const URL_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Elements whose content never counts as writing.
const NON_CONTENT_TAGS: [&str; 8] = [
    "script", "style", "nav", "footer", "header", "aside", "noscript", "iframe",
];

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("Content cannot be empty")]
    EmptyContent,
    #[error("Sample must contain at least {min} words (found {words})")]
    TooShort { words: usize, min: usize },
    #[error("File must have a filename")]
    MissingFileName,
    #[error("Unsupported file type: {0}. Supported: .txt, .pdf, .docx")]
    UnsupportedFileType(String),
    #[error("Text file is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    #[error("DOCX extraction failed: {0}")]
    Docx(String),
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Could not extract text from {0}")]
    NoTextExtracted(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WritingSample {
    pub id: Uuid,
    pub source_kind: SourceKind,
    pub content: String,
    pub word_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WritingSample {
    pub fn from_paste(content: &str) -> Result<Self, SampleError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(SampleError::EmptyContent);
        }
        Self::build(SourceKind::Paste, content, None, None)
    }

    pub fn from_file(file_name: &str, bytes: &[u8]) -> Result<Self, SampleError> {
        if file_name.trim().is_empty() {
            return Err(SampleError::MissingFileName);
        }
        let text = extract_text_from_file(file_name, bytes)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(SampleError::NoTextExtracted(file_name.to_string()));
        }
        Self::build(SourceKind::File, text, None, Some(file_name.to_string()))
    }

    /// Build from text already fetched from `url` (see [`fetch_url_text`]).
    pub fn from_url_text(url: &str, text: &str) -> Result<Self, SampleError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SampleError::NoTextExtracted(url.to_string()));
        }
        Self::build(SourceKind::Url, text, Some(url.to_string()), None)
    }

    pub async fn from_url(client: &Client, url: &str) -> Result<Self, SampleError> {
        let text = fetch_url_text(client, url).await?;
        Self::from_url_text(url, &text)
    }

    pub fn descriptor(&self) -> SampleDescriptor {
        SampleDescriptor::new(self.word_count, self.source_kind)
    }

    fn build(
        source_kind: SourceKind,
        content: &str,
        source_url: Option<String>,
        original_filename: Option<String>,
    ) -> Result<Self, SampleError> {
        let words = count_words(content);
        if words < MIN_SAMPLE_WORDS {
            return Err(SampleError::TooShort {
                words,
                min: MIN_SAMPLE_WORDS,
            });
        }

        let sample = Self {
            id: Uuid::new_v4(),
            source_kind,
            content: content.to_string(),
            word_count: u32::try_from(words).unwrap_or(u32::MAX),
            source_url,
            original_filename,
            created_at: Utc::now(),
        };
        info!(
            id = %sample.id,
            source = %source_kind,
            words = sample.word_count,
            "sample.accepted"
        );
        Ok(sample)
    }
}

/// Descriptors for a whole set of samples, ready for confidence scoring.
pub fn describe_samples(samples: &[WritingSample]) -> Vec<SampleDescriptor> {
    samples.iter().map(WritingSample::descriptor).collect()
}

// ============ File extraction ============

pub fn extract_text_from_file(file_name: &str, bytes: &[u8]) -> Result<String, SampleError> {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => Ok(String::from_utf8(bytes.to_vec())?),
        "pdf" => extract_text_from_pdf(bytes),
        "docx" => extract_text_from_docx(bytes),
        _ => Err(SampleError::UnsupportedFileType(file_name.to_string())),
    }
}

/// Non-blank pages joined by blank lines.
pub fn extract_text_from_pdf(bytes: &[u8]) -> Result<String, SampleError> {
    let raw = pdf_extract::extract_text_from_mem(bytes).map_err(|e| SampleError::Pdf(e.to_string()))?;
    let pages: Vec<&str> = raw
        .split('\u{c}')
        .filter(|page| !page.trim().is_empty())
        .collect();
    Ok(pages.join("\n\n"))
}

/// Non-blank paragraphs, then each table row as `cell | cell`, joined by blank lines.
pub fn extract_text_from_docx(bytes: &[u8]) -> Result<String, SampleError> {
    let docx = read_docx(bytes).map_err(|e| SampleError::Docx(e.to_string()))?;

    let mut paragraphs = Vec::new();
    let mut rows = Vec::new();

    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => {
                let text = paragraph_text(p);
                if !text.trim().is_empty() {
                    paragraphs.push(text);
                }
            }
            DocumentChild::Table(table) => {
                for row_child in &table.rows {
                    if let TableChild::TableRow(row) = row_child {
                        let cells: Vec<String> = row.cells.iter().filter_map(cell_text).collect();
                        if !cells.is_empty() {
                            rows.push(cells.join(" | "));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    paragraphs.extend(rows);
    Ok(paragraphs.join("\n\n"))
}

fn cell_text(row_child: &TableRowChild) -> Option<String> {
    let TableRowChild::TableCell(cell) = row_child else {
        return None;
    };
    let text = cell
        .children
        .iter()
        .filter_map(|content| match content {
            TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut out = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let RunChild::Text(t) = run_child {
                    out.push_str(&t.text);
                }
            }
        }
    }
    out
}

// ============ URL extraction ============

pub fn build_fetch_client() -> Result<Client, SampleError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(URL_FETCH_TIMEOUT_SECS))
        .user_agent(URL_USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?)
}

pub async fn fetch_url_text(client: &Client, url: &str) -> Result<String, SampleError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, URL_ACCEPT)
        .send()
        .await?
        .error_for_status()?;
    let html = response.text().await?;
    let text = html_to_text(&html);
    if text.is_empty() {
        warn!(url, "sample.url_empty");
    }
    Ok(text)
}

/// Class fragments marking navigation, ads, sharing and comment blocks.
const NON_CONTENT_CLASS_PATTERNS: [&str; 9] = [
    "sidebar", "menu", "nav", "footer", "header", "ad", "social", "share", "comment",
];

/// Class fragments marking the main text container when there is no article or main.
const CONTENT_CLASS_PATTERNS: [&str; 4] = ["content", "article", "post", "entry"];

fn has_class_matching(element: &Element, patterns: &[&str]) -> bool {
    element.classes().any(|class| {
        let class = class.to_lowercase();
        patterns.iter().any(|p| class.contains(p))
    })
}

fn is_non_content(element: &Element) -> bool {
    NON_CONTENT_TAGS.iter().any(|tag| *tag == element.name())
        || has_class_matching(element, &NON_CONTENT_CLASS_PATTERNS)
}

/// First element in document order matching `pred`, never looking inside non-content blocks.
fn find_content<'a>(root: ElementRef<'a>, pred: &dyn Fn(&Element) -> bool) -> Option<ElementRef<'a>> {
    for child in root.children() {
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        if is_non_content(child.value()) {
            continue;
        }
        if pred(child.value()) {
            return Some(child);
        }
        if let Some(found) = find_content(child, pred) {
            return Some(found);
        }
    }
    None
}

fn collect_lines(root: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in root.children() {
        match child.value() {
            Node::Text(text) => lines.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            ),
            Node::Element(element) if !is_non_content(element) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_lines(child, lines);
                }
            }
            _ => {}
        }
    }
}

/// Main readable text of an HTML page: one trimmed line per text run, blank-line separated.
///
/// The container is the first `article`, else `main`, else an element whose
/// class names it as content, else `body`.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let main = find_content(root, &|e| e.name() == "article")
        .or_else(|| find_content(root, &|e| e.name() == "main"))
        .or_else(|| find_content(root, &|e| has_class_matching(e, &CONTENT_CLASS_PATTERNS)))
        .or_else(|| find_content(root, &|e| e.name() == "body"));

    let Some(main) = main else {
        return String::new();
    };

    let mut lines = Vec::new();
    collect_lines(main, &mut lines);
    lines.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("word{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_paste_accepts_enough_words() {
        let sample = WritingSample::from_paste(&format!("  {}  ", words(60))).unwrap();
        assert_eq!(sample.word_count, 60);
        assert_eq!(sample.source_kind, SourceKind::Paste);
        assert!(!sample.content.starts_with(' '));
        assert_eq!(sample.descriptor(), SampleDescriptor::new(60, SourceKind::Paste));
    }

    #[test]
    fn test_paste_rejects_empty_and_short() {
        assert!(matches!(WritingSample::from_paste("   "), Err(SampleError::EmptyContent)));
        match WritingSample::from_paste(&words(49)) {
            Err(SampleError::TooShort { words, min }) => {
                assert_eq!(words, 49);
                assert_eq!(min, MIN_SAMPLE_WORDS);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_txt_file() {
        let body = words(75);
        let sample = WritingSample::from_file("Essay.TXT", body.as_bytes()).unwrap();
        assert_eq!(sample.source_kind, SourceKind::File);
        assert_eq!(sample.original_filename.as_deref(), Some("Essay.TXT"));
        assert_eq!(sample.word_count, 75);
    }

    #[test]
    fn test_unsupported_and_invalid_files() {
        assert!(matches!(
            extract_text_from_file("notes.rtf", b"hello"),
            Err(SampleError::UnsupportedFileType(_))
        ));
        assert!(matches!(
            extract_text_from_file("notes.txt", &[0xff, 0xfe, 0xfd]),
            Err(SampleError::InvalidUtf8(_))
        ));
        assert!(matches!(
            WritingSample::from_file("", b"text"),
            Err(SampleError::MissingFileName)
        ));
        assert!(matches!(
            WritingSample::from_file("blank.txt", b"  \n "),
            Err(SampleError::NoTextExtracted(_))
        ));
    }

    #[test]
    fn test_corrupt_docx() {
        assert!(matches!(extract_text_from_docx(b"not a zip"), Err(SampleError::Docx(_))));
    }

    #[test]
    fn test_html_to_text_prefers_article() {
        let html = r#"<html><head><style>p { color: red }</style></head>
            <body><nav>Home | About</nav>
            <article><h1>Title &amp; more</h1><p>First para.</p>
            <script>var x = 1;</script><p>Second   para.</p></article>
            <footer>Copyright</footer></body></html>"#;
        assert_eq!(html_to_text(html), "Title & more\n\nFirst para.\n\nSecond   para.");
    }

    #[test]
    fn test_html_to_text_falls_back_to_body() {
        let html = "<body><header>Site</header><p>Only &lt;this&gt;</p><!-- hidden --></body>";
        assert_eq!(html_to_text(html), "Only <this>");
    }

    #[test]
    fn test_html_entities_decoded_before_counting() {
        let text = html_to_text("<body><p>It&#8217;s great &mdash; really</p></body>");
        assert_eq!(text, "It\u{2019}s great \u{2014} really");
        assert_eq!(count_words(&text), 4);
    }

    #[test]
    fn test_html_to_text_drops_class_marked_blocks() {
        let html = r#"<body>
            <div class="Sidebar-Left"><p>Popular posts</p></div>
            <div class="entry-body"><p>The real post.</p>
              <div class="share-buttons">Tweet this</div>
              <section class="comments"><p>Nice!</p></section>
            </div></body>"#;
        assert_eq!(html_to_text(html), "The real post.");
    }

    #[test]
    fn test_html_to_text_skips_article_inside_removed_block() {
        let html = "<body><aside><article>Teaser</article></aside><main><p>Body text</p></main></body>";
        assert_eq!(html_to_text(html), "Body text");
    }

    #[test]
    fn test_url_text_sample() {
        let sample = WritingSample::from_url_text("https://example.com/post", &words(55)).unwrap();
        assert_eq!(sample.source_kind, SourceKind::Url);
        assert_eq!(sample.source_url.as_deref(), Some("https://example.com/post"));
        assert!(describe_samples(&[sample]).len() == 1);
    }
}
