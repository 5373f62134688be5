//! Section-header chunk segmentation over a tagged element stream.
//!
//! A single forward pass over the stream. Chunks are rooted at detected
//! section headers; text seen before the first header is discarded, and
//! page-number elements annotate whichever chunk is closed next.

use std::sync::LazyLock;

use regex::Regex;

use crate::element::{Element, ElementKind};

/// Section headers like "1.1" or "2.3 DESIGN": digits, dot, digits,
/// then whitespace or end of string.
static SECTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+(\s|$)").expect("section pattern must compile"));

/// Literal header prefixes used when dynamic detection is disabled.
const FALLBACK_HEADERS: [&str; 5] = ["1.0 GENERAL", "2.0 SCOPE OF SUPPLY", "3.0", "4.0", "5.0"];

/// A paragraph this short made up only of digits is a page number.
const MAX_PAGE_NUMBER_LEN: usize = 3;

/// Segmenter configuration.
#[derive(Clone, Copy, Debug)]
pub struct SegmenterConfig {
    /// Detect headers by the digits-dot-digits pattern instead of the
    /// fixed fallback prefix list.
    pub use_dynamic_headers: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            use_dynamic_headers: true,
        }
    }
}

enum SegmentState {
    /// No header seen yet; element text is discarded.
    Idle,
    /// Accumulating text into the chunk rooted at the last header.
    Collecting,
}

/// Segment an element stream into ordered chunk content strings.
///
/// Each chunk starts with its header text, carries subsequent paragraph
/// text on new lines, and ends with a `[페이지 N]` marker when a page
/// number was observed before the chunk closed. A stream with no
/// detected headers yields no chunks.
#[must_use]
pub fn segment_elements(elements: &[Element], config: &SegmenterConfig) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut state = SegmentState::Idle;
    let mut current_page: Option<String> = None;

    for element in elements {
        let text = element.text.trim();

        if is_page_number(element.kind, text) {
            current_page = Some(text.to_owned());
            continue;
        }

        if text.is_empty() {
            continue;
        }

        if is_section_header(text, config) {
            if !current.is_empty() {
                chunks.push(close_chunk(&mut current, &current_page));
            }
            current = text.to_owned();
            state = SegmentState::Collecting;
        } else if matches!(state, SegmentState::Collecting) {
            current.push('\n');
            current.push_str(text);
        }
        // Idle + non-header: pre-header text is never captured.
    }

    if !current.is_empty() {
        chunks.push(close_chunk(&mut current, &current_page));
    }

    chunks
}

fn close_chunk(current: &mut String, page: &Option<String>) -> String {
    if let Some(page) = page {
        current.push_str("\n[페이지 ");
        current.push_str(page);
        current.push(']');
    }
    std::mem::take(current).trim().to_owned()
}

/// Footer text made only of digits, or a digit-only paragraph of at
/// most [`MAX_PAGE_NUMBER_LEN`] characters, is a page-number signal.
fn is_page_number(kind: ElementKind, text: &str) -> bool {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match kind {
        ElementKind::Footer => true,
        ElementKind::Paragraph => text.len() <= MAX_PAGE_NUMBER_LEN,
        ElementKind::Heading => false,
    }
}

fn is_section_header(text: &str, config: &SegmenterConfig) -> bool {
    if config.use_dynamic_headers {
        SECTION_PATTERN.is_match(text)
    } else {
        FALLBACK_HEADERS
            .iter()
            .any(|header| text.starts_with(header))
    }
}
