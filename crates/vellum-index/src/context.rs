//! Bounded evidence-context assembly from ranked search results.

use std::fmt::Write;

use crate::store::SearchResult;

/// Marker appended when a result's content is cut to fit the budget.
const ELLIPSIS: &str = "...";

/// Separator between formatted entries.
const SEPARATOR: &str = "\n\n";

/// Pack results, in the order given, into one evidence string of at
/// most `max_context_length` characters.
///
/// Each entry is `[source: {document_name}]` followed by the chunk
/// content on the next line. An entry that cannot fit whole is
/// truncated with an ellipsis and becomes the last entry; an entry
/// whose source tag alone does not fit is dropped and assembly stops.
/// Empty input yields an empty string.
#[must_use]
pub fn assemble_context(results: &[SearchResult], max_context_length: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;

    for result in results {
        let tag = format!("[source: {}]\n", result.document_name);
        let tag_len = tag.chars().count();
        let content_len = result.content.chars().count();
        let sep_len = if out.is_empty() {
            0
        } else {
            SEPARATOR.chars().count()
        };

        if used + sep_len + tag_len + content_len <= max_context_length {
            if sep_len > 0 {
                out.push_str(SEPARATOR);
            }
            out.push_str(&tag);
            out.push_str(&result.content);
            used += sep_len + tag_len + content_len;
            continue;
        }

        // Partial fit: cut the content, keep the tag, mark the cut.
        let remaining = max_context_length.saturating_sub(used + sep_len);
        let overhead = tag_len + ELLIPSIS.chars().count();
        if remaining > overhead {
            if sep_len > 0 {
                out.push_str(SEPARATOR);
            }
            out.push_str(&tag);
            for c in result.content.chars().take(remaining - overhead) {
                let _ = out.write_char(c);
            }
            out.push_str(ELLIPSIS);
        }
        break;
    }

    out
}
