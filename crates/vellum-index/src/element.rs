//! Structural element stream produced by the document-digitization provider.

use serde::{Deserialize, Serialize};

/// Structural role of one element in the digitized document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Heading,
    Paragraph,
    Footer,
}

/// One tagged element of the ordered stream handed to the segmenter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Element {
    pub kind: ElementKind,
    pub text: String,
}

impl Element {
    #[must_use]
    pub fn heading(text: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Heading,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Paragraph,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn footer(text: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Footer,
            text: text.into(),
        }
    }
}
