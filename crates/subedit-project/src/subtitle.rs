//! A single subtitle

use serde::{Deserialize, Serialize};
use subedit_history::Document;

/// Subtitle with positions in milliseconds
///
/// Positions may be negative, e.g. after shifting a whole file backwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtitle {
    /// Start position
    pub start: i64,
    /// End position
    pub end: i64,
    /// Text of the main document
    pub main_text: String,
    /// Text of the translation document
    #[serde(default)]
    pub tran_text: String,
}

impl Subtitle {
    /// Create a subtitle without translation
    pub fn new(start: i64, end: i64, main_text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            main_text: main_text.into(),
            tran_text: String::new(),
        }
    }

    /// Set the translation text
    pub fn with_translation(mut self, tran_text: impl Into<String>) -> Self {
        self.tran_text = tran_text.into();
        self
    }

    /// Length of display
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }

    /// Text of one document
    pub fn text(&self, doc: Document) -> &str {
        match doc {
            Document::Main => &self.main_text,
            Document::Translation => &self.tran_text,
        }
    }

    pub(crate) fn text_mut(&mut self, doc: Document) -> &mut String {
        match doc {
            Document::Main => &mut self.main_text,
            Document::Translation => &mut self.tran_text,
        }
    }
}
