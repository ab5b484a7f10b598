//! Wire types for the `/glance` scoring endpoint
//!
//! ```json
//! {
//!   "highlightedContent": "<tr><td class=\"line\" data-line=\"1\"></td><td class=\"code\">...</td></tr>",
//!   "lineWindows": [ { "startLine": 0, "endLine": 10, "score": 0.0123 } ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// A half-open range of source lines `[start_line, end_line)` sharing one score.
///
/// Lines are 0-based here. The DOM numbers rows from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineWindow {
    pub start_line: usize,
    pub end_line: usize,
    pub score: f64,
    /// Raw text of the window. The scorer sends it along; rendering ignores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl LineWindow {
    pub fn new(start_line: usize, end_line: usize, score: f64) -> Self {
        Self {
            start_line,
            end_line,
            score,
            content: None,
        }
    }

    /// True when the window covers no lines at all.
    pub fn is_empty(&self) -> bool {
        self.start_line >= self.end_line
    }

    /// 0-based indices of every line in the window.
    pub fn lines(&self) -> std::ops::Range<usize> {
        self.start_line..self.end_line
    }
}

/// Highlighted listing plus the scored windows for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPayload {
    pub highlighted_content: String,
    #[serde(default)]
    pub line_windows: Vec<LineWindow>,
}

impl RenderPayload {
    pub fn new(highlighted_content: impl Into<String>, line_windows: Vec<LineWindow>) -> Self {
        Self {
            highlighted_content: highlighted_content.into(),
            line_windows,
        }
    }
}
