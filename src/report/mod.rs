//! Output formats for a scored listing
//!
//! - **HTML**: the highlighted listing with the heat overlay baked in as CSS
//! - **JSON**: per-line averages and intensities
//! - **CSV**: the same table, spreadsheet-friendly
//!
//! # Usage
//!
//! ```ignore
//! use glance::report;
//!
//! // Format follows the extension
//! report::generate("lib.html", "src/lib.rs", &payload)?;
//! report::generate("lib.json", "src/lib.rs", &payload)?;
//! report::generate("lib.csv", "src/lib.rs", &payload)?;
//! ```

pub mod csv;
pub mod html;
pub mod json;

use crate::location::display_name;
use crate::payload::{LineWindow, RenderPayload};
use crate::render::LineScoreRenderer;
use crate::scoring;
use std::io;
use std::path::Path;

/// Write a report for `payload`, picking the format from `path`'s extension.
pub fn generate<P: AsRef<Path>>(path: P, file: &str, payload: &RenderPayload) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut out = std::fs::File::create(path)?;

    match ext.as_str() {
        "html" | "htm" => {
            let page = render_page(file, payload);
            page.write(&mut out)
        }
        "json" => json::write(&mut out, file, &scoring::line_scores(&payload.line_windows)),
        _ => csv::write(&mut out, &scoring::line_scores(&payload.line_windows)),
    }
}

/// Render `payload` into a fresh page titled after `file`.
pub fn render_page(file: &str, payload: &RenderPayload) -> html::StaticPage {
    let mut page = html::StaticPage::new(display_name(file))
        .with_generated(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
    // A StaticPage always has its container
    if let Err(e) = LineScoreRenderer::new().render(payload, &mut page) {
        tracing::error!("static page render failed: {}", e);
    }
    page
}

/// The `n` highest-scoring windows, best first. Equal scores keep payload
/// order.
pub fn top_windows(payload: &RenderPayload, n: usize) -> Vec<&LineWindow> {
    let mut windows: Vec<&LineWindow> = payload.line_windows.iter().collect();
    windows.sort_by(|a, b| b.score.total_cmp(&a.score));
    windows.truncate(n);
    windows
}
