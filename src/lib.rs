//! Glance - heat overlays for code listings
//!
//! Glance paints each line of a highlighted code listing with a background
//! whose opacity reflects how "important" a scorer found that line.
//!
//! # Overview
//!
//! A scoring service splits a file into overlapping windows of lines and
//! gives every window a single score. Glance turns those window scores into
//! per-line colors:
//!
//! 1. **Aggregate**: every line collects the score of each window covering it.
//! 2. **Average**: each line's scores are reduced to their mean.
//! 3. **Rescale**: averages are mapped linearly onto `[0.0, 0.9]` between the
//!    lowest and highest average of the file.
//! 4. **Paint**: the row for line `i` (1-based in the markup) gets
//!    `rgba(255, 180, 255, <intensity>)` as its background.
//!
//! # Quick Start
//!
//! ```no_run
//! use glance::report::html::StaticPage;
//! use glance::{render, LineWindow, RenderPayload};
//!
//! let payload = RenderPayload::new(
//!     r#"<tr><td class="line" data-line="1"></td><td class="code">fn main() {}</td></tr>"#,
//!     vec![LineWindow::new(0, 1, 0.42)],
//! );
//!
//! let mut page = StaticPage::new("main.rs");
//! let outcome = render(&payload, &mut page).unwrap();
//! println!("painted {} rows", outcome.painted_rows);
//! std::fs::write("main.html", page.to_html()).unwrap();
//! ```
//!
//! # Ports
//!
//! | Trait | Bindings |
//! |-------|----------|
//! | [`LineScoreSource`] | [`source::HttpSource`], [`source::DirectorySource`], [`source::CachedSource`] |
//! | [`RenderPort`] | [`report::html::StaticPage`], the DOM port in `wasm-renderer` |
//!
//! # Modules
//!
//! - [`scoring`]: aggregation, averaging and rescaling
//! - [`render`]: the renderer and its port
//! - [`source`]: payload sources
//! - [`report`]: HTML / JSON / CSV output
//! - `serve`: local HTTP server (native builds)

pub mod error;
pub mod location;
pub mod payload;
pub mod render;
pub mod report;
pub mod scoring;
pub mod source;

#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod serve;

pub use error::{GlanceError, Result};
pub use payload::{LineWindow, RenderPayload};
pub use render::{render, LineScoreRenderer, RenderError, RenderOutcome, RenderPort};
pub use scoring::{line_scores, LineScore, LineScores};
pub use source::{LineScoreSource, SourceError};
