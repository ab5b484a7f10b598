//! Painting line heat onto a rendered listing
//!
//! [`LineScoreRenderer`] knows nothing about browsers or files. It talks to a
//! [`RenderPort`], which owns the actual markup: the live DOM in the wasm
//! build, or a [`StaticPage`](crate::report::html::StaticPage) on the command
//! line.

use crate::payload::RenderPayload;
use crate::scoring::{self, LineScores};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Selector of the element whose markup is replaced with the listing.
pub const CONTAINER_SELECTOR: &str = "#code";

/// Base color of the overlay. The alpha comes from the line intensity.
pub const HEAT_RGB: (u8, u8, u8) = (255, 180, 255);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("code container `{0}` not found")]
    MissingContainer(String),
}

/// Where the listing and its row colors end up.
pub trait RenderPort {
    /// Replace the container's content wholesale with `html`.
    fn set_container_markup(&mut self, html: &str) -> Result<(), RenderError>;

    /// Set the background of the row for 1-based `line_number`.
    ///
    /// Returns `false` if there is no such row.
    fn set_row_color(&mut self, line_number: usize, color: &str) -> bool;
}

/// `rgba(255, 180, 255, <alpha>)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatColor {
    pub alpha: f64,
}

impl HeatColor {
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }
}

impl fmt::Display for HeatColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = HEAT_RGB;
        write!(f, "rgba({}, {}, {}, {})", r, g, b, self.alpha)
    }
}

/// What a render call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOutcome {
    /// Lines that received a score
    pub scored_lines: usize,
    /// Rows whose background was set
    pub painted_rows: usize,
    /// Scored lines with no matching row
    pub skipped_rows: usize,
}

/// Injects a payload's listing and paints its rows. Holds no state between
/// calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineScoreRenderer;

impl LineScoreRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `payload` into `port`.
    ///
    /// Fails only when the port has no container; in that case nothing is
    /// painted. Rows that don't exist are skipped.
    pub fn render<P>(
        &self,
        payload: &RenderPayload,
        port: &mut P,
    ) -> Result<RenderOutcome, RenderError>
    where
        P: RenderPort + ?Sized,
    {
        port.set_container_markup(&payload.highlighted_content)?;

        let scores = scoring::line_scores(&payload.line_windows);
        let outcome = paint(&scores, port);

        info!(
            windows = payload.line_windows.len(),
            scored = outcome.scored_lines,
            painted = outcome.painted_rows,
            skipped = outcome.skipped_rows,
            "rendered line heat"
        );
        Ok(outcome)
    }
}

/// Paint already computed scores, ascending by line.
pub fn paint<P>(scores: &LineScores, port: &mut P) -> RenderOutcome
where
    P: RenderPort + ?Sized,
{
    let mut outcome = RenderOutcome {
        scored_lines: scores.len(),
        ..RenderOutcome::default()
    };

    for score in &scores.lines {
        let color = HeatColor::new(score.intensity).to_string();
        if port.set_row_color(score.line_number(), &color) {
            outcome.painted_rows += 1;
        } else {
            debug!(line = score.line_number(), "no row for scored line");
            outcome.skipped_rows += 1;
        }
    }

    outcome
}

/// Shorthand for `LineScoreRenderer::new().render(payload, port)`.
pub fn render<P>(payload: &RenderPayload, port: &mut P) -> Result<RenderOutcome, RenderError>
where
    P: RenderPort + ?Sized,
{
    LineScoreRenderer::new().render(payload, port)
}
