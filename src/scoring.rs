//! Per-line score aggregation
//!
//! Windows overlap, so a single line usually collects several scores. Each
//! line's scores are averaged, then all averages are rescaled linearly into
//! `[MIN_INTENSITY, MAX_INTENSITY]` relative to the smallest and largest
//! average of the payload. The result is used directly as an alpha channel.
//!
//! Nothing here outlives a call: every map is built from the windows passed
//! in, so intensities from two different files are not comparable.

use crate::payload::LineWindow;
use std::collections::BTreeMap;
use tracing::warn;

/// Lowest intensity handed to the painter.
pub const MIN_INTENSITY: f64 = 0.0;

/// Highest intensity. Kept below 1.0 so the code stays readable.
pub const MAX_INTENSITY: f64 = 0.9;

/// Intensity used when every line averages to the same score.
///
/// Linear rescaling divides by `max - min`, which is zero here. With no
/// spread there is nothing to highlight, so every line stays unpainted-looking.
pub const DEGENERATE_INTENSITY: f64 = 0.0;

/// Smallest and largest averaged score of one payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    /// Range over averaged scores, `None` when there are none.
    pub fn of<'a, I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a f64>,
    {
        scores.into_iter().fold(None, |range, &score| match range {
            None => Some(ScoreRange { min: score, max: score }),
            Some(r) => Some(ScoreRange {
                min: r.min.min(score),
                max: r.max.max(score),
            }),
        })
    }

    /// All lines share one score (this includes the single-line case).
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Linear map from `[min, max]` onto `[MIN_INTENSITY, MAX_INTENSITY]`.
    ///
    /// Always finite, even when `max - min` overflows.
    pub fn scale(&self, score: f64) -> f64 {
        if self.is_degenerate() {
            return DEGENERATE_INTENSITY;
        }

        let span = self.max - self.min;
        let position = if span.is_finite() {
            (score - self.min) / span
        } else {
            (score / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
        };
        if position.is_nan() {
            warn!(score, min = self.min, max = self.max, "score cannot be placed in range");
            return DEGENERATE_INTENSITY;
        }

        let scaled = (MAX_INTENSITY - MIN_INTENSITY) * position + MIN_INTENSITY;
        scaled.clamp(MIN_INTENSITY, MAX_INTENSITY)
    }
}

/// Final numbers for one scored line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineScore {
    /// 0-based line index
    pub line: usize,
    /// Mean of every window score covering the line
    pub average: f64,
    /// Rescaled alpha in `[MIN_INTENSITY, MAX_INTENSITY]`
    pub intensity: f64,
    /// How many windows covered the line
    pub windows: usize,
}

impl LineScore {
    /// 1-based line number, as used by the `data-line` markers.
    pub fn line_number(&self) -> usize {
        self.line + 1
    }
}

/// Scored lines of one payload, ascending by line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineScores {
    pub range: Option<ScoreRange>,
    pub lines: Vec<LineScore>,
}

impl LineScores {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn get(&self, line: usize) -> Option<&LineScore> {
        self.lines
            .binary_search_by_key(&line, |s| s.line)
            .ok()
            .map(|i| &self.lines[i])
    }
}

/// Collect the score of every window covering each line.
///
/// Empty windows and windows with a non-finite score are skipped, so every
/// list in the result has at least one finite entry.
pub fn scores_per_line(windows: &[LineWindow]) -> BTreeMap<usize, Vec<f64>> {
    let mut per_line: BTreeMap<usize, Vec<f64>> = BTreeMap::new();

    for window in windows {
        if window.is_empty() {
            warn!(
                start = window.start_line,
                end = window.end_line,
                "skipping empty line window"
            );
            continue;
        }
        if !window.score.is_finite() {
            warn!(
                start = window.start_line,
                end = window.end_line,
                score = window.score,
                "skipping line window with non-finite score"
            );
            continue;
        }
        for line in window.lines() {
            per_line.entry(line).or_default().push(window.score);
        }
    }

    per_line
}

/// Arithmetic mean of each line's scores.
pub fn average_per_line(per_line: &BTreeMap<usize, Vec<f64>>) -> BTreeMap<usize, f64> {
    per_line
        .iter()
        .filter(|(_, scores)| !scores.is_empty())
        .map(|(&line, scores)| (line, mean(scores)))
        .collect()
}

fn mean(scores: &[f64]) -> f64 {
    let n = scores.len() as f64;
    let sum: f64 = scores.iter().sum();
    if sum.is_finite() {
        return sum / n;
    }
    // The sum of finite scores overflowed; dividing first keeps every term
    // at most max / n
    scores.iter().map(|s| s / n).sum()
}

/// Aggregate, average and rescale in one pass.
pub fn line_scores(windows: &[LineWindow]) -> LineScores {
    let per_line = scores_per_line(windows);
    let averages = average_per_line(&per_line);

    let Some(range) = ScoreRange::of(averages.values()) else {
        return LineScores::default();
    };

    let lines = averages
        .iter()
        .map(|(&line, &average)| LineScore {
            line,
            average,
            intensity: range.scale(average),
            windows: per_line.get(&line).map_or(0, Vec::len),
        })
        .collect();

    LineScores {
        range: Some(range),
        lines,
    }
}
