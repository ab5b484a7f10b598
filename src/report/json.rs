//! JSON line-score output

use crate::scoring::LineScores;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LineScoreReport<'a> {
    file: &'a str,
    min_score: Option<f64>,
    max_score: Option<f64>,
    lines: Vec<LineEntry>,
}

#[derive(Serialize)]
struct LineEntry {
    line: usize,
    average: f64,
    intensity: f64,
    windows: usize,
}

pub fn write<W: Write>(writer: &mut W, file: &str, scores: &LineScores) -> io::Result<()> {
    let report = LineScoreReport {
        file,
        min_score: scores.range.map(|r| r.min),
        max_score: scores.range.map(|r| r.max),
        lines: scores
            .lines
            .iter()
            .map(|s| LineEntry {
                line: s.line_number(),
                average: s.average,
                intensity: s.intensity,
                windows: s.windows,
            })
            .collect(),
    };

    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}
