//! CSV line-score output

use crate::scoring::LineScores;
use std::io::{self, Write};

pub fn write<W: Write>(writer: &mut W, scores: &LineScores) -> io::Result<()> {
    writeln!(writer, "line,average,intensity,windows")?;

    for s in &scores.lines {
        writeln!(
            writer,
            "{},{},{},{}",
            s.line_number(),
            s.average,
            s.intensity,
            s.windows
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::LineWindow;
    use crate::scoring::line_scores;

    #[test]
    fn test_csv_rows() {
        let scores = line_scores(&[LineWindow::new(0, 2, 10.0), LineWindow::new(1, 3, 20.0)]);
        let mut buf = Vec::new();
        write(&mut buf, &scores).unwrap();

        let csv = String::from_utf8(buf).unwrap();
        assert_eq!(
            csv,
            "line,average,intensity,windows\n1,10,0,1\n2,15,0.45,2\n3,20,0.9,1\n"
        );
    }

    #[test]
    fn test_csv_header_only_when_empty() {
        let mut buf = Vec::new();
        write(&mut buf, &LineScores::default()).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "line,average,intensity,windows\n");
    }
}
