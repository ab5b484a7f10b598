//! Self-contained HTML page with the heat overlay as CSS

use crate::render::{RenderError, RenderPort};
use std::collections::{BTreeMap, HashSet};
use std::io::{self, Write};

const LINE_MARKER: &str = "data-line=\"";

/// A [`RenderPort`] that builds a static page instead of touching a DOM.
///
/// Every painted row becomes one rule using the same adjacency selector the
/// browser build queries, `[data-line="N"] + .code`, so the page colors
/// itself once loaded.
#[derive(Debug, Clone, Default)]
pub struct StaticPage {
    title: String,
    generated: Option<String>,
    markup: Option<String>,
    markers: HashSet<usize>,
    row_colors: BTreeMap<usize, String>,
}

impl StaticPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Timestamp shown in the footer.
    pub fn with_generated(mut self, generated: impl Into<String>) -> Self {
        self.generated = Some(generated.into());
        self
    }

    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    /// Painted rows by 1-based line number.
    pub fn row_colors(&self) -> &BTreeMap<usize, String> {
        &self.row_colors
    }

    pub fn to_html(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let title = html_escape(&self.title);

        write!(writer, r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} · glance</title>
    <style>
        :root {{
            --bg: #ffffff;
            --border: #d0d7de;
            --text: #1f2328;
            --dim: #656d76;
        }}
        * {{ box-sizing: border-box; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--text);
            margin: 0;
        }}
        .header {{
            padding: 1rem 2rem;
            border-bottom: 1px solid var(--border);
            font-weight: 600;
        }}
        #code {{
            border-collapse: collapse;
            font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace;
            font-size: 12px;
            margin: 1rem 2rem;
        }}
        #code td {{ padding: 0 0.5rem; vertical-align: top; }}
        #code .line {{ color: var(--dim); text-align: right; user-select: none; }}
        #code .line::before {{ content: attr(data-line); }}
        #code .code {{ white-space: pre; }}
        .footer {{ color: var(--dim); font-size: 0.75rem; padding: 1rem 2rem; }}
    </style>
    <style id="line-heat">
"#)?;

        for (line, color) in &self.row_colors {
            writeln!(
                writer,
                "        [data-line=\"{}\"] + .code {{ background-color: {}; }}",
                line, color
            )?;
        }

        write!(writer, r#"    </style>
</head>
<body>
    <div class="header">{title}</div>
    <table id="code">
{markup}
    </table>
"#,
            title = title,
            markup = self.markup.as_deref().unwrap_or("")
        )?;

        if let Some(generated) = &self.generated {
            writeln!(
                writer,
                "    <div class=\"footer\">Generated {}</div>",
                html_escape(generated)
            )?;
        }

        writeln!(writer, "</body>\n</html>")?;
        Ok(())
    }
}

impl RenderPort for StaticPage {
    fn set_container_markup(&mut self, html: &str) -> Result<(), RenderError> {
        self.markers = line_markers(html);
        self.markup = Some(html.to_string());
        self.row_colors.clear();
        Ok(())
    }

    fn set_row_color(&mut self, line_number: usize, color: &str) -> bool {
        if !self.markers.contains(&line_number) {
            return false;
        }
        self.row_colors.insert(line_number, color.to_string());
        true
    }
}

/// Line numbers of every `data-line="N"` marker in `html`.
fn line_markers(html: &str) -> HashSet<usize> {
    html.match_indices(LINE_MARKER)
        .filter_map(|(i, _)| {
            let rest = &html[i + LINE_MARKER.len()..];
            let end = rest.find('"')?;
            rest[..end].parse().ok()
        })
        .collect()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: &str = r#"<tr><td class="line" data-line="1"></td><td class="code"><span>fn</span> main() {</td></tr>
<tr><td class="line" data-line="2"></td><td class="code">}</td></tr>"#;

    #[test]
    fn test_line_markers() {
        let markers = line_markers(ROWS);
        assert_eq!(markers, HashSet::from([1, 2]));
    }

    #[test]
    fn test_line_markers_ignore_garbage() {
        let markers = line_markers(r#"<td data-line="x"></td><td data-line="7"></td><td data-line="#);
        assert_eq!(markers, HashSet::from([7]));
    }

    #[test]
    fn test_paint_requires_marker() {
        let mut page = StaticPage::new("t");
        page.set_container_markup(ROWS).unwrap();

        assert!(page.set_row_color(2, "rgba(255, 180, 255, 0.9)"));
        assert!(!page.set_row_color(3, "rgba(255, 180, 255, 0.9)"));
        assert_eq!(page.row_colors().len(), 1);
    }

    #[test]
    fn test_paint_before_markup_is_skipped() {
        let mut page = StaticPage::new("t");
        assert!(!page.set_row_color(1, "rgba(255, 180, 255, 0)"));
    }

    #[test]
    fn test_new_markup_replaces_old_rows() {
        let mut page = StaticPage::new("t");
        page.set_container_markup(ROWS).unwrap();
        page.set_row_color(1, "rgba(255, 180, 255, 0.9)");

        page.set_container_markup("<tr></tr>").unwrap();
        assert_eq!(page.markup(), Some("<tr></tr>"));
        assert!(page.row_colors().is_empty());
    }

    #[test]
    fn test_html_contains_rules_and_markup() {
        let mut page = StaticPage::new("src/<main>.rs").with_generated("2024-01-01 00:00:00");
        page.set_container_markup(ROWS).unwrap();
        page.set_row_color(1, "rgba(255, 180, 255, 0.45)");

        let html = page.to_html();
        assert!(html.contains(r#"[data-line="1"] + .code { background-color: rgba(255, 180, 255, 0.45); }"#));
        assert!(html.contains(r#"<table id="code">"#));
        assert!(html.contains("<span>fn</span> main() {"));
        assert!(html.contains("src/&lt;main&gt;.rs"));
        assert!(html.contains("Generated 2024-01-01 00:00:00"));
    }

    #[test]
    fn test_html_without_markup_is_still_a_page() {
        let html = StaticPage::new("empty").to_html();
        assert!(html.contains(r#"<table id="code">"#));
        assert!(!html.contains("background-color: rgba"));
        assert!(!html.contains("Generated"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
