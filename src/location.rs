//! Sourcegraph blob URLs
//!
//! File identifiers are usually links like
//! `https://sourcegraph.com/github.com/org/repo@abc123/-/blob/src/main.rs`.
//! We only pull them apart to give pages a readable title.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const DEFAULT_COMMIT: &str = "HEAD";

fn blob_url() -> &'static Regex {
    static BLOB_URL: OnceLock<Regex> = OnceLock::new();
    BLOB_URL.get_or_init(|| {
        Regex::new(r"^https://sourcegraph\.com/(.*?)(@.*)?/-/blob/(.*)$")
            .unwrap_or_else(|e| panic!("invalid blob url pattern: {e}"))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub repo: String,
    pub commit: String,
    pub path: String,
}

impl SourceLocation {
    /// Parse a Sourcegraph blob URL. Returns `None` for anything else.
    pub fn parse(url: &str) -> Option<Self> {
        let caps = blob_url().captures(url)?;

        let repo = caps.get(1)?.as_str().to_string();
        let commit = caps
            .get(2)
            .map(|m| m.as_str().trim_start_matches('@').to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_COMMIT.to_string());
        let path = caps.get(3)?.as_str();
        let path = path.split('?').next().unwrap_or(path).to_string();

        Some(Self { repo, commit, path })
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} : {}", self.repo, self.commit, self.path)
    }
}

/// Human title for a file identifier.
pub fn display_name(file: &str) -> String {
    SourceLocation::parse(file)
        .map(|loc| loc.to_string())
        .unwrap_or_else(|| file.to_string())
}
