//! Titles and file names derived from the series and issue being compiled.

use crate::sinks::Assembler;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ISSUE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(\d+)/?$").expect("valid issue number regex"));
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid unsafe character regex"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid separator regex"));

/// The issue number at the end of an issue URL (`.../sonic-the-hedgehog-07/` is 7).
pub fn issue_number(url: &str) -> Option<u32> {
    ISSUE_NUMBER
        .captures(url.trim())
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// A readable series title from the last path segment of an issue URL, used
/// when no title is given.
pub fn series_title_from_url(url: &str) -> Option<String> {
    let path = url.trim().trim_end_matches('/');
    let path = ISSUE_NUMBER.replace(path, "");
    let slug = path.rsplit('/').next()?;

    let title = slug
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ");

    if title.is_empty() || title.contains(':') {
        None
    } else {
        Some(title)
    }
}

/// A title reduced to something safe to use as a file or directory name.
pub fn safe_title(title: &str) -> String {
    let title = UNSAFE_CHARS.replace_all(title, "");
    let title = SEPARATORS.replace_all(title.trim(), "-");
    let title = title.trim_matches('-');
    if title.is_empty() {
        "comic".to_string()
    } else {
        title.to_string()
    }
}

/// Names everything produced for one issue of a series.
#[derive(Debug, Clone)]
pub struct OutputNamer {
    series: String,
    issue: Option<u32>,
}

impl OutputNamer {
    pub fn new<S: Into<String>>(series: S, issue: Option<u32>) -> OutputNamer {
        OutputNamer {
            series: series.into(),
            issue,
        }
    }

    /// Title written into the documents, e.g. `Sonic The Hedgehog #07`.
    pub fn issue_title(&self) -> String {
        match self.issue {
            Some(issue) => format!("{} #{issue:02}", self.series),
            None => self.series.clone(),
        }
    }

    /// File name without extension, e.g. `Sonic-The-Hedgehog-07`.
    pub fn base_name(&self) -> String {
        let safe = safe_title(&self.series);
        match self.issue {
            Some(issue) => format!("{safe}-{issue:02}"),
            None => safe,
        }
    }

    /// Where an issue's files live under an output root, e.g.
    /// `root/Sonic-The-Hedgehog/issue-07`.
    pub fn issue_dir(&self, root: &Path) -> PathBuf {
        let series_dir = root.join(safe_title(&self.series));
        match self.issue {
            Some(issue) => series_dir.join(format!("issue-{issue:02}")),
            None => series_dir,
        }
    }

    pub fn path_for(&self, dir: &Path, assembler: Assembler) -> PathBuf {
        dir.join(format!("{}.{}", self.base_name(), assembler.extension()))
    }
}
