//! Reading order for page files on disk.
//!
//! Downloaded pages are usually numbered, but not always zero-padded
//! (`page2.jpg`, `page10.jpg`). Plain lexical ordering would put page 10 before
//! page 2, so file names are compared in runs: runs of digits compare by
//! numeric value, everything else compares case-insensitively.

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq)]
enum Run<'a> {
    Number(&'a str),
    Text(&'a str),
}

fn runs(name: &str) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_digits = None;
    for (i, c) in name.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(d) if d != is_digit => {
                runs.push(make_run(&name[start..i], d));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(d) = in_digits {
        runs.push(make_run(&name[start..], d));
    }
    runs
}

fn make_run(s: &str, digits: bool) -> Run<'_> {
    if digits {
        Run::Number(s)
    } else {
        Run::Text(s)
    }
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    // longer digit strings are larger numbers once leading zeros are gone
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Compare two page file names in reading order.
pub fn compare_page_names(a: &OsStr, b: &OsStr) -> Ordering {
    let a = a.to_string_lossy();
    let b = b.to_string_lossy();
    let runs_a = runs(&a);
    let runs_b = runs(&b);

    for (ra, rb) in runs_a.iter().zip(runs_b.iter()) {
        let ordering = match (ra, rb) {
            (Run::Number(x), Run::Number(y)) => compare_numbers(x, y),
            (Run::Number(_), Run::Text(_)) => Ordering::Less,
            (Run::Text(_), Run::Number(_)) => Ordering::Greater,
            (Run::Text(x), Run::Text(y)) => x
                .to_lowercase()
                .cmp(&y.to_lowercase())
                .then_with(|| x.cmp(y)),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    runs_a.len().cmp(&runs_b.len())
}

/// Sort page files by file name in reading order.
pub fn sort_pages(files: &mut [PathBuf]) {
    files.sort_by(|a, b| {
        let a = a.file_name().unwrap_or_default();
        let b = b.file_name().unwrap_or_default();
        compare_page_names(a, b)
    });
}
