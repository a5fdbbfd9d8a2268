use std::cmp::Ordering;

use crate::input_buffer::SEPARATOR;
use crate::matcher::{fuzzy_score_under_root, prefix_matches};

pub const DEFAULT_MAX_RESULTS: usize = 18;

/// A path is hidden when its last '.' directly follows a separator, which
/// is the case for dot-files and dot-directories.
pub fn is_dot_hidden(path: &str) -> bool {
    let bytes = path.as_bytes();
    match path.rfind('.') {
        Some(dot) if dot > 0 => bytes[dot - 1] == SEPARATOR as u8,
        _ => false,
    }
}

pub fn is_directory(path: &str) -> bool {
    path.ends_with(SEPARATOR)
}

/// Listing order: visible before hidden, then directories before files, then
/// bytewise by path.
pub fn compare_listing(a: &str, b: &str) -> Ordering {
    is_dot_hidden(a)
        .cmp(&is_dot_hidden(b))
        .then_with(|| is_directory(b).cmp(&is_directory(a)))
        .then_with(|| a.as_bytes().cmp(b.as_bytes()))
}

/// Keeps the first `max_results` children that start with `input` (in listing
/// order) and sorts them for display.
pub fn rank_prefix<I>(children: I, input: &str, max_results: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    if max_results == 0 {
        return Vec::new();
    }

    let mut results = Vec::new();
    for child in children {
        if !prefix_matches(&child, input) {
            continue;
        }
        results.push(child);
        if results.len() >= max_results {
            break;
        }
    }

    results.sort_by(|a, b| compare_listing(a, b));
    results
}

/// Scores every cached file under `root` and returns the best `max_results`.
/// Files with equal scores keep their relative order from `files`, but callers
/// should treat the order among equal scores as unspecified.
pub fn rank_fuzzy(files: &[String], input: &str, root: &str, max_results: usize) -> Vec<String> {
    if max_results == 0 || files.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, f64)> = files
        .iter()
        .enumerate()
        .map(|(index, file)| (index, fuzzy_score_under_root(file, input, root)))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    scored
        .into_iter()
        .take(max_results)
        .map(|(index, _)| files[index].clone())
        .collect()
}
