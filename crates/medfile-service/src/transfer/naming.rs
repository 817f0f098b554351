//! Collision-free names for moved items.

use std::collections::HashSet;

/// Pick a name for a file entering a folder that already uses `taken`.
///
/// `report.pdf` becomes `report (1).pdf`, then `report (2).pdf`, and so on.
/// A leading dot is part of the stem, so `.env` becomes `.env (1)`.
pub fn disambiguate_file(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    let (stem, extension) = match name.rfind('.') {
        Some(index) if index > 0 => name.split_at(index),
        _ => (name, ""),
    };
    first_free(taken, |n| format!("{stem} ({n}){extension}"))
}

/// Pick a name for a folder entering a parent that already uses `taken`.
pub fn disambiguate_folder(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    first_free(taken, |n| format!("{name} ({n})"))
}

fn first_free(taken: &HashSet<String>, candidate: impl Fn(usize) -> String) -> String {
    (1..)
        .map(candidate)
        .find(|name| !taken.contains(name))
        .unwrap_or_default()
}
