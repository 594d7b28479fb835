//! Breadcrumb navigation over an already resolved path.

use super::clean_join;
use crate::location::Direction;

/// Token that jumps back to the repository root.
pub const ROOT: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// In-repository path, relative to the root.
    pub path: String,
    /// Full URL path; always ends with `path` when `path` is non-empty.
    pub raw_path: String,
}

pub fn navigate(cursor: &mut Cursor, sub: &str, direction: Direction) {
    let sub = sub.trim_matches('/');
    if sub.is_empty() {
        return;
    }

    if sub == ROOT {
        if !cursor.path.is_empty() {
            cursor.raw_path = repository_prefix(cursor);
            cursor.path.clear();
        }
        log::debug!("navigated to root: {}", cursor.raw_path);
        return;
    }

    if cursor.path.is_empty() {
        descend(cursor, sub);
        log::debug!("navigated into {}", cursor.path);
        return;
    }

    let cut = match direction {
        Direction::Up => cursor.path.find(sub),
        Direction::Down | Direction::None => None,
    };

    match cut {
        Some(index) => {
            let path_start = if cursor.raw_path.ends_with(cursor.path.as_str()) {
                cursor.raw_path.len() - cursor.path.len()
            } else {
                0
            };

            cursor.path.truncate(index + sub.len());
            if let Some(raw_index) = cursor.raw_path[path_start..].find(sub) {
                cursor.raw_path.truncate(path_start + raw_index + sub.len());
            }
            log::debug!("navigated up to {}", cursor.path);
        }
        None => {
            descend(cursor, sub);
            log::debug!("navigated down to {}", cursor.path);
        }
    }
}

/// `raw_path` with the in-repository path removed.
fn repository_prefix(cursor: &Cursor) -> String {
    if cursor.path.is_empty() {
        return cursor.raw_path.clone();
    }
    match cursor.raw_path.strip_suffix(cursor.path.as_str()) {
        Some(prefix) => prefix.trim_end_matches('/').to_string(),
        None => cursor.raw_path.replacen(cursor.path.as_str(), "", 1),
    }
}

/// Append `sub` to the path. `..` never climbs above the repository root.
fn descend(cursor: &mut Cursor, sub: &str) {
    let prefix = repository_prefix(cursor);

    let mut parts: Vec<&str> = cursor.path.split('/').filter(|s| !s.is_empty()).collect();
    for segment in sub.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    let path = parts.join("/");

    cursor.raw_path = clean_join(&prefix, &path);
    cursor.path = path;
}
