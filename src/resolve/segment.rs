//! Positional splitting of a working path into owner, name, branch and path.
//!
//! Supported shapes, after normalization:
//! - `/<owner>/<repo>[.git]`
//! - `/<owner>/<repo>/{tree|blob|src}/<branch>[/<path>]`
//! - `/<owner>/<repo>/src/{branch|tag}/<branch>[/<path>]` (Gitea)
//! - `/<group>/<subgroup>/.../<repo>/{tree|blob}/<branch>[/<path>]` (GitLab)
//!
//! A branch whose name contains slashes cannot be told apart from the path
//! that follows it. When the caller passes such a branch as a hint, its slash
//! count widens the branch window and the hint is kept as the branch.

use super::ResolveError;
use crate::provider::{Provider, KIND_MARKERS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    pub owner: String,
    pub name: String,
    pub branch: String,
    pub path: String,
    pub raw_path: String,
    pub is_file: bool,
    pub is_tag_branch: bool,
}

pub fn segment(
    raw_path: &str,
    provider: Option<&Provider>,
    branch_hint: &str,
    is_file: bool,
) -> Result<Segments, ResolveError> {
    if raw_path.matches('/').count() < 2 {
        return Err(ResolveError::InvalidRepositoryUrl {
            path: raw_path.to_string(),
        });
    }

    let mut parts: Vec<String> = raw_path
        .strip_prefix('/')
        .unwrap_or(raw_path)
        .split('/')
        .map(str::to_string)
        .collect();
    let branch_slashes = branch_hint.matches('/').count();

    // Index of the kind marker; owner is everything before the repository name.
    let marker_at = match long_form_marker(&parts, provider) {
        Some(at) => {
            log::debug!("long-form URL, kind marker at segment {at}");
            at
        }
        None => 2,
    };
    let name_at = marker_at - 1;

    if let Some(stripped) = parts[name_at].strip_suffix(".git") {
        parts[name_at] = stripped.to_string();
    }
    let owner = parts[..name_at].join("/");
    let name = parts[name_at].clone();
    let raw_path = format!("/{}", parts.join("/"));

    log::debug!("segments {parts:?} (branch slashes: {branch_slashes})");

    let mut segments = Segments {
        owner,
        name,
        branch: branch_hint.to_string(),
        path: String::new(),
        raw_path,
        is_file: false,
        is_tag_branch: false,
    };

    let Some(marker) = parts.get(marker_at) else {
        return Ok(segments);
    };
    let kind_markers = provider.map_or(KIND_MARKERS, |p| p.kind_markers);
    if !kind_markers.contains(&marker.as_str()) {
        return Err(ResolveError::InvalidBranchSegment {
            segment: marker.clone(),
        });
    }

    let mut branch_at = marker_at + 1;
    if provider.is_some_and(|p| p.ref_discriminator) {
        segments.is_tag_branch = parts.get(branch_at).is_some_and(|s| s == "tag");
        branch_at += 1;
    }

    if branch_slashes == 0 {
        if let Some(branch) = parts.get(branch_at) {
            segments.branch = branch.clone();
        }
    }

    let path_at = branch_at + 1 + branch_slashes;
    if parts.len() > path_at {
        segments.path = parts[path_at..].join("/");
    }

    // src says nothing about file vs directory; keep the trailing-slash guess.
    segments.is_file = match marker.as_str() {
        "tree" => false,
        "blob" => true,
        _ => is_file,
    };

    Ok(segments)
}

/// Marker position for URLs whose owner spans several segments.
fn long_form_marker(parts: &[String], provider: Option<&Provider>) -> Option<usize> {
    let markers = provider?.long_form_markers;
    parts
        .iter()
        .position(|p| markers.contains(&p.as_str()))
        .filter(|&at| at > 2)
}
