//! The resolution pipeline.
//!
//! A raw URL runs through four stages in a fixed order: normalize, segment,
//! navigate (only when a breadcrumb was requested), synthesize. Any stage
//! error aborts the resolution before derived URLs are produced.

pub mod navigate;
pub mod normalize;
pub mod segment;
pub mod synthesize;

use crate::location::{LocationRequest, Navigation, ResolvedLocation};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("malformed URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("unsupported URL scheme '{scheme}' (only http and https are accepted)")]
    UnsupportedScheme { scheme: String },

    #[error("not a repository URL: '{path}' must name an owner and a repository")]
    InvalidRepositoryUrl { path: String },

    #[error("unrecognized segment '{segment}' where tree, blob or src was expected")]
    InvalidBranchSegment { segment: String },
}

pub(crate) fn run(
    request: &LocationRequest,
    navigation: &Navigation,
) -> Result<ResolvedLocation, ResolveError> {
    let normalized = normalize::normalize(&request.raw_url, &navigation.filename)?;
    let provider = request.registry.lookup(&normalized.hostname);
    if provider.is_none() {
        log::debug!(
            "no provider registered for {}, download URLs will be empty",
            normalized.hostname
        );
    }

    let branch_hint = request.branch.as_deref().unwrap_or("");
    let segments = segment::segment(
        &normalized.raw_path,
        provider,
        branch_hint,
        normalized.is_file,
    )?;

    let mut cursor = navigate::Cursor {
        path: segments.path,
        raw_path: segments.raw_path,
    };
    navigate::navigate(&mut cursor, &navigation.sub, navigation.direction);

    let mut location = ResolvedLocation {
        raw_url: request.raw_url.clone(),
        normalized_url: normalized.url,
        scheme: normalized.scheme,
        hostname: normalized.hostname,
        provider: provider.map(|p| p.kind),
        owner: segments.owner,
        name: segments.name,
        branch: segments.branch,
        is_tag_branch: segments.is_tag_branch,
        path: cursor.path,
        raw_path: cursor.raw_path,
        is_file: segments.is_file,
        workspace_root: request.workspace_root.clone(),
        session_id: request.session_id.clone(),
        branch_placeholder: request.branch_placeholder.clone(),
        ..ResolvedLocation::default()
    };
    synthesize::synthesize(&mut location);

    log::debug!(
        "resolved {} -> {}/{} branch='{}' path='{}' ({})",
        location.raw_url,
        location.owner,
        location.name,
        location.branch,
        location.path,
        location.download_kind
    );
    Ok(location)
}

/// Lexically join two slash-separated paths, dropping empty and `.`
/// segments and folding `..`. The result never ends in a slash, except for
/// the bare root `/`.
pub(crate) fn clean_join(base: &str, tail: &str) -> String {
    let rooted = base.starts_with('/') || (base.is_empty() && tail.starts_with('/'));
    let mut parts: Vec<&str> = Vec::new();

    for segment in base.split('/').chain(tail.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            s => parts.push(s),
        }
    }

    let joined = parts.join("/");
    if rooted {
        format!("/{joined}")
    } else {
        joined
    }
}
