//! Derived URLs and the download decision.
//!
//! Everything here is a pure function of the resolved identity (host, owner,
//! name, branch, path). Hosts without a provider record get empty archive and
//! file URLs rather than an error.

use super::clean_join;
use crate::location::{DownloadKind, ResolvedLocation};
use crate::provider::{render, Provider, TemplateVars};
use std::path::{Path, PathBuf};

/// Stands in for the in-repository path inside `file_url`.
pub const PATH_TOKEN: &str = "[PATH]";

/// Fill every derived field of `location` from its identity fields.
pub fn synthesize(location: &mut ResolvedLocation) {
    let provider = location.provider.map(|kind| kind.provider());

    location.clone_url = clone_url(
        &location.scheme,
        &location.hostname,
        &location.owner,
        &location.name,
    );
    location.remote_url = remote_url(&location.hostname, &location.owner, &location.name);
    location.resolved_url = format!(
        "{}://{}{}",
        location.scheme, location.hostname, location.raw_path
    );
    location.local_dir_path = local_dir_path(
        &location.workspace_root,
        &location.session_id,
        &location.owner,
        &location.name,
        location.branch_or_placeholder(),
    );
    location.archive_url = archive_url(location, provider);
    location.file_url = file_url(location, provider, PATH_TOKEN);
    location.query_url = query_url(location, provider, &location.path);
    location.download_kind = download_kind(
        &location.clone_url,
        &location.resolved_url,
        &location.path,
        location.is_file,
    );
}

pub fn clone_url(scheme: &str, host: &str, owner: &str, name: &str) -> String {
    format!("{scheme}://{host}/{owner}/{name}.git")
}

pub fn remote_url(host: &str, owner: &str, name: &str) -> String {
    format!("git@{host}:{owner}/{name}.git")
}

fn vars<'a>(location: &'a ResolvedLocation, path: &'a str) -> TemplateVars<'a> {
    TemplateVars {
        scheme: &location.scheme,
        host: &location.hostname,
        owner: &location.owner,
        name: &location.name,
        branch: &location.branch,
        is_tag: location.is_tag_branch,
        path,
        branch_path: "",
    }
}

pub fn archive_url(location: &ResolvedLocation, provider: Option<&Provider>) -> String {
    provider
        .and_then(|p| p.archive_template)
        .map(|template| render(template, &vars(location, "")))
        .unwrap_or_default()
}

pub fn file_url(location: &ResolvedLocation, provider: Option<&Provider>, path: &str) -> String {
    provider
        .map(|p| render(p.file_template, &vars(location, path)))
        .unwrap_or_default()
}

/// Browse URL for `path`. A file is shown through its containing directory.
pub fn query_url(location: &ResolvedLocation, provider: Option<&Provider>, path: &str) -> String {
    let base = format!(
        "{}://{}/{}/{}",
        location.scheme, location.hostname, location.owner, location.name
    );
    if location.branch.is_empty() {
        return base;
    }
    let Some(provider) = provider else {
        return base;
    };

    let dir = if !path.is_empty() && location.is_file {
        parent_dir(&location.path)
    } else {
        path
    };
    let branch_path = clean_join(&location.branch, dir);

    let mut template_vars = vars(location, dir);
    template_vars.branch_path = &branch_path;
    render(provider.browse_template, &template_vars)
}

/// Everything before the last slash, or the root when there is none.
pub fn parent_dir(path: &str) -> &str {
    path.rfind('/').map_or("", |index| &path[..index])
}

pub fn download_kind(
    clone_url: &str,
    resolved_url: &str,
    path: &str,
    is_file: bool,
) -> DownloadKind {
    if clone_url == format!("{resolved_url}.git") || path.is_empty() {
        DownloadKind::FullPackage
    } else if is_file {
        DownloadKind::SingleFile
    } else {
        DownloadKind::PartialPackage
    }
}

pub fn local_dir_path(
    workspace_root: &Path,
    session_id: &str,
    owner: &str,
    name: &str,
    branch: &str,
) -> PathBuf {
    let mut dir = workspace_root.to_path_buf();
    for component in [session_id, "repository", owner, name, branch] {
        if !component.is_empty() {
            dir.push(component);
        }
    }
    dir
}
