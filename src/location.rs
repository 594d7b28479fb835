use crate::provider::ProviderRegistry;
use crate::resolve::{self, navigate, synthesize, ResolveError};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_BRANCH_PLACEHOLDER: &str = "default-branch";

/// How much of the repository a downloader has to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadKind {
    FullPackage,
    PartialPackage,
    SingleFile,
    /// Chosen by callers that assemble their own file selection.
    Custom,
    #[default]
    None,
}

impl fmt::Display for DownloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadKind::FullPackage => write!(f, "full_package"),
            DownloadKind::PartialPackage => write!(f, "partial_package"),
            DownloadKind::SingleFile => write!(f, "single_file"),
            DownloadKind::Custom => write!(f, "custom"),
            DownloadKind::None => write!(f, "none"),
        }
    }
}

/// Breadcrumb direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::None => write!(f, "none"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(Direction::None),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(format!("unknown direction: {s}")),
        }
    }
}

/// Optional parameters of a resolution: a breadcrumb step and an explicit
/// file target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    /// `""` for none, `"root"` for the repository root, else a path segment.
    pub sub: String,
    pub direction: Direction,
    /// When set, the URL is treated as pointing at this file.
    pub filename: String,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, sub: impl Into<String>, direction: Direction) -> Self {
        self.sub = sub.into();
        self.direction = direction;
        self
    }

    pub fn file(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}

/// Caller-supplied inputs of one resolution.
#[derive(Debug, Clone)]
pub struct LocationRequest {
    pub(crate) raw_url: String,
    pub(crate) branch: Option<String>,
    pub(crate) workspace_root: PathBuf,
    pub(crate) session_id: String,
    pub(crate) branch_placeholder: String,
    pub(crate) registry: ProviderRegistry,
}

impl LocationRequest {
    pub fn new(raw_url: impl Into<String>) -> Self {
        Self {
            raw_url: raw_url.into(),
            branch: None,
            workspace_root: PathBuf::new(),
            session_id: String::new(),
            branch_placeholder: DEFAULT_BRANCH_PLACEHOLDER.to_string(),
            registry: ProviderRegistry::with_defaults(),
        }
    }

    /// Branch known in advance. Needed when the branch name contains slashes.
    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        let branch = branch.into();
        self.branch = (!branch.is_empty()).then_some(branch);
        self
    }

    pub fn workspace(mut self, root: impl Into<PathBuf>, session_id: impl Into<String>) -> Self {
        self.workspace_root = root.into();
        self.session_id = session_id.into();
        self
    }

    pub fn branch_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.branch_placeholder = placeholder.into();
        self
    }

    pub fn registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn resolve(&self, navigation: &Navigation) -> Result<ResolvedLocation, ResolveError> {
        resolve::run(self, navigation)
    }
}

/// Where a URL points inside a hosted repository, and how to fetch it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedLocation {
    pub raw_url: String,
    pub normalized_url: String,
    pub scheme: String,
    pub hostname: String,
    pub provider: Option<crate::provider::ProviderKind>,
    pub owner: String,
    pub name: String,
    /// May be empty; see [`ResolvedLocation::branch_or_placeholder`].
    pub branch: String,
    pub is_tag_branch: bool,
    pub path: String,
    pub raw_path: String,
    pub is_file: bool,
    pub download_kind: DownloadKind,

    pub clone_url: String,
    pub remote_url: String,
    pub archive_url: String,
    /// Raw-file URL with [`synthesize::PATH_TOKEN`] in place of the path.
    pub file_url: String,
    pub query_url: String,
    pub resolved_url: String,
    pub local_dir_path: PathBuf,

    #[serde(skip)]
    pub(crate) workspace_root: PathBuf,
    #[serde(skip)]
    pub(crate) session_id: String,
    #[serde(skip)]
    pub(crate) branch_placeholder: String,
}

impl ResolvedLocation {
    /// Step through the directory tree without re-parsing the source URL.
    pub fn navigate(&self, sub: &str, direction: Direction) -> ResolvedLocation {
        let mut cursor = navigate::Cursor {
            path: self.path.clone(),
            raw_path: self.raw_path.clone(),
        };
        navigate::navigate(&mut cursor, sub, direction);

        let mut next = self.clone();
        next.path = cursor.path;
        next.raw_path = cursor.raw_path;
        synthesize::synthesize(&mut next);
        next
    }

    /// Switch branch, recomputing only the derived URLs.
    pub fn with_branch(&self, branch: &str) -> ResolvedLocation {
        let mut next = self.clone();
        next.branch = branch.to_string();
        synthesize::synthesize(&mut next);
        next
    }

    pub fn branch_or_placeholder(&self) -> &str {
        if self.branch.is_empty() {
            &self.branch_placeholder
        } else {
            &self.branch
        }
    }

    /// Raw-file URL for `path`, empty for hosts without a provider.
    pub fn file_url_for(&self, path: &str) -> String {
        self.file_url.replace(synthesize::PATH_TOKEN, path)
    }

    /// Browse URL for `path`, shown through the containing directory when
    /// the location names a file.
    pub fn query_url_for(&self, path: &str) -> String {
        let provider = self.provider.map(|kind| kind.provider());
        synthesize::query_url(self, provider, path)
    }

    /// Web address of the repository itself.
    pub fn browse_root(&self) -> String {
        self.clone_url
            .strip_suffix(".git")
            .unwrap_or(&self.clone_url)
            .to_string()
    }

    /// Directory holding the target: the parent of a file, or the path itself.
    pub fn folder_path(&self) -> &str {
        if !self.path.is_empty() && self.is_file {
            synthesize::parent_dir(&self.path)
        } else {
            &self.path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderKind;

    fn resolve(url: &str) -> ResolvedLocation {
        LocationRequest::new(url).resolve(&Navigation::new()).unwrap()
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("DOWN".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!("none".parse::<Direction>().unwrap(), Direction::None);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_download_kind_display() {
        assert_eq!(DownloadKind::FullPackage.to_string(), "full_package");
        assert_eq!(DownloadKind::SingleFile.to_string(), "single_file");
        assert_eq!(DownloadKind::default(), DownloadKind::None);
    }

    #[test]
    fn test_empty_branch_hint_is_no_hint() {
        let request = LocationRequest::new("https://github.com/o/r").branch("");
        assert_eq!(request.branch, None);
    }

    #[test]
    fn test_repository_root() {
        let loc = resolve("https://github.com/cli/cli");
        assert_eq!(loc.provider, Some(ProviderKind::GitHub));
        assert_eq!(loc.owner, "cli");
        assert_eq!(loc.name, "cli");
        assert_eq!(loc.clone_url, "https://github.com/cli/cli.git");
        assert_eq!(loc.remote_url, "git@github.com:cli/cli.git");
        assert_eq!(loc.resolved_url, "https://github.com/cli/cli");
        assert_eq!(loc.query_url, "https://github.com/cli/cli");
        assert_eq!(loc.download_kind, DownloadKind::FullPackage);
        assert_eq!(
            loc.local_dir_path,
            PathBuf::from("repository/cli/cli/default-branch")
        );
        assert!(!loc.is_file);
    }

    #[test]
    fn test_branch_placeholder_not_stored() {
        let loc = LocationRequest::new("https://github.com/cli/cli")
            .workspace("/tmp/cache", "s1")
            .branch_placeholder("HEAD")
            .resolve(&Navigation::new())
            .unwrap();
        assert_eq!(loc.branch, "");
        assert_eq!(loc.branch_or_placeholder(), "HEAD");
        assert_eq!(
            loc.local_dir_path,
            PathBuf::from("/tmp/cache/s1/repository/cli/cli/HEAD")
        );
    }

    #[test]
    fn test_file_url_for() {
        let loc = resolve("https://github.com/o/r/blob/main/src/lib.rs");
        assert_eq!(
            loc.file_url_for(&loc.path),
            "https://raw.githubusercontent.com/o/r/main/src/lib.rs"
        );
    }

    #[test]
    fn test_with_branch_recomputes_urls() {
        let loc = resolve("https://gitlab.com/o/r/-/tree/main/docs");
        let next = loc.with_branch("feature/new");
        assert_eq!(next.branch, "feature/new");
        assert_eq!(next.path, "docs");
        assert_eq!(
            next.archive_url,
            "https://gitlab.com/o/r/-/archive/feature/new/gitlab-feature-new.zip"
        );
        assert_eq!(next.file_url, "https://gitlab.com/o/r/-/raw/feature/new/[PATH]");
        assert_eq!(loc.branch, "main");
    }

    #[test]
    fn test_navigate_returns_new_value() {
        let loc = resolve("https://github.com/o/r/tree/main/lib/sub");
        let up = loc.navigate("lib", Direction::Up);
        assert_eq!(up.path, "lib");
        assert_eq!(up.resolved_url, "https://github.com/o/r/tree/main/lib");
        assert_eq!(up.query_url, "https://github.com/o/r/tree/main/lib/");
        assert_eq!(loc.path, "lib/sub");

        let root = up.navigate("root", Direction::None);
        assert_eq!(root.path, "");
        assert_eq!(root.download_kind, DownloadKind::FullPackage);
    }

    #[test]
    fn test_browse_root_and_folder_path() {
        let loc = resolve("https://github.com/o/r/blob/main/a/b/c.txt");
        assert_eq!(loc.browse_root(), "https://github.com/o/r");
        assert_eq!(loc.folder_path(), "a/b");

        let dir = resolve("https://github.com/o/r/tree/main/a/b");
        assert_eq!(dir.folder_path(), "a/b");
    }

    #[test]
    fn test_query_url_for_other_path() {
        let loc = resolve("https://bitbucket.org/o/r/src/main/cmd/");
        assert_eq!(
            loc.query_url_for("internal"),
            "https://bitbucket.org/o/r/src/main/internal/"
        );
    }
}
