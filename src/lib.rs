//! Resolve a human-typed URL pointing into a hosted repository (GitHub,
//! GitLab, Bitbucket, Gitea, Gitee) into owner, repository, branch and
//! in-repository path, plus the clone, archive, raw-file and browse URLs
//! needed to fetch it.
//!
//! ```
//! use repo_locate::{DownloadKind, LocationRequest, Navigation};
//!
//! let location = LocationRequest::new("https://github.com/cli/cli/tree/trunk/pkg")
//!     .resolve(&Navigation::new())
//!     .unwrap();
//! assert_eq!(location.branch, "trunk");
//! assert_eq!(location.path, "pkg");
//! assert_eq!(location.download_kind, DownloadKind::PartialPackage);
//! ```

pub mod config;
pub mod location;
pub mod output;
pub mod provider;
pub mod resolve;

pub use location::{Direction, DownloadKind, LocationRequest, Navigation, ResolvedLocation};
pub use provider::{ProviderKind, ProviderRegistry};
pub use resolve::ResolveError;
