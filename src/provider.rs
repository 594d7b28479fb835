//! Per-host URL dialects.
//!
//! Every supported hosting service is described by one [`Provider`] record:
//! the quirks the segmenter has to know about and the templates used to
//! synthesize download and browse URLs. Hostnames map onto a provider through
//! a [`ProviderRegistry`], which is consulted once per resolution.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    GitHub,
    GitLab,
    Bitbucket,
    Gitea,
    Gitee,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::GitHub,
        ProviderKind::GitLab,
        ProviderKind::Bitbucket,
        ProviderKind::Gitea,
        ProviderKind::Gitee,
    ];

    pub fn provider(self) -> &'static Provider {
        match self {
            ProviderKind::GitHub => &GITHUB,
            ProviderKind::GitLab => &GITLAB,
            ProviderKind::Bitbucket => &BITBUCKET,
            ProviderKind::Gitea => &GITEA,
            ProviderKind::Gitee => &GITEE,
        }
    }

    /// Public hostname of the hosted service.
    pub fn default_host(self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github.com",
            ProviderKind::GitLab => "gitlab.com",
            ProviderKind::Bitbucket => "bitbucket.org",
            ProviderKind::Gitea => "gitea.com",
            ProviderKind::Gitee => "gitee.com",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::GitHub => write!(f, "github"),
            ProviderKind::GitLab => write!(f, "gitlab"),
            ProviderKind::Bitbucket => write!(f, "bitbucket"),
            ProviderKind::Gitea => write!(f, "gitea"),
            ProviderKind::Gitee => write!(f, "gitee"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "github" => Ok(ProviderKind::GitHub),
            "gitlab" => Ok(ProviderKind::GitLab),
            "bitbucket" => Ok(ProviderKind::Bitbucket),
            "gitea" => Ok(ProviderKind::Gitea),
            "gitee" => Ok(ProviderKind::Gitee),
            _ => Err(format!("unknown provider: {s}")),
        }
    }
}

/// URL dialect of one hosting service.
#[derive(Debug, PartialEq, Eq)]
pub struct Provider {
    pub kind: ProviderKind,
    /// Segments accepted right after the repository name.
    pub kind_markers: &'static [&'static str],
    /// A `branch`/`tag` segment sits between the kind marker and the branch.
    pub ref_discriminator: bool,
    /// Markers scanned for when the owner namespace may itself contain slashes.
    pub long_form_markers: &'static [&'static str],
    pub archive_template: Option<&'static str>,
    pub file_template: &'static str,
    pub browse_template: &'static str,
}

/// Kind markers shared by every built-in host, also used for unknown hosts.
pub const KIND_MARKERS: &[&str] = &["tree", "blob", "src"];

// Downloads always go over https, whatever scheme the input used.
static GITHUB: Provider = Provider {
    kind: ProviderKind::GitHub,
    kind_markers: KIND_MARKERS,
    ref_discriminator: false,
    long_form_markers: &[],
    archive_template: Some("https://{host}/{owner}/{name}/archive/refs/heads/{branch}.zip"),
    file_template: "https://raw.githubusercontent.com/{owner}/{name}/{branch}/{path}",
    browse_template: "{scheme}://{host}/{owner}/{name}/tree/{branch_path}/",
};

static GITLAB: Provider = Provider {
    kind: ProviderKind::GitLab,
    kind_markers: KIND_MARKERS,
    ref_discriminator: false,
    long_form_markers: &["tree", "blob"],
    archive_template: Some(
        "https://{host}/{owner}/{name}/-/archive/{branch}/gitlab-{branch_slug}.zip",
    ),
    file_template: "https://{host}/{owner}/{name}/-/raw/{branch}/{path}",
    browse_template: "{scheme}://{host}/{owner}/{name}/tree/{branch_path}/",
};

static BITBUCKET: Provider = Provider {
    kind: ProviderKind::Bitbucket,
    kind_markers: KIND_MARKERS,
    ref_discriminator: false,
    long_form_markers: &[],
    archive_template: Some("https://{host}/{owner}/{name}/get/{branch}.zip"),
    file_template: "https://{host}/{owner}/{name}/raw/{branch}/{path}",
    browse_template: "{scheme}://{host}/{owner}/{name}/src/{branch_path}/",
};

static GITEA: Provider = Provider {
    kind: ProviderKind::Gitea,
    kind_markers: KIND_MARKERS,
    ref_discriminator: true,
    long_form_markers: &[],
    archive_template: Some("https://{host}/{owner}/{name}/archive/{branch}.zip"),
    file_template: "https://{host}/{owner}/{name}/raw/{ref_kind}/{branch}/{path}",
    browse_template: "{scheme}://{host}/{owner}/{name}/src/{ref_kind}/{branch_path}/",
};

// Gitee offers no archive download we can address by branch.
static GITEE: Provider = Provider {
    kind: ProviderKind::Gitee,
    kind_markers: KIND_MARKERS,
    ref_discriminator: false,
    long_form_markers: &[],
    archive_template: None,
    file_template: "https://{host}/{owner}/{name}/raw/{branch}/{path}",
    browse_template: "{scheme}://{host}/{owner}/{name}/tree/{branch_path}/",
};

/// Values substituted into a provider template.
#[derive(Debug, Default)]
pub struct TemplateVars<'a> {
    pub scheme: &'a str,
    pub host: &'a str,
    pub owner: &'a str,
    pub name: &'a str,
    pub branch: &'a str,
    pub is_tag: bool,
    pub path: &'a str,
    pub branch_path: &'a str,
}

impl TemplateVars<'_> {
    fn lookup(&self, key: &str) -> Cow<'_, str> {
        match key {
            "scheme" => Cow::Borrowed(self.scheme),
            "host" => Cow::Borrowed(self.host),
            "owner" => Cow::Borrowed(self.owner),
            "name" => Cow::Borrowed(self.name),
            "branch" => Cow::Borrowed(self.branch),
            "branch_slug" => Cow::Owned(self.branch.replace('/', "-")),
            "ref_kind" => Cow::Borrowed(if self.is_tag { "tag" } else { "branch" }),
            "path" => Cow::Borrowed(self.path),
            "branch_path" => Cow::Borrowed(self.branch_path),
            _ => Cow::Borrowed(""),
        }
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern compiles")
    })
}

/// Substitute `{placeholder}` tokens. Substituted values are never rescanned.
pub fn render(template: &str, vars: &TemplateVars<'_>) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &Captures<'_>| vars.lookup(&caps[1]).into_owned())
        .into_owned()
}

/// Names of every `{placeholder}` a template refers to.
pub fn placeholders(template: &str) -> Vec<&str> {
    placeholder_pattern()
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    hosts: HashMap<String, ProviderKind>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            hosts: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in ProviderKind::ALL {
            registry.register(kind.default_host(), kind);
        }
        registry
    }

    pub fn register(&mut self, host: &str, kind: ProviderKind) {
        self.hosts.insert(host.to_lowercase(), kind);
    }

    pub fn lookup(&self, host: &str) -> Option<&'static Provider> {
        self.hosts
            .get(&host.to_lowercase())
            .map(|kind| kind.provider())
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn vars<'a>(host: &'a str, branch: &'a str, path: &'a str) -> TemplateVars<'a> {
        TemplateVars {
            scheme: "https",
            host,
            owner: "owner",
            name: "repo",
            branch,
            is_tag: false,
            path,
            branch_path: "",
        }
    }

    #[rstest]
    #[case("github.com", Some(ProviderKind::GitHub))]
    #[case("GitLab.com", Some(ProviderKind::GitLab))]
    #[case("bitbucket.org", Some(ProviderKind::Bitbucket))]
    #[case("gitea.com", Some(ProviderKind::Gitea))]
    #[case("gitee.com", Some(ProviderKind::Gitee))]
    #[case("example.com", None)]
    fn test_default_lookup(#[case] host: &str, #[case] expected: Option<ProviderKind>) {
        let registry = ProviderRegistry::with_defaults();
        assert_eq!(registry.lookup(host).map(|p| p.kind), expected);
    }

    #[test]
    fn test_register_alias() {
        let mut registry = ProviderRegistry::with_defaults();
        registry.register("git.example.com", ProviderKind::GitLab);
        let provider = registry.lookup("git.example.com").unwrap();
        assert_eq!(provider.kind, ProviderKind::GitLab);
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.lookup("github.com").is_none());
    }

    #[test]
    fn test_render_substitutes_all_tokens() {
        let out = render(GITHUB.file_template, &vars("github.com", "main", "src/lib.rs"));
        assert_eq!(
            out,
            "https://raw.githubusercontent.com/owner/repo/main/src/lib.rs"
        );
    }

    #[test]
    fn test_render_branch_slug() {
        let out = render(
            GITLAB.archive_template.unwrap(),
            &vars("gitlab.com", "feature/x", ""),
        );
        assert_eq!(
            out,
            "https://gitlab.com/owner/repo/-/archive/feature/x/gitlab-feature-x.zip"
        );
    }

    #[test]
    fn test_render_ref_kind() {
        let mut v = vars("gitea.com", "v1", "LICENSE");
        assert_eq!(
            render(GITEA.file_template, &v),
            "https://gitea.com/owner/repo/raw/branch/v1/LICENSE"
        );
        v.is_tag = true;
        assert_eq!(
            render(GITEA.file_template, &v),
            "https://gitea.com/owner/repo/raw/tag/v1/LICENSE"
        );
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let out = render("{branch}/{path}", &vars("h", "{path}", "x"));
        assert_eq!(out, "{path}/x");
    }

    #[test]
    fn test_render_unknown_token_is_empty() {
        assert_eq!(render("a{nope}b", &vars("h", "", "")), "ab");
    }

    #[test]
    fn test_kind_parse_and_display() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.to_string().parse::<ProviderKind>().unwrap(), kind);
        }
        assert_eq!("GitHub".parse::<ProviderKind>().unwrap(), ProviderKind::GitHub);
        assert!("sourceforge".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            placeholders("{scheme}://{host}/x/{path}"),
            vec!["scheme", "host", "path"]
        );
    }
}
