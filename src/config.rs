use crate::location::{Direction, LocationRequest, Navigation, DEFAULT_BRANCH_PLACEHOLDER};
use crate::provider::{ProviderKind, ProviderRegistry};
use clap::Parser;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = ".repo-locate.toml";

#[derive(Parser, Debug)]
#[command(
    name = "repo-locate",
    version,
    about = "Resolve a source-hosting URL into what to fetch and how to fetch it"
)]
pub struct CliArgs {
    /// Repository, directory or file URL (http/https)
    pub url: String,

    /// Branch name; required when the branch itself contains slashes
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Breadcrumb segment to move to ("root" jumps to the repository root)
    #[arg(long)]
    pub sub: Option<String>,

    /// Breadcrumb direction (none, up, down)
    #[arg(short, long, default_value = "none")]
    pub direction: Direction,

    /// Treat the URL as pointing at this file
    #[arg(long)]
    pub filename: Option<String>,

    /// Root of the local download cache
    #[arg(long)]
    pub workspace_root: Option<PathBuf>,

    /// Session identifier used in the local download path
    #[arg(long, env = "REPO_LOCATE_SESSION")]
    pub session_id: Option<String>,

    /// Output format [default: table]
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print nothing on success
    #[arg(short, long)]
    pub quiet: bool,

    /// Log every resolution stage to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown provider '{provider}' for host '{host}'")]
    UnknownProvider { host: String, provider: String },
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub settings: ConfigSettings,
    /// Extra hostnames mapped to a provider name, for self-hosted instances.
    #[serde(default)]
    pub hosts: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfigSettings {
    pub workspace_root: Option<PathBuf>,
    pub session_id: Option<String>,
    pub branch_placeholder: Option<String>,
    pub format: Option<OutputFormat>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default providers plus every valid `[hosts]` alias.
    pub fn registry(&self) -> ProviderRegistry {
        let mut registry = ProviderRegistry::with_defaults();
        for (host, provider) in &self.hosts {
            match host_alias(host, provider) {
                Ok(kind) => registry.register(host, kind),
                Err(e) => log::warn!("ignoring host alias: {e}"),
            }
        }
        registry
    }
}

fn host_alias(host: &str, provider: &str) -> Result<ProviderKind, ConfigError> {
    provider
        .parse::<ProviderKind>()
        .map_err(|_| ConfigError::UnknownProvider {
            host: host.to_string(),
            provider: provider.to_string(),
        })
}

#[derive(Debug)]
pub struct Config {
    pub url: String,
    pub branch: Option<String>,
    pub navigation: Navigation,
    pub workspace_root: PathBuf,
    pub session_id: String,
    pub branch_placeholder: String,
    pub format: OutputFormat,
    pub quiet: bool,
    pub no_color: bool,
    pub registry: ProviderRegistry,
}

impl Config {
    pub fn from_args_and_file(args: CliArgs, file: Option<ConfigFile>) -> Self {
        let file = file.unwrap_or_default();
        let registry = file.registry();
        let settings = file.settings;

        let navigation = Navigation::new()
            .step(args.sub.unwrap_or_default(), args.direction)
            .file(args.filename.unwrap_or_default());

        Config {
            url: args.url,
            branch: args.branch,
            navigation,
            workspace_root: args
                .workspace_root
                .or(settings.workspace_root)
                .unwrap_or_default(),
            session_id: args
                .session_id
                .or(settings.session_id)
                .unwrap_or_default(),
            branch_placeholder: settings
                .branch_placeholder
                .unwrap_or_else(|| DEFAULT_BRANCH_PLACEHOLDER.to_string()),
            format: args.format.or(settings.format).unwrap_or_default(),
            quiet: args.quiet,
            no_color: args.no_color,
            registry,
        }
    }

    pub fn request(&self) -> LocationRequest {
        let mut request = LocationRequest::new(self.url.as_str())
            .workspace(self.workspace_root.clone(), self.session_id.as_str())
            .branch_placeholder(self.branch_placeholder.as_str())
            .registry(self.registry.clone());
        if let Some(ref branch) = self.branch {
            request = request.branch(branch.as_str());
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["repo-locate", "https://github.com/o/r"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_defaults_without_file() {
        let config = Config::from_args_and_file(args(&[]), None);
        assert_eq!(config.format, OutputFormat::Table);
        assert_eq!(config.branch_placeholder, DEFAULT_BRANCH_PLACEHOLDER);
        assert_eq!(config.navigation, Navigation::new());
        assert_eq!(config.registry.len(), 5);
    }

    #[test]
    fn test_file_settings_apply() {
        let file: ConfigFile = toml::from_str(
            r#"
[settings]
workspace_root = "/var/cache/rl"
session_id = "abc"
branch_placeholder = "HEAD"
format = "json"

[hosts]
"git.example.com" = "gitlab"
"#,
        )
        .unwrap();
        let config = Config::from_args_and_file(args(&[]), Some(file));
        assert_eq!(config.workspace_root, PathBuf::from("/var/cache/rl"));
        assert_eq!(config.session_id, "abc");
        assert_eq!(config.branch_placeholder, "HEAD");
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(
            config.registry.lookup("git.example.com").map(|p| p.kind),
            Some(ProviderKind::GitLab)
        );
    }

    #[test]
    fn test_cli_wins_over_file() {
        let file: ConfigFile = toml::from_str(
            r#"
[settings]
session_id = "from-file"
format = "json"
"#,
        )
        .unwrap();
        let config = Config::from_args_and_file(
            args(&["--session-id", "from-cli", "-f", "table"]),
            Some(file),
        );
        assert_eq!(config.session_id, "from-cli");
        assert_eq!(config.format, OutputFormat::Table);
    }

    #[test]
    fn test_unknown_provider_alias_skipped() {
        let file: ConfigFile = toml::from_str(
            r#"
[hosts]
"git.example.com" = "sourceforge"
"#,
        )
        .unwrap();
        let registry = file.registry();
        assert_eq!(registry.len(), 5);
        assert!(registry.lookup("git.example.com").is_none());
    }

    #[test]
    fn test_host_alias_error() {
        assert_eq!(host_alias("h", "GitLab").unwrap(), ProviderKind::GitLab);
        let err = host_alias("git.example.com", "sourceforge").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProvider { .. }));
        assert_eq!(
            err.to_string(),
            "unknown provider 'sourceforge' for host 'git.example.com'"
        );
    }

    #[test]
    fn test_no_color_flag() {
        assert!(!Config::from_args_and_file(args(&[]), None).no_color);
        assert!(Config::from_args_and_file(args(&["--no-color"]), None).no_color);
    }

    #[test]
    fn test_navigation_args() {
        let config = Config::from_args_and_file(
            args(&["--sub", "lib", "-d", "up", "--filename", "a.txt"]),
            None,
        );
        assert_eq!(config.navigation.sub, "lib");
        assert_eq!(config.navigation.direction, Direction::Up);
        assert_eq!(config.navigation.filename, "a.txt");
    }

    #[test]
    fn test_load_reports_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[settings\n").unwrap();
        let err = ConfigFile::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
