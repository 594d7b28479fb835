use super::{clean_join, ResolveError};
use url::Url;

/// A raw URL stripped of provider decorations, ready to be segmented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub url: String,
    pub scheme: String,
    pub hostname: String,
    /// Decoded URL path joined with the explicit filename. Rooted, never
    /// ends in a slash.
    pub raw_path: String,
    pub is_file: bool,
}

pub fn normalize(raw_url: &str, filename: &str) -> Result<Normalized, ResolveError> {
    // GitLab namespaces actions as /owner/repo/-/tree/...
    let mut cleaned = raw_url.trim().replace("/-/", "/");

    let forced_file = !filename.is_empty();
    if forced_file {
        cleaned = cleaned.replace("/tree/", "/blob/");
    }
    log::debug!("normalized url {cleaned} (filename '{filename}')");

    let url = Url::parse(&cleaned).map_err(|e| ResolveError::MalformedUrl {
        url: raw_url.to_string(),
        reason: e.to_string(),
    })?;

    let scheme = url.scheme().to_string();
    if scheme != "https" && scheme != "http" {
        return Err(ResolveError::UnsupportedScheme { scheme });
    }

    let hostname = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ResolveError::MalformedUrl {
            url: raw_url.to_string(),
            reason: "missing host".to_string(),
        })?
        .to_string();

    let decoded = urlencoding::decode(url.path()).map_err(|e| ResolveError::MalformedUrl {
        url: raw_url.to_string(),
        reason: format!("path is not valid UTF-8: {e}"),
    })?;

    let mut raw_path = clean_join(&decoded, filename);
    if let Some(fragment) = url.fragment().filter(|f| !f.is_empty()) {
        raw_path = raw_path.replacen(&format!("#{fragment}"), "", 1);
    }
    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        raw_path = raw_path.replacen(&format!("?{query}"), "", 1);
    }
    if let Some(stripped) = raw_path.strip_suffix('/') {
        raw_path = stripped.to_string();
    }

    // Bitbucket browse URLs carry no tree/blob marker; a trailing slash is
    // the only directory hint they give.
    let is_file = forced_file || !cleaned.ends_with('/');

    log::debug!("working path {raw_path} (is_file={is_file})");

    Ok(Normalized {
        url: cleaned,
        scheme,
        hostname,
        raw_path,
        is_file,
    })
}
