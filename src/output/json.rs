use crate::location::ResolvedLocation;
use serde::Serialize;

#[derive(Serialize)]
struct JsonOutput<'a> {
    version: &'static str,
    location: &'a ResolvedLocation,
}

pub fn format_json(location: &ResolvedLocation) -> String {
    let output = JsonOutput {
        version: env!("CARGO_PKG_VERSION"),
        location,
    };

    serde_json::to_string_pretty(&output).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{LocationRequest, Navigation};

    #[test]
    fn test_json_fields() {
        let location = LocationRequest::new("https://gitea.com/o/r/src/tag/v1/lib/file.js")
            .resolve(&Navigation::new())
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&format_json(&location)).unwrap();

        assert_eq!(json["version"].as_str().unwrap(), env!("CARGO_PKG_VERSION"));
        assert_eq!(json["location"]["provider"], "gitea");
        assert_eq!(json["location"]["branch"], "v1");
        assert_eq!(json["location"]["is_tag_branch"], true);
        assert_eq!(json["location"]["download_kind"], "single_file");
        assert!(json["location"].get("session_id").is_none());
    }
}
