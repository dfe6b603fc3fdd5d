use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::presentation::page::escape_html;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AssetRef {
    Name(String),
    Object { name: String },
}

impl AssetRef {
    fn into_name(self) -> String {
        match self {
            AssetRef::Name(name) | AssetRef::Object { name } => name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Entrypoint {
    #[serde(default)]
    assets: Vec<AssetRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsFile {
    #[serde(default)]
    public_path: Option<String>,
    #[serde(default)]
    entrypoints: HashMap<String, Entrypoint>,
}

/// Entry chunks of the browser bundle, read from the bundler's stats file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetManifest {
    public_path: String,
    scripts: Vec<String>,
    styles: Vec<String>,
}

impl AssetManifest {
    pub fn parse(raw: &str, entry: &str) -> Result<Self> {
        let stats: StatsFile = serde_json::from_str(raw).context("parse bundle stats")?;
        let mut public_path = stats.public_path.unwrap_or_else(|| "/".to_string());
        if public_path == "auto" || public_path.is_empty() {
            public_path = "/".to_string();
        }
        if !public_path.ends_with('/') {
            public_path.push('/');
        }

        let mut manifest = Self {
            public_path,
            ..Self::default()
        };
        let assets = stats
            .entrypoints
            .into_iter()
            .find(|(name, _)| name == entry)
            .map(|(_, entrypoint)| entrypoint.assets)
            .unwrap_or_default();
        for asset in assets.into_iter().map(AssetRef::into_name) {
            // Source maps and hot-update files are not linked.
            if asset.ends_with(".js") {
                manifest.scripts.push(asset);
            } else if asset.ends_with(".css") {
                manifest.styles.push(asset);
            }
        }
        Ok(manifest)
    }

    /// Never fails: a missing or broken stats file degrades to a page
    /// without bundle tags.
    pub fn load(path: &Path, entry: &str) -> Self {
        let loaded = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))
            .and_then(|raw| Self::parse(&raw, entry));
        match loaded {
            Ok(manifest) => {
                info!(
                    path = %path.display(),
                    scripts = manifest.scripts.len(),
                    styles = manifest.styles.len(),
                    "Bundle stats loaded"
                );
                manifest
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Bundle stats unavailable, pages render without scripts");
                Self::default()
            }
        }
    }

    fn url(&self, asset: &str) -> String {
        if self.public_path.is_empty() {
            format!("/{}", asset)
        } else {
            format!("{}{}", self.public_path, asset)
        }
    }

    pub fn link_tags(&self) -> String {
        self.scripts
            .iter()
            .map(|s| {
                format!(
                    "<link data-chunk=\"main\" rel=\"preload\" as=\"script\" href=\"{}\">",
                    escape_html(&self.url(s))
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn style_tags(&self) -> String {
        self.styles
            .iter()
            .map(|s| format!("<link rel=\"stylesheet\" href=\"{}\">", escape_html(&self.url(s))))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn script_tags(&self) -> String {
        self.scripts
            .iter()
            .map(|s| format!("<script async src=\"{}\"></script>", escape_html(&self.url(s))))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATS: &str = r#"{
        "publicPath": "/static/",
        "entrypoints": {
            "main": {
                "assets": [
                    {"name": "main.css"},
                    {"name": "vendors.js"},
                    "main.js",
                    "main.js.map"
                ]
            },
            "admin": { "assets": ["admin.js"] }
        },
        "assetsByChunkName": {}
    }"#;

    #[test]
    fn test_parse_entry_assets() {
        let manifest = AssetManifest::parse(STATS, "main").unwrap();
        assert_eq!(
            manifest.script_tags(),
            "<script async src=\"/static/vendors.js\"></script>\n<script async src=\"/static/main.js\"></script>"
        );
        assert_eq!(
            manifest.style_tags(),
            "<link rel=\"stylesheet\" href=\"/static/main.css\">"
        );
        assert!(manifest.link_tags().contains("href=\"/static/main.js\""));
    }

    #[test]
    fn test_unknown_entry_yields_no_tags() {
        let manifest = AssetManifest::parse(STATS, "missing").unwrap();
        assert!(manifest.script_tags().is_empty());
        assert!(manifest.style_tags().is_empty());
    }

    #[test]
    fn test_auto_public_path_falls_back_to_root() {
        let raw = r#"{"publicPath":"auto","entrypoints":{"main":{"assets":["main.js"]}}}"#;
        let manifest = AssetManifest::parse(raw, "main").unwrap();
        assert_eq!(manifest.script_tags(), "<script async src=\"/main.js\"></script>");
    }

    #[test]
    fn test_malformed_stats_is_error() {
        assert!(AssetManifest::parse("not json", "main").is_err());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let manifest = AssetManifest::load(Path::new("/nonexistent/loadable-stats.json"), "main");
        assert_eq!(manifest, AssetManifest::default());
    }
}
