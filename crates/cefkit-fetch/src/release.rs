//! Release metadata lookup.
//!
//! The engine bundles are published as assets of JetBrainsRuntime releases;
//! the download URLs are embedded in the free-text release body.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::http::HttpClient;

/// Default release index endpoint.
pub const RELEASES_BASE: &str =
    "https://api.github.com/repos/JetBrains/JetBrainsRuntime/releases";

const GITHUB_JSON: &str = "application/vnd.github+json";

/// A published release. The body text carries the package download URLs;
/// the asset list is informational only.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub body: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

/// Endpoint for a release by tag, or the latest release when no tag is given.
pub fn release_url(base: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) if !tag.is_empty() => format!("{base}/tags/{tag}"),
        _ => format!("{base}/latest"),
    }
}

pub async fn fetch_release<C: HttpClient>(
    client: &C,
    base: &str,
    tag: Option<&str>,
) -> Result<Release> {
    let url = release_url(base, tag);
    tracing::debug!(%url, "querying release index");

    let text = client
        .get_text(&url, GITHUB_JSON)
        .await
        .map_err(|e| Error::Transfer(Box::new(e)))?;

    serde_json::from_str(&text).map_err(Error::Metadata)
}
