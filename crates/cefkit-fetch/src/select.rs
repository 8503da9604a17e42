//! Package candidate selection.
//!
//! Pure transformations from release body text to the single best download
//! URL for a platform.

use once_cell::sync::Lazy;
use regex::Regex;

use cefkit_platform::Platform;

use crate::error::{Error, Result};

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(https?://|www\.)[-a-zA-Z0-9+&@#/%?=~_|!:.;]*[-a-zA-Z0-9+&@#/%=~_|]")
        .expect("url pattern is valid")
});

/// Extract candidate package URLs from free text, dropping checksum files and
/// URLs for other products.
pub fn candidate_urls(body: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .filter(|url| {
            let lower = url.to_lowercase();
            !lower.is_empty() && !lower.ends_with(".checksum") && lower.contains("jcef")
        })
        .collect()
}

/// Pick the best package URL for `platform` from a release body.
///
/// Candidates must match an OS alias and an arch alias. Among survivors,
/// non-SDK packages are preferred over SDK packages and `.tar.gz` over other
/// extensions; the sort is stable so ties keep their original order.
pub fn select_package_url(body: &str, platform: Platform) -> Result<String> {
    let candidates = candidate_urls(body);

    let mut matching: Vec<String> = candidates
        .into_iter()
        .filter(|url| {
            let lower = url.to_lowercase();
            platform.os.aliases().iter().any(|os| lower.contains(os))
        })
        .filter(|url| {
            let lower = url.to_lowercase();
            platform.arch.aliases().iter().any(|arch| lower.contains(arch))
        })
        .collect();

    if matching.is_empty() {
        return Err(Error::UnsupportedPackage {
            os: platform.os.to_string(),
            arch: platform.arch.to_string(),
        });
    }

    matching.sort_by_key(|url| {
        let lower = url.to_lowercase();
        let sdk = if lower.contains("sdk") { 1 } else { 0 };
        let tarball = if lower.ends_with(".tar.gz") { 0 } else { 1 };
        (sdk, tarball)
    });

    Ok(matching.remove(0))
}
