//! The package source seam consumed by the lifecycle coordinator.

use std::path::PathBuf;

use async_trait::async_trait;

use cefkit_platform::Platform;

use crate::download::download;
use crate::error::Result;
use crate::http::ReqwestClient;
use crate::release::{RELEASES_BASE, fetch_release};
use crate::select::select_package_url;

/// Locates and downloads native engine bundles.
///
/// Object-safe so install pipelines can swap in offline sources for tests.
#[async_trait]
pub trait PackageSource: Send + Sync {
    /// Resolve the download URL of the best package for `platform` in the
    /// release named by `tag` (or the latest release).
    async fn locate(&self, tag: Option<&str>, platform: Platform) -> Result<String>;

    /// Download `url` to a fresh temporary file, reporting progress 0–100.
    async fn download(
        &self,
        url: &str,
        buffer_size: usize,
        on_progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<PathBuf>;
}

/// Production source backed by the GitHub release index.
pub struct HttpPackageSource {
    client: ReqwestClient,
    releases_base: String,
}

impl HttpPackageSource {
    pub fn new() -> Self {
        Self {
            client: ReqwestClient::new(),
            releases_base: RELEASES_BASE.to_string(),
        }
    }

    /// Point at a different release index, e.g. a mirror.
    pub fn with_releases_base(mut self, base: impl Into<String>) -> Self {
        self.releases_base = base.into();
        self
    }
}

impl Default for HttpPackageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageSource for HttpPackageSource {
    async fn locate(&self, tag: Option<&str>, platform: Platform) -> Result<String> {
        let release = fetch_release(&self.client, &self.releases_base, tag).await?;
        let url = select_package_url(&release.body, platform)?;
        tracing::info!(%url, "selected package");
        Ok(url)
    }

    async fn download(
        &self,
        url: &str,
        buffer_size: usize,
        on_progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<PathBuf> {
        download(&self.client, url, buffer_size, on_progress).await
    }
}
