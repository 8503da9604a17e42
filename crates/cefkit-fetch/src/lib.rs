//! Release lookup and streaming package download.
//!
//! # Architecture
//!
//! - `release.rs` - Release metadata lookup
//! - `select.rs` - Pure candidate filtering and selection
//! - `download.rs` - Streaming download to a temp file
//! - `http.rs` - HTTP client abstraction
//! - `source.rs` - The `PackageSource` seam for install pipelines

mod download;
mod error;
mod http;
mod release;
mod select;
mod source;

pub use download::download;
pub use error::{Error, Result};
pub use http::{BoxStream, HttpClient, HttpResponse, ReqwestClient};
pub use release::{RELEASES_BASE, Release, ReleaseAsset, fetch_release, release_url};
pub use select::{candidate_urls, select_package_url};
pub use source::{HttpPackageSource, PackageSource};
