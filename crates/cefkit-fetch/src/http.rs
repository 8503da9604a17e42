//! Asynchronous HTTP client abstraction.
//!
//! The trait provides the minimal interface needed for release lookup and
//! package download. Implementations handle their own redirect following and
//! timeout configuration; mock implementations back the tests.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// A streaming HTTP response.
pub struct HttpResponse<E> {
    /// Whether the final status (after redirects) was a success.
    pub success: bool,
    /// Content-Length, if the server provided one.
    pub content_length: Option<u64>,
    /// The response body.
    pub body: BoxStream<'static, std::result::Result<Bytes, E>>,
}

pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch a text document, failing on a non-success status.
    fn get_text(
        &self,
        url: &str,
        accept: &str,
    ) -> impl Future<Output = std::result::Result<String, Self::Error>> + Send;

    /// Open a streaming connection to `url`.
    fn stream(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<HttpResponse<Self::Error>, Self::Error>> + Send;
}

/// Production HTTP client backed by `reqwest`.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    type Error = reqwest::Error;

    async fn get_text(&self, url: &str, accept: &str) -> Result<String, reqwest::Error> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .await?
            .error_for_status()?;
        response.text().await
    }

    async fn stream(&self, url: &str) -> Result<HttpResponse<reqwest::Error>, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let success = response.status().is_success();
        let content_length = response.content_length();

        Ok(HttpResponse {
            success,
            content_length,
            body: Box::pin(response.bytes_stream()),
        })
    }
}
