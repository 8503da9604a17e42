//! Streaming package download.

use std::io;
use std::path::PathBuf;

use futures_util::StreamExt;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::{Error, Result};
use crate::http::HttpClient;

/// Stream `url` into a fresh temporary file, reporting fractional progress
/// (0–100) whenever the total size is known.
///
/// The caller owns the returned file and is responsible for deleting it once
/// consumed.
pub async fn download<C: HttpClient>(
    client: &C,
    url: &str,
    buffer_size: usize,
    on_progress: &(dyn Fn(f32) + Send + Sync),
) -> Result<PathBuf> {
    let temp = tempfile::Builder::new()
        .prefix("cefkit")
        .suffix(".tar.gz")
        .tempfile()
        .map_err(Error::TempFile)?;
    let (file, path) = temp
        .keep()
        .map_err(|e| Error::TempFile(io::Error::other(e)))?;

    tracing::info!(%url, path = %path.display(), "downloading package");

    let response = client
        .stream(url)
        .await
        .map_err(|e| Error::Transfer(Box::new(e)))?;
    let total = response.content_length;

    let mut writer = BufWriter::with_capacity(buffer_size, tokio::fs::File::from_std(file));
    let mut body = response.body;
    let mut received: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| Error::Transfer(Box::new(e)))?;
        writer.write_all(&chunk).await?;

        received += chunk.len() as u64;
        if let Some(total) = total {
            if total > 0 {
                on_progress((received as f32 / total as f32) * 100.0);
            }
        }
    }

    writer.flush().await?;

    if !response.success {
        return Err(Error::Download);
    }

    Ok(path)
}
