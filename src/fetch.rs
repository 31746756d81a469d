use std::io::{self, Read};

use flate2::read::GzDecoder;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use reqwest::Client;
use tokio::select;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::error::{Error, Result};

/// Downloads a gzip resource and returns its decompressed bytes
///
/// # Errors
/// * Transport failure or timeout
/// * Non-2xx response
/// * Body is not a valid gzip stream
/// * `ct` is cancelled before the download completes
///
/// The progress bar is drawn in `multi`, so concurrent downloads share one display.
#[instrument(skip(client, multi, ct))]
pub async fn download_and_decompress(
    client: &Client,
    url: &str,
    multi: &MultiProgress,
    ct: &CancellationToken,
) -> Result<Vec<u8>> {
    info!("Downloading {url}...");
    let body = select! {
        () = ct.cancelled() => return Err(Error::Cancelled),
        body = download(client, url, multi) => body?,
    };
    debug!("Fetched {} compressed bytes", body.len());

    gunzip(&body).map_err(|source| Error::Decompress {
        url: url.to_string(),
        source,
    })
}

async fn download(client: &Client, url: &str, multi: &MultiProgress) -> Result<Vec<u8>> {
    let network = |source| Error::Network {
        url: url.to_string(),
        source,
    };

    let res = client.get(url).send().await.map_err(network)?;
    let status = res.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let pb = multi.add(
        res.content_length()
            .map_or_else(ProgressBar::no_length, ProgressBar::new),
    );
    pb.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut body = Vec::new();
    let mut stream = res.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(network)?;
        pb.inc(chunk.len() as u64);
        body.extend_from_slice(&chunk);
    }
    pb.finish_and_clear();
    multi.remove(&pb);

    Ok(body)
}

/// Decompresses a single-member gzip stream
///
/// # Errors
/// Errors when `data` is not gzip or is truncated
pub fn gunzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}
