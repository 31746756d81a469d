use indicatif::MultiProgress;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::{error::Result, fetch::download_and_decompress};

pub mod filter;
pub mod structs;

pub use filter::filter_channels;
pub use structs::{Catalog, Channel, ChannelList};

/// Parses the decompressed `.channels.json` document
///
/// # Errors
/// Errors when the bytes are not valid JSON or the top-level fields are missing.
/// Regions are only checked once selected, see [`Catalog::region`].
pub fn parse_catalog(bytes: &[u8]) -> Result<Catalog> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Downloads and parses the channel catalog
///
/// # Errors
/// Errors on network / HTTP status / gzip / JSON failure
#[instrument(skip(client, multi, ct))]
pub async fn get_catalog(
    client: &Client,
    url: &str,
    multi: &MultiProgress,
    ct: &CancellationToken,
) -> Result<Catalog> {
    let bytes = download_and_decompress(client, url, multi, ct).await?;
    let catalog = parse_catalog(&bytes)?;
    info!(
        "Downloaded channel data with {} regions",
        catalog.regions.len()
    );
    Ok(catalog)
}
