use indicatif::MultiProgress;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::{error::Result, fetch::download_and_decompress};

/// Fills the `{region}` placeholder of an EPG URL template
#[must_use]
pub fn epg_url(template: &str, region: &str) -> String {
    template.replace("{region}", region)
}

/// Downloads the XMLTV guide for `region`. The content is passed through untouched.
///
/// # Errors
/// Errors on network / HTTP status / gzip failure
#[instrument(skip(client, multi, ct))]
pub async fn get_epg(
    client: &Client,
    template: &str,
    region: &str,
    multi: &MultiProgress,
    ct: &CancellationToken,
) -> Result<Vec<u8>> {
    let epg = download_and_decompress(client, &epg_url(template, region), multi, ct).await?;
    info!("Downloaded EPG data for region: {region}");
    Ok(epg)
}
