use std::path::PathBuf;

use chrono::Utc;
use indicatif::{HumanCount, MultiProgress};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    catalog::{filter_channels, get_catalog},
    config::Config,
    epg::get_epg,
    error::Result,
    output::{save_files, write_readme},
    playlist::generate_playlist,
};

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub playlist_path: PathBuf,
    pub epg_path: PathBuf,
    pub readme_path: PathBuf,
    pub channel_count: usize,
    pub drm_count: usize,
    pub playlist_lines: usize,
    pub epg_bytes: usize,
}

impl Summary {
    /// Guide size with thousands separators, e.g. `1,234,567 bytes`
    #[must_use]
    pub fn epg_size(&self) -> String {
        format!("{} bytes", HumanCount(self.epg_bytes as u64))
    }
}

/// Downloads the catalog and guide, then writes playlist, guide and README
///
/// Both downloads run concurrently; the first failure aborts the run.
///
/// # Errors
/// Any fetch, parse or write failure
pub async fn generate(client: &Client, config: &Config, ct: &CancellationToken) -> Result<Summary> {
    let epg_region = config.regions.epg_region();
    let multi = MultiProgress::new();

    let (catalog, epg) = tokio::try_join!(
        get_catalog(client, &config.catalog_url, &multi, ct),
        get_epg(client, &config.epg_url, epg_region, &multi, ct),
    )?;

    let channels = filter_channels(&catalog, &config.regions, &config.groups)?;
    info!("Filtered to {} channels", channels.len());

    let playlist = generate_playlist(&channels, &catalog.slug, &config.playlist);

    let (playlist_path, epg_path) = save_files(&config.output_dir, &playlist.text, &epg).await?;
    let readme_path = write_readme(&config.output_dir, config, Utc::now()).await?;

    Ok(Summary {
        playlist_path,
        epg_path,
        readme_path,
        channel_count: playlist.channel_count,
        drm_count: playlist.drm_count,
        playlist_lines: playlist.line_count(),
        epg_bytes: epg.len(),
    })
}
