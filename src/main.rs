#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use config::{
    CATALOG_URL, CONNECT_TIMEOUT, Config, EPG_URL, OUTPUT_DIR, READ_TIMEOUT, RegionSelector,
    SortBy, parse_flag, split_list,
};
use playlist::PlaylistOptions;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};
use util::{init_http_client, spawn_ct_watcher};

pub mod catalog;
pub mod config;
pub mod epg;
pub mod error;
pub mod fetch;
pub mod generator;
pub mod output;
pub mod playlist;
pub mod util;

#[cfg(test)]
mod test_util;

/// Generates a Samsung TV Plus M3U playlist and EPG for IPTV players such as TiviMate
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Comma-separated region codes, or `all`
    #[arg(long, env = "REGIONS", default_value = "all")]
    regions: String,

    /// Comma-separated channel groups to keep (case-insensitive). Empty keeps every group
    #[arg(long, env = "GROUPS", default_value = "")]
    groups: String,

    /// Keep DRM-protected channels. Only `true` enables it
    #[arg(long, env = "INCLUDE_DRM", default_value = "true", value_parser = parse_flag, action = ArgAction::Set)]
    include_drm: bool,

    /// First channel number. Catalog numbers are only kept when this is 1
    #[arg(long, env = "START_CHNO", default_value_t = 1)]
    start_chno: i64,

    /// Playlist order
    #[arg(long, env = "SORT_BY", value_enum, default_value_t = SortBy::Chno)]
    sort_by: SortBy,

    /// Directory receiving the playlist, EPG and README
    #[arg(long, env = "OUTPUT_DIR", default_value = OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Gzipped channel catalog
    #[arg(long, env = "CATALOG_URL", default_value = CATALOG_URL)]
    catalog_url: String,

    /// Gzipped XMLTV guide, `{region}` is replaced with the region code
    #[arg(long, env = "EPG_URL", default_value = EPG_URL)]
    epg_url: String,
}

impl Args {
    fn into_config(self) -> Config {
        Config {
            regions: RegionSelector::parse(&self.regions),
            groups: split_list(&self.groups),
            playlist: PlaylistOptions {
                include_drm: self.include_drm,
                start_chno: self.start_chno,
                sort_by: self.sort_by,
            },
            output_dir: self.output_dir,
            catalog_url: self.catalog_url,
            epg_url: self.epg_url,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Args::parse().into_config();

    info!("Samsung TV Plus M3U/EPG Generator");
    info!("Regions: {}", config.regions);
    info!(
        "Groups: {}",
        if config.groups.is_empty() {
            "All".to_string()
        } else {
            config.groups.join(", ")
        }
    );
    info!("Include DRM: {}", config.playlist.include_drm);
    info!("Sort by: {}", config.playlist.sort_by);

    let ct = CancellationToken::new();
    spawn_ct_watcher(ct.clone());

    let client = init_http_client(CONNECT_TIMEOUT, READ_TIMEOUT).context("Building HTTP client")?;

    let summary = match generator::generate(&client, &config, &ct).await {
        Ok(s) => s,
        Err(e) => {
            error!(kind = ?e.kind(), "Error: {e}");
            return Err(e).context("Generating Samsung TV Plus playlist");
        }
    };

    info!(
        "Generation completed successfully! Files saved in {}",
        config.output_dir.display()
    );
    info!("Total channels: {}", summary.channel_count);
    info!("DRM channels: {}", summary.drm_count);
    info!("Playlist lines: {}", summary.playlist_lines);
    info!("EPG size: {}", summary.epg_size());

    Ok(())
}
