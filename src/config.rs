use std::{fmt, path::PathBuf, time::Duration};

use crate::playlist::PlaylistOptions;

pub const CATALOG_URL: &str = "https://i.mjh.nz/SamsungTVPlus/.channels.json.gz";
/// `{region}` is replaced with a region code or `all`
pub const EPG_URL: &str = "https://i.mjh.nz/SamsungTVPlus/{region}.xml.gz";
pub const OUTPUT_DIR: &str = "output";

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Which catalog regions contribute channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionSelector {
    All,
    Codes(Vec<String>),
}

impl RegionSelector {
    /// Parses a comma-separated region list. Only a lone `all` selects every region.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let codes = split_list(input);
        if codes == ["all"] {
            Self::All
        } else {
            Self::Codes(codes)
        }
    }

    /// Region whose guide is downloaded: the single selected region, otherwise `all`
    #[must_use]
    pub fn epg_region(&self) -> &str {
        match self {
            Self::Codes(codes) if codes.len() == 1 => codes[0].as_str(),
            _ => "all",
        }
    }
}

impl fmt::Display for RegionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Codes(codes) => f.write_str(&codes.join(",")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortBy {
    /// Catalog channel number, unnumbered channels last
    #[default]
    Chno,
    /// Channel name, case-insensitive
    Name,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Chno => "chno",
            Self::Name => "name",
        })
    }
}

/// Settings for a single run, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub regions: RegionSelector,
    /// Empty means every group
    pub groups: Vec<String>,
    pub playlist: PlaylistOptions,
    pub output_dir: PathBuf,
    pub catalog_url: String,
    pub epg_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            regions: RegionSelector::All,
            groups: Vec::new(),
            playlist: PlaylistOptions::default(),
            output_dir: PathBuf::from(OUTPUT_DIR),
            catalog_url: CATALOG_URL.to_string(),
            epg_url: EPG_URL.to_string(),
        }
    }
}

/// Splits a comma-separated list, dropping blank items
#[must_use]
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Anything other than `true` (any case) is false
///
/// # Errors
/// Never errors; the signature fits clap's value parsers
pub fn parse_flag(input: &str) -> Result<bool, String> {
    Ok(input.trim().eq_ignore_ascii_case("true"))
}
