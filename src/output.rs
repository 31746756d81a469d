use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::{
    config::Config,
    error::{Error, Result},
};

pub const PLAYLIST_FILE: &str = "samsung_tvplus.m3u";
pub const EPG_FILE: &str = "samsung_tvplus.xml";
pub const README_FILE: &str = "README.md";

async fn write(path: PathBuf, contents: impl AsRef<[u8]>) -> Result<PathBuf> {
    match tokio::fs::write(&path, contents).await {
        Ok(()) => Ok(path),
        Err(source) => Err(Error::Io { path, source }),
    }
}

/// Writes the playlist and the guide into `dir`, creating it when missing
///
/// The playlist is written first. A failing guide write leaves the new playlist next to
/// whatever guide was there before.
///
/// # Errors
/// Errors when the directory cannot be created or either file cannot be written
#[instrument(skip(playlist, epg))]
pub async fn save_files(dir: &Path, playlist: &str, epg: &[u8]) -> Result<(PathBuf, PathBuf)> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    let playlist_path = write(dir.join(PLAYLIST_FILE), playlist).await?;
    info!("Saved playlist: {}", playlist_path.display());

    let epg_path = write(dir.join(EPG_FILE), epg).await?;
    info!("Saved EPG: {}", epg_path.display());

    Ok((playlist_path, epg_path))
}

#[must_use]
pub fn render_readme(config: &Config, generated_at: DateTime<Utc>) -> String {
    let groups = if config.groups.is_empty() {
        "All".to_string()
    } else {
        config.groups.join(",")
    };
    let include_drm = if config.playlist.include_drm {
        "True"
    } else {
        "False"
    };

    indoc::formatdoc!(
        "
        # Samsung TV Plus for TiviMate

        Generated on: {generated} UTC

        ## Files

        - `{playlist_file}` - M3U playlist file for TiviMate
        - `{epg_file}` - EPG (Electronic Program Guide) XML file

        ## TiviMate Setup

        1. In TiviMate, go to Settings → Playlists
        2. Add a new playlist using the raw GitHub URL for the M3U file:
           ```
           https://raw.githubusercontent.com/YOUR_USERNAME/YOUR_REPO/main/output/{playlist_file}
           ```
        3. For EPG, go to Settings → EPG and add:
           ```
           https://raw.githubusercontent.com/YOUR_USERNAME/YOUR_REPO/main/output/{epg_file}
           ```

        ## Configuration

        This playlist was generated with the following settings:
        - Regions: {regions}
        - Groups: {groups}
        - Include DRM: {include_drm}
        - Starting Channel Number: {start_chno}
        - Sort By: {sort_by}

        ## Automatic Updates

        This playlist is automatically updated daily at midnight UTC via GitHub Actions.

        ## Notes

        - DRM-protected channels are marked with [DRM] suffix
        - Some channels may require compatible players that support DRM
        - EPG data is region-specific and updates daily
        ",
        generated = generated_at.format("%Y-%m-%d %H:%M:%S"),
        playlist_file = PLAYLIST_FILE,
        epg_file = EPG_FILE,
        groups = groups,
        include_drm = include_drm,
        regions = config.regions,
        start_chno = config.playlist.start_chno,
        sort_by = config.playlist.sort_by,
    )
}

/// Writes the run summary document into `dir`
///
/// # Errors
/// Errors when the file cannot be written
#[instrument(skip(config))]
pub async fn write_readme(
    dir: &Path,
    config: &Config,
    generated_at: DateTime<Utc>,
) -> Result<PathBuf> {
    let path = write(dir.join(README_FILE), render_readme(config, generated_at)).await?;
    info!("Generated README: {}", path.display());
    Ok(path)
}
