use std::fmt;

use tracing::debug;

use crate::{
    catalog::{Channel, ChannelList},
    config::SortBy,
};

/// `{slug}` is replaced with the channel's filled-in catalog slug
pub const PLAYBACK_URL: &str = "https://jmp2.uk/{slug}";

/// Sort key of channels the catalog left unnumbered
const MISSING_CHNO: i64 = 999_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistOptions {
    pub include_drm: bool,
    /// When exactly `1`, catalog channel numbers are kept
    pub start_chno: i64,
    pub sort_by: SortBy,
}

impl Default for PlaylistOptions {
    fn default() -> Self {
        Self {
            include_drm: true,
            start_chno: 1,
            sort_by: SortBy::Chno,
        }
    }
}

/// One `#EXTINF` + URL pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry<'a> {
    pub id: &'a str,
    /// Carries a ` [DRM]` suffix for protected channels
    pub name: String,
    pub logo: &'a str,
    pub group: &'a str,
    /// Counting up from `start_chno` may pass `i64::MAX`
    pub chno: i128,
    pub url: String,
    pub license_url: Option<&'a str>,
}

impl fmt::Display for PlaylistEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"#EXTINF:-1 tvg-id="{}" tvg-name="{}" tvg-logo="{}" group-title="{}" tvg-chno="{}""#,
            self.id, self.name, self.logo, self.group, self.chno
        )?;
        if let Some(license_url) = self.license_url {
            write!(f, r#" drm="true" license-url="{license_url}""#)?;
        }
        write!(f, ",{}\n{}", self.name, self.url)
    }
}

/// Rendered playlist document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub text: String,
    pub channel_count: usize,
    pub drm_count: usize,
}

impl Playlist {
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.text.matches('\n').count()
    }
}

/// Builds the playback URL of a channel from the catalog slug template
#[must_use]
pub fn playback_url(slug_template: &str, id: &str) -> String {
    PLAYBACK_URL.replace("{slug}", &slug_template.replace("{id}", id))
}

/// Orders `channels` for output. The sort is stable, ties keep merge order.
#[must_use]
pub fn sort_channels(channels: &ChannelList, sort_by: SortBy) -> Vec<(&str, &Channel)> {
    let mut sorted = channels
        .iter()
        .map(|(id, channel)| (id.as_str(), channel))
        .collect::<Vec<_>>();

    match sort_by {
        SortBy::Chno => sorted.sort_by_key(|(_, c)| c.chno.unwrap_or(MISSING_CHNO)),
        SortBy::Name => sorted.sort_by_cached_key(|(_, c)| c.name.trim().to_lowercase()),
    }
    sorted
}

/// Turns channels into playlist entries, dropping DRM channels unless allowed
///
/// Numbering: with `start_chno == 1` a channel keeps its catalog number when it has one.
/// Every other channel takes the next number of a counter starting at `start_chno`.
#[must_use]
pub fn build_entries<'a>(
    channels: &'a ChannelList,
    slug_template: &str,
    options: &PlaylistOptions,
) -> Vec<PlaylistEntry<'a>> {
    let mut next_chno = i128::from(options.start_chno);
    let mut entries = Vec::with_capacity(channels.len());

    for (id, channel) in sort_channels(channels, options.sort_by) {
        if channel.is_drm() && !options.include_drm {
            debug!("Skipping DRM channel {id}");
            continue;
        }

        let chno = match channel.native_chno() {
            Some(n) if options.start_chno == 1 => i128::from(n),
            _ => {
                let n = next_chno;
                next_chno += 1;
                n
            }
        };

        let license_url = channel.license_url();
        let name = if license_url.is_some() {
            format!("{} [DRM]", channel.name)
        } else {
            channel.name.clone()
        };

        entries.push(PlaylistEntry {
            id,
            name,
            logo: &channel.logo,
            group: &channel.group,
            chno,
            url: playback_url(slug_template, id),
            license_url,
        });
    }

    entries
}

/// Renders the complete M3U document, without a trailing newline
#[must_use]
pub fn generate_playlist(
    channels: &ChannelList,
    slug_template: &str,
    options: &PlaylistOptions,
) -> Playlist {
    let entries = build_entries(channels, slug_template, options);

    let mut text = String::from("#EXTM3U");
    for entry in &entries {
        text.push('\n');
        text.push_str(&entry.to_string());
    }

    Playlist {
        text,
        channel_count: entries.len(),
        drm_count: entries.iter().filter(|e| e.license_url.is_some()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{filter_channels, parse_catalog},
        config::RegionSelector,
    };

    const SCENARIO: &str = r#"{
        "slug": "stvp-{id}",
        "regions": {
            "us": { "channels": { "1": { "name": "A", "logo": "http://l/a.png", "group": "News" } } },
            "uk": { "channels": { "2": { "name": "B", "logo": "http://l/b.png", "group": "Sport", "license_url": "http://x" } } }
        }
    }"#;

    fn channel(name: &str, chno: Option<i64>, license_url: Option<&str>) -> Channel {
        Channel {
            name: name.to_string(),
            logo: String::new(),
            group: "General".to_string(),
            chno,
            license_url: license_url.map(ToString::to_string),
        }
    }

    fn list(items: Vec<(&str, Channel)>) -> ChannelList {
        items
            .into_iter()
            .map(|(id, c)| (id.to_string(), c))
            .collect()
    }

    fn scenario_channels() -> (String, ChannelList) {
        let catalog = parse_catalog(SCENARIO.as_bytes()).unwrap();
        let channels = filter_channels(&catalog, &RegionSelector::All, &[]).unwrap();
        (catalog.slug, channels)
    }

    #[test]
    fn drm_excluded_scenario() {
        let (slug, channels) = scenario_channels();
        let options = PlaylistOptions {
            include_drm: false,
            ..PlaylistOptions::default()
        };
        let playlist = generate_playlist(&channels, &slug, &options);

        assert_eq!(
            playlist.text,
            "#EXTM3U\n\
             #EXTINF:-1 tvg-id=\"1\" tvg-name=\"A\" tvg-logo=\"http://l/a.png\" group-title=\"News\" tvg-chno=\"1\",A\n\
             https://jmp2.uk/stvp-1"
        );
        assert_eq!(playlist.channel_count, 1);
        assert_eq!(playlist.drm_count, 0);
        assert!(!playlist.text.contains("[DRM]"));
        assert!(!playlist.text.contains("license-url"));
    }

    #[test]
    fn drm_included_sorted_by_name_scenario() {
        let (slug, channels) = scenario_channels();
        let options = PlaylistOptions {
            include_drm: true,
            sort_by: SortBy::Name,
            ..PlaylistOptions::default()
        };
        let entries = build_entries(&channels, &slug, &options);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "A");
        assert_eq!(entries[1].name, "B [DRM]");
        assert_eq!(entries[1].license_url, Some("http://x"));
        assert_eq!(
            entries[1].to_string(),
            "#EXTINF:-1 tvg-id=\"2\" tvg-name=\"B [DRM]\" tvg-logo=\"http://l/b.png\" group-title=\"Sport\" tvg-chno=\"2\" drm=\"true\" license-url=\"http://x\",B [DRM]\n\
             https://jmp2.uk/stvp-2"
        );

        let playlist = generate_playlist(&channels, &slug, &options);
        assert_eq!(playlist.drm_count, 1);
        assert_eq!(playlist.line_count(), 4);
    }

    #[test]
    fn sorts_by_chno_with_unnumbered_last() {
        let channels = list(vec![
            ("none", channel("No number", None, None)),
            ("b", channel("Twenty", Some(20), None)),
            ("a", channel("Five", Some(5), None)),
            ("tie", channel("Twenty again", Some(20), None)),
        ]);
        let ids = sort_channels(&channels, SortBy::Chno)
            .into_iter()
            .map(|(id, _)| id)
            .collect::<Vec<_>>();
        assert_eq!(ids, ["a", "b", "tie", "none"]);
    }

    #[test]
    fn sorts_by_trimmed_case_insensitive_name() {
        let channels = list(vec![
            ("1", channel("zulu", None, None)),
            ("2", channel("  Alpha", None, None)),
            ("3", channel("bravo ", None, None)),
            ("4", channel("ALPHA", None, None)),
        ]);
        let entries = build_entries(
            &channels,
            "{id}",
            &PlaylistOptions {
                sort_by: SortBy::Name,
                ..PlaylistOptions::default()
            },
        );

        let keys = entries
            .iter()
            .map(|e| e.name.trim().to_lowercase())
            .collect::<Vec<_>>();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(
            entries.iter().map(|e| e.id).collect::<Vec<_>>(),
            ["2", "4", "3", "1"]
        );
    }

    #[test]
    fn native_numbers_kept_only_from_one() {
        let channels = list(vec![
            ("a", channel("A", Some(7), None)),
            ("b", channel("B", Some(42), None)),
            ("c", channel("C", None, None)),
        ]);

        let from_one = build_entries(&channels, "{id}", &PlaylistOptions::default());
        assert_eq!(
            from_one.iter().map(|e| e.chno).collect::<Vec<_>>(),
            [7, 42, 1]
        );

        let from_five = build_entries(
            &channels,
            "{id}",
            &PlaylistOptions {
                start_chno: 5,
                ..PlaylistOptions::default()
            },
        );
        assert_eq!(
            from_five.iter().map(|e| e.chno).collect::<Vec<_>>(),
            [5, 6, 7]
        );
    }

    #[test]
    fn skipped_channels_do_not_consume_numbers() {
        let channels = list(vec![
            ("a", channel("A", Some(1), None)),
            ("b", channel("B", Some(2), Some("http://lic"))),
            ("c", channel("C", Some(3), None)),
        ]);
        let entries = build_entries(
            &channels,
            "{id}",
            &PlaylistOptions {
                include_drm: false,
                start_chno: 100,
                sort_by: SortBy::Chno,
            },
        );
        assert_eq!(
            entries.iter().map(|e| (e.id, e.chno)).collect::<Vec<_>>(),
            [("a", 100), ("c", 101)]
        );
    }

    #[test]
    fn numbering_past_i64_max_keeps_counting() {
        let channels = list(vec![
            ("a", channel("A", None, None)),
            ("b", channel("B", None, None)),
        ]);
        let entries = build_entries(
            &channels,
            "{id}",
            &PlaylistOptions {
                start_chno: i64::MAX,
                ..PlaylistOptions::default()
            },
        );
        assert_eq!(
            entries.iter().map(|e| e.chno).collect::<Vec<_>>(),
            [i128::from(i64::MAX), i128::from(i64::MAX) + 1]
        );
        assert!(entries[1].to_string().contains(r#"tvg-chno="9223372036854775808""#));
    }

    #[test]
    fn zero_chno_and_empty_license_count_as_absent() {
        let channels = list(vec![("z", channel("Zero", Some(0), Some("")))]);
        let entries = build_entries(
            &channels,
            "{id}",
            &PlaylistOptions {
                include_drm: false,
                ..PlaylistOptions::default()
            },
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].chno, 1);
        assert_eq!(entries[0].name, "Zero");
        assert_eq!(entries[0].license_url, None);
    }

    #[test]
    fn empty_playlist_is_just_the_header() {
        let playlist = generate_playlist(&ChannelList::new(), "{id}", &PlaylistOptions::default());
        assert_eq!(playlist.text, "#EXTM3U");
        assert_eq!(playlist.line_count(), 0);
        assert_eq!(playlist.channel_count, 0);
    }

    #[test]
    fn playback_urls() {
        assert_eq!(
            playback_url("stvp-{id}", "USBC4400011VQ"),
            "https://jmp2.uk/stvp-USBC4400011VQ"
        );
    }
}
