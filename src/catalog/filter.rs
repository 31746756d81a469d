use std::collections::HashMap;

use tracing::{debug, instrument};

use super::structs::{Catalog, ChannelList};
use crate::{config::RegionSelector, error::Result};

/// Merges the channels of the selected regions, then keeps the ones belonging to `groups`
///
/// A channel ID appearing in more than one region keeps its first position but takes
/// the later region's data. An empty `groups` slice keeps every channel; group
/// labels are compared case-insensitively.
///
/// Only the selected regions are decoded.
///
/// # Errors
/// Errors when a selected region holds a malformed channel
#[instrument(skip(catalog))]
pub fn filter_channels(
    catalog: &Catalog,
    regions: &RegionSelector,
    groups: &[String],
) -> Result<ChannelList> {
    let codes: Vec<&str> = match regions {
        RegionSelector::All => catalog.regions.keys().collect(),
        RegionSelector::Codes(codes) => codes.iter().map(String::as_str).collect(),
    };

    let mut merged = ChannelList::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for code in codes {
        let Some(region) = catalog.region(code)? else {
            debug!("Region {code} is not in the catalog, skipping");
            continue;
        };
        debug!(
            "Merging {} channels from {}",
            region.channels.len(),
            region.name.as_deref().unwrap_or(code)
        );

        for (id, channel) in region.channels.0 {
            if let Some(&pos) = positions.get(&id) {
                merged[pos].1 = channel;
            } else {
                positions.insert(id.clone(), merged.len());
                merged.push((id, channel));
            }
        }
    }

    if groups.is_empty() {
        return Ok(merged);
    }

    let wanted = groups.iter().map(|g| g.to_lowercase()).collect::<Vec<_>>();
    merged.retain(|(_, channel)| wanted.contains(&channel.group.to_lowercase()));
    Ok(merged)
}
