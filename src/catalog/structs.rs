use std::{collections::HashMap, fmt, marker::PhantomData};

use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};
use serde_json::Value;

use crate::error::{Error, Result};

/// A JSON object whose entries are kept in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordered<T>(pub Vec<(String, T)>);

impl<T> Default for Ordered<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Ordered<T> {
    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Ordered<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
            type Value = Ordered<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let capacity = map.size_hint().unwrap_or(0);
                let mut entries: Vec<(String, T)> = Vec::with_capacity(capacity);
                let mut positions: HashMap<String, usize> = HashMap::with_capacity(capacity);
                while let Some((key, value)) = map.next_entry::<String, T>()? {
                    // Duplicate keys: last value wins, first position is kept
                    if let Some(&pos) = positions.get(&key) {
                        entries[pos].1 = value;
                    } else {
                        positions.insert(key.clone(), entries.len());
                        entries.push((key, value));
                    }
                }
                Ok(Ordered(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

/// The whole Samsung TV Plus dataset
///
/// Regions stay as raw JSON until selected, so a malformed region that is never
/// used does not fail the run.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    /// Playback slug pattern, `{id}` is replaced with the channel ID
    pub slug: String,
    #[serde(default)]
    pub regions: Ordered<Value>,
}

impl Catalog {
    /// Decodes the region `code`, `None` when the catalog does not have it
    ///
    /// # Errors
    /// Errors when the region or one of its channels is malformed
    pub fn region(&self, code: &str) -> Result<Option<Region>> {
        self.regions
            .get(code)
            .map(|raw| Region::deserialize(raw).map_err(Error::from))
            .transpose()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub channels: Ordered<Channel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Channel {
    pub name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub chno: Option<i64>,
    #[serde(default)]
    pub license_url: Option<String>,
}

impl Channel {
    /// DRM license URL, if the channel is protected
    #[must_use]
    pub fn license_url(&self) -> Option<&str> {
        self.license_url.as_deref().filter(|u| !u.is_empty())
    }

    #[must_use]
    pub fn is_drm(&self) -> bool {
        self.license_url().is_some()
    }

    /// Channel number assigned by the catalog. Zero means unassigned.
    #[must_use]
    pub fn native_chno(&self) -> Option<i64> {
        self.chno.filter(|n| *n != 0)
    }
}

/// Channel IDs with their channel, in merge order
pub type ChannelList = Vec<(String, Channel)>;
