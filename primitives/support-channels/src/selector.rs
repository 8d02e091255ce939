//! Support channel selection policy.

use std::collections::{BTreeMap, BTreeSet};

use crate::channel::{Channel, ChannelId, RunMode};

/// Channels whose names start with this prefix are customer channels.
pub const CUSTOMER_CHANNEL_PREFIX: &str = "_";

/// Support channels joined in addition to every customer channel.
pub const DEFAULT_SUPPORT_CHANNELS: [&str; 4] = ["customersupport", "frame", "monitoring", "sentry"];

/// Which non-customer channels count as support channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub default_channels: BTreeSet<String>,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self::with_default_channels(DEFAULT_SUPPORT_CHANNELS)
    }
}

impl SelectionPolicy {
    pub fn with_default_channels<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default_channels: names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Channels chosen for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Sorted ascending, no duplicates.
    pub names: Vec<String>,
    /// Id of every entry in `names`.
    pub ids: BTreeMap<String, ChannelId>,
    /// Matched but not actionable through the API; must be handled manually.
    pub unreachable: Vec<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn id(&self, name: &str) -> Option<&ChannelId> {
        self.ids.get(name)
    }
}

fn is_customer_channel(name: &str) -> bool {
    name.starts_with(CUSTOMER_CHANNEL_PREFIX)
}

/// Picks the channels to act on for `mode`.
///
/// Pure: the result depends only on `channels`, `mode`, and `policy`, and is
/// independent of the input order. When two channels share a name the first
/// one listed keeps its id.
pub fn select(channels: &[Channel], mode: RunMode, policy: &SelectionPolicy) -> Selection {
    let mut ids = BTreeMap::new();
    let mut unreachable = BTreeSet::new();

    for channel in channels {
        let name = channel.name.as_str();
        match mode {
            RunMode::Join => {
                if channel.is_member {
                    continue;
                }
                if !is_customer_channel(name) && !policy.default_channels.contains(name) {
                    continue;
                }
            }
            RunMode::Leave => {
                if !channel.is_member || !is_customer_channel(name) {
                    continue;
                }
                // Externally shared channels cannot be left via the API.
                if channel.is_ext_shared {
                    unreachable.insert(channel.name.clone());
                    continue;
                }
            }
        }
        ids.entry(channel.name.clone())
            .or_insert_with(|| channel.id.clone());
    }

    // A name listed both ways stays actionable.
    unreachable.retain(|name| !ids.contains_key(name));

    Selection {
        names: ids.keys().cloned().collect(),
        ids,
        unreachable: unreachable.into_iter().collect(),
    }
}
