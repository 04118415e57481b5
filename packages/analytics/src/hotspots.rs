//! Top locations by incident count.

use std::collections::BTreeMap;

use safesignal_analytics_models::{Hotspot, HotspotTier};

use crate::context::ValidIncident;
use crate::numeric::{percent, truncate_label};

/// Label used for incidents without a location.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Hotspots returned.
pub const MAX_HOTSPOTS: usize = 5;

/// Display labels longer than this are truncated.
pub const MAX_LABEL_CHARS: usize = 30;

/// Counts keys in first-seen order so a stable sort by count keeps that
/// order among ties.
pub(crate) fn count_in_order<'a, I>(keys: I) -> Vec<(&'a str, u64)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    let mut counts: Vec<(&str, u64)> = Vec::new();
    for key in keys {
        if let Some(&i) = index.get(key) {
            counts[i].1 += 1;
        } else {
            index.insert(key, counts.len());
            counts.push((key, 1));
        }
    }
    counts
}

const fn tier(count: u64) -> HotspotTier {
    if count >= 8 {
        HotspotTier::Critical
    } else if count >= 5 {
        HotspotTier::Active
    } else {
        HotspotTier::Low
    }
}

/// Ranks period incidents by location label.
#[must_use]
pub fn rank_hotspots(incidents: &[ValidIncident<'_>]) -> Vec<Hotspot> {
    let mut counts = count_in_order(incidents.iter().map(|i| {
        match i.record.location_name.as_deref() {
            Some(loc) if !loc.is_empty() => loc,
            _ => UNKNOWN_LOCATION,
        }
    }));
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(MAX_HOTSPOTS);

    let top = counts.first().map_or(1, |&(_, c)| c.max(1));
    counts
        .into_iter()
        .map(|(name, count)| Hotspot {
            name: truncate_label(name, MAX_LABEL_CHARS),
            count,
            pct: percent(count, top),
            tier: tier(count),
        })
        .collect()
}
