//! Reporter accuracy ranking.

use std::collections::BTreeMap;

use safesignal_analytics_models::{QualityTier, ReporterQuality};
use safesignal_incident_models::UserRecord;

use crate::context::ValidIncident;
use crate::numeric::percent;

/// Reporters with fewer submissions are left out rather than scored.
pub const MIN_SUBMISSIONS: u64 = 2;

/// Reporters returned.
pub const MAX_REPORTERS: usize = 5;

#[derive(Default)]
struct Tally {
    total: u64,
    valid: u64,
}

const fn quality_tier(accuracy: u8) -> QualityTier {
    if accuracy >= 75 {
        QualityTier::Good
    } else if accuracy >= 40 {
        QualityTier::Moderate
    } else {
        QualityTier::Poor
    }
}

fn display_name(id: &str, user: Option<&UserRecord>) -> String {
    match user {
        Some(u) => match u.username.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("User #{id}"),
        },
        None => format!("Reporter #{id}"),
    }
}

/// Scores the most active reporters in the period by how many of their
/// reports were actioned.
#[must_use]
pub fn score_reporters(incidents: &[ValidIncident<'_>], users: &[UserRecord]) -> Vec<ReporterQuality> {
    let users_by_id: BTreeMap<&str, &UserRecord> =
        users.iter().map(|u| (u.user_id.as_str(), u)).collect();

    let mut order: Vec<&str> = Vec::new();
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for incident in incidents {
        let Some(reporter) = incident.record.reporter() else {
            continue;
        };
        let tally = tallies.entry(reporter).or_insert_with(|| {
            order.push(reporter);
            Tally::default()
        });
        tally.total += 1;
        if incident.record.is_actioned() {
            tally.valid += 1;
        }
    }

    let mut ranked: Vec<(&str, &Tally)> = order
        .into_iter()
        .filter_map(|id| tallies.get(id).map(|t| (id, t)))
        .filter(|(_, t)| t.total >= MIN_SUBMISSIONS)
        .collect();
    ranked.sort_by(|a, b| b.1.total.cmp(&a.1.total));
    ranked.truncate(MAX_REPORTERS);

    ranked
        .into_iter()
        .map(|(id, tally)| {
            let name = display_name(id, users_by_id.get(id).copied());
            let accuracy = percent(tally.valid, tally.total);
            ReporterQuality {
                id: id.to_string(),
                initials: name.chars().take(2).collect::<String>().to_uppercase(),
                name,
                total: tally.total,
                valid: tally.valid,
                accuracy,
                tier: quality_tier(accuracy),
            }
        })
        .collect()
}
