//! Case resolution funnel.
//!
//! Each stage predicate is a subset of the one before it, so counts are
//! non-increasing down the funnel for any input.

use safesignal_analytics_models::{Funnel, FunnelStage};
use safesignal_incident_models::IncidentStatus;

use crate::context::ValidIncident;
use crate::numeric::percent;

struct StageDef {
    label: &'static str,
    matches: fn(Option<IncidentStatus>) -> bool,
}

const STAGES: &[StageDef] = &[
    StageDef {
        label: "Received",
        matches: |_| true,
    },
    StageDef {
        label: "Verified",
        matches: |s| s.is_some_and(IncidentStatus::is_actioned),
    },
    StageDef {
        label: "Dispatched",
        matches: |s| s.is_some_and(IncidentStatus::is_dispatched_or_later),
    },
    StageDef {
        label: "On Scene",
        matches: |s| s.is_some_and(IncidentStatus::is_on_scene_or_later),
    },
    StageDef {
        label: "Closed",
        matches: |s| s.is_some_and(IncidentStatus::is_closed),
    },
];

/// Counts period incidents reaching each workflow stage.
#[must_use]
pub fn build_funnel(incidents: &[ValidIncident<'_>]) -> Funnel {
    let statuses: Vec<Option<IncidentStatus>> =
        incidents.iter().map(|i| i.record.status()).collect();

    let counts: Vec<u64> = STAGES
        .iter()
        .map(|stage| statuses.iter().filter(|&&s| (stage.matches)(s)).count() as u64)
        .collect();
    let received = counts.first().copied().unwrap_or(0);

    let stages = STAGES
        .iter()
        .zip(&counts)
        .enumerate()
        .map(|(i, (def, &count))| {
            let drop_from_previous = i
                .checked_sub(1)
                .map(|prev| counts[prev])
                .filter(|&prev| prev > 0)
                .map(|prev| percent(prev.saturating_sub(count), prev));
            FunnelStage {
                label: def.label.to_string(),
                count,
                pct_of_received: percent(count, received),
                drop_from_previous,
            }
        })
        .collect();

    let verified = counts[1];
    let dispatched = counts[2];
    let dispatch_backlog_pct =
        (verified > 0).then(|| percent(verified.saturating_sub(dispatched), verified));

    Funnel {
        stages,
        dispatch_backlog_pct,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::context::prepare;
    use crate::context::test_support::{incident, reference_now};

    fn funnel_for(statuses: &[&str]) -> Funnel {
        let now = reference_now() - TimeDelta::days(1);
        let records: Vec<_> = statuses
            .iter()
            .zip(0..)
            .map(|(s, id)| incident(id, now, s))
            .collect();
        build_funnel(&prepare(&records).incidents)
    }

    fn counts(funnel: &Funnel) -> Vec<u64> {
        funnel.stages.iter().map(|s| s.count).collect()
    }

    #[test]
    fn counts_nested_stages() {
        let funnel = funnel_for(&[
            "submitted",
            "in_review",
            "verified",
            "published",
            "dispatched",
            "on_scene",
            "investigating",
            "police_closed",
            "resolved",
            "rejected",
        ]);
        assert_eq!(counts(&funnel), [10, 7, 5, 4, 2]);
        assert_eq!(funnel.stages[1].pct_of_received, 70);
        assert_eq!(funnel.stages[0].drop_from_previous, None);
        assert_eq!(funnel.stages[1].drop_from_previous, Some(30));
        assert_eq!(funnel.stages[2].drop_from_previous, Some(29));
        assert_eq!(funnel.dispatch_backlog_pct, Some(29));
    }

    #[test]
    fn monotonic_for_any_mix() {
        let funnel = funnel_for(&[
            "archived", "merged", "draft", "verified", "bogus", "on_scene", "resolved",
        ]);
        for pair in counts(&funnel).windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn empty_funnel_has_no_drops() {
        let funnel = funnel_for(&[]);
        assert_eq!(counts(&funnel), [0, 0, 0, 0, 0]);
        assert!(funnel.stages.iter().all(|s| s.drop_from_previous.is_none()));
        assert!(funnel.stages.iter().all(|s| s.pct_of_received == 0));
        assert_eq!(funnel.dispatch_backlog_pct, None);
    }

    #[test]
    fn drop_absent_after_empty_stage() {
        let funnel = funnel_for(&["submitted", "rejected"]);
        assert_eq!(funnel.stages[1].drop_from_previous, Some(100));
        assert_eq!(funnel.stages[2].drop_from_previous, None);
    }
}
