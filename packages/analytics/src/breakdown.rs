//! Category, severity, status and law-enforcement stage breakdowns shown
//! beside the main analytics cards.

use std::collections::BTreeMap;

use chrono::TimeDelta;
use safesignal_analytics_models::{
    CaseStages, CategoryShare, ClosedCase, QueuedCase, SeverityCount, StatusCount,
};
use safesignal_incident_models::{IncidentSeverity, IncidentStatus};

use crate::context::{AnalysisContext, ValidIncident};
use crate::hotspots::count_in_order;
use crate::numeric::{floored_max, percent};

/// Categories listed in the breakdown.
pub const MAX_CATEGORIES: usize = 6;

/// Verified cases older than this many minutes count as unactioned.
pub const UNACTIONED_THRESHOLD_MINUTES: i64 = 30;

/// Unactioned cases listed.
pub const MAX_UNACTIONED: usize = 5;

/// Incoming cases listed.
pub const MAX_INCOMING: usize = 5;

/// Recently closed cases listed.
pub const MAX_RECENTLY_CLOSED: usize = 4;

const CASE_STAGES: [IncidentStatus; 5] = [
    IncidentStatus::Verified,
    IncidentStatus::Dispatched,
    IncidentStatus::OnScene,
    IncidentStatus::Investigating,
    IncidentStatus::PoliceClosed,
];

/// Most frequent categories with volume relative to the largest.
#[must_use]
pub fn category_shares(incidents: &[ValidIncident<'_>]) -> Vec<CategoryShare> {
    let mut counts = count_in_order(incidents.iter().map(|i| i.record.category_tag()));
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(MAX_CATEGORIES);

    let top = counts.first().map_or(1, |&(_, c)| c.max(1));
    counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category: category.to_string(),
            count,
            pct: percent(count, top),
        })
        .collect()
}

/// Active law-enforcement cases per severity, most severe first.
#[must_use]
pub fn severity_breakdown(incidents: &[ValidIncident<'_>]) -> Vec<SeverityCount> {
    let active: Vec<Option<IncidentSeverity>> = incidents
        .iter()
        .filter(|i| i.record.status().is_some_and(IncidentStatus::is_active_case))
        .map(|i| i.record.severity())
        .collect();

    IncidentSeverity::descending()
        .iter()
        .map(|&severity| SeverityCount {
            severity: severity.to_string(),
            count: active.iter().filter(|&&s| s == Some(severity)).count() as u64,
        })
        .collect()
}

/// Incidents per raw status string, ordered by status.
#[must_use]
pub fn status_counts(incidents: &[ValidIncident<'_>]) -> Vec<StatusCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for incident in incidents {
        *counts.entry(incident.record.status.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect()
}

/// Counts for each stage of the law-enforcement case workflow.
#[must_use]
pub fn case_stages(incidents: &[ValidIncident<'_>]) -> CaseStages {
    let stages: Vec<StatusCount> = CASE_STAGES
        .iter()
        .map(|&stage| StatusCount {
            status: stage.to_string(),
            count: incidents
                .iter()
                .filter(|i| i.record.status() == Some(stage))
                .count() as u64,
        })
        .collect();

    let active_count = stages
        .iter()
        .filter(|s| s.status != IncidentStatus::PoliceClosed.as_ref())
        .map(|s| s.count)
        .sum();

    CaseStages {
        max: floored_max(stages.iter().map(|s| s.count)),
        stages,
        active_count,
    }
}

fn case_title(incident: &ValidIncident<'_>) -> String {
    incident
        .record
        .title
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Case #{}", incident.record.incident_id))
}

fn queued(incident: &ValidIncident<'_>, ctx: &AnalysisContext) -> QueuedCase {
    QueuedCase {
        incident_id: incident.record.incident_id.clone(),
        title: case_title(incident),
        minutes_waiting: u64::try_from((ctx.now - incident.created_at).num_minutes()).unwrap_or(0),
    }
}

fn verified<'a, 'b>(
    incidents: &'b [ValidIncident<'a>],
) -> impl Iterator<Item = &'b ValidIncident<'a>> {
    incidents
        .iter()
        .filter(|i| i.record.status() == Some(IncidentStatus::Verified))
}

/// Verified cases that have waited longer than the action threshold,
/// oldest first.
#[must_use]
pub fn unactioned_cases(incidents: &[ValidIncident<'_>], ctx: &AnalysisContext) -> Vec<QueuedCase> {
    let threshold = TimeDelta::minutes(UNACTIONED_THRESHOLD_MINUTES);
    let mut waiting: Vec<&ValidIncident<'_>> = verified(incidents)
        .filter(|i| ctx.now - i.created_at > threshold)
        .collect();
    waiting.sort_by_key(|i| i.created_at);
    waiting.truncate(MAX_UNACTIONED);

    waiting.into_iter().map(|i| queued(i, ctx)).collect()
}

/// Verified cases still within the action threshold, newest first.
#[must_use]
pub fn incoming_cases(incidents: &[ValidIncident<'_>], ctx: &AnalysisContext) -> Vec<QueuedCase> {
    let threshold = TimeDelta::minutes(UNACTIONED_THRESHOLD_MINUTES);
    let mut fresh: Vec<&ValidIncident<'_>> = verified(incidents)
        .filter(|i| ctx.now - i.created_at <= threshold)
        .collect();
    fresh.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    fresh.truncate(MAX_INCOMING);

    fresh.into_iter().map(|i| queued(i, ctx)).collect()
}

/// Police-closed cases, most recently updated first.
#[must_use]
pub fn recently_closed(incidents: &[ValidIncident<'_>]) -> Vec<ClosedCase> {
    let mut closed: Vec<ClosedCase> = incidents
        .iter()
        .filter(|i| i.record.status() == Some(IncidentStatus::PoliceClosed))
        .map(|i| ClosedCase {
            incident_id: i.record.incident_id.clone(),
            title: case_title(i),
            closed_at: i.updated_at.unwrap_or(i.created_at),
        })
        .collect();
    closed.sort_by(|a, b| b.closed_at.cmp(&a.closed_at));
    closed.truncate(MAX_RECENTLY_CLOSED);
    closed
}
