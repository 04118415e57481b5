//! Rolling period filter.

use chrono::TimeDelta;
use safesignal_analytics_models::Period;

use crate::context::{AnalysisContext, ValidIncident};

/// Resolves a period tag. Unknown tags fall back to the 30-day window
/// with a warning.
#[must_use]
pub fn resolve_period(tag: &str) -> Period {
    tag.parse().unwrap_or_else(|_| {
        log::warn!("Unknown period '{tag}', using {}", Period::default());
        Period::default()
    })
}

/// Keeps incidents created at or after `now - period`.
///
/// There is no upper bound: records stamped after the reference instant
/// stay in the window.
#[must_use]
pub fn filter_by_period<'a>(
    incidents: &[ValidIncident<'a>],
    period: Period,
    ctx: &AnalysisContext,
) -> Vec<ValidIncident<'a>> {
    let cutoff = ctx.now - TimeDelta::days(period.days());
    incidents
        .iter()
        .filter(|i| i.created_at >= cutoff)
        .copied()
        .collect()
}
