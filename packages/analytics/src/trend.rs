//! Trailing 30-day daily report counts.

use chrono::TimeDelta;
use safesignal_analytics_models::TrendLine;

use crate::context::{AnalysisContext, ValidIncident};
use crate::numeric::{first_max_index, floored_max};

/// Days covered by the trend line.
pub const TREND_DAYS: usize = 30;

/// Counts reports per day over the 30 days ending at `ctx.now`.
///
/// Day `i` covers `[now - (30 - i) days, now - (29 - i) days)`, so the
/// last slot ends exactly at the reference instant. This stage ignores
/// the selected period and expects the full non-draft incident set.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn build_trend(incidents: &[ValidIncident<'_>], ctx: &AnalysisContext) -> TrendLine {
    let day = TimeDelta::days(1);
    let windows: Vec<_> = (0..TREND_DAYS)
        .map(|i| {
            let start = ctx.now - TimeDelta::days((TREND_DAYS - i) as i64);
            (start, start + day)
        })
        .collect();

    let counts: Vec<u64> = windows
        .iter()
        .map(|&(start, end)| {
            incidents
                .iter()
                .filter(|inc| inc.created_at >= start && inc.created_at < end)
                .count() as u64
        })
        .collect();

    let peak_index = first_max_index(&counts);
    let peak_instant = ctx.now - TimeDelta::days((TREND_DAYS - 1 - peak_index) as i64);
    let peak_local = ctx.local(peak_instant);

    TrendLine {
        max: floored_max(counts.iter().copied()),
        total: counts.iter().sum(),
        peak_index,
        peak_date: peak_local.date_naive(),
        peak_label: peak_local.format("%a %-d").to_string(),
        counts,
    }
}
