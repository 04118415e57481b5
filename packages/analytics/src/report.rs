//! Full analysis pass over one snapshot.

use safesignal_analytics_models::{AnalyticsReport, DataQuality, Period};

use crate::breakdown::{
    case_stages, category_shares, incoming_cases, recently_closed, severity_breakdown,
    status_counts, unactioned_cases,
};
use crate::category_trend::build_category_trend;
use crate::context::{AnalysisContext, prepare};
use crate::distribution::{build_histogram, build_percentiles};
use crate::funnel::build_funnel;
use crate::heatmap::build_heatmap;
use crate::hotspots::rank_hotspots;
use crate::kpi::compute_kpis;
use crate::period::filter_by_period;
use crate::reporters::score_reporters;
use crate::snapshot::Snapshot;
use crate::trend::build_trend;

/// Runs every stage over `snapshot` for the given period.
///
/// Drafts are stripped and timestamps validated first. Entries the
/// snapshot loader skipped are reported in the data-quality counters. The trend line and
/// category trend see every remaining incident; all other stages see only
/// the period window. The KPI stage's response sample feeds the histogram
/// and percentiles directly.
#[must_use]
pub fn build_report(snapshot: &Snapshot, period: Period, ctx: &AnalysisContext) -> AnalyticsReport {
    let prepared = prepare(&snapshot.incidents);
    let all = &prepared.incidents;
    let filtered = filter_by_period(all, period, ctx);

    log::debug!(
        "Analyzing {} of {} incidents for period {period} at {}",
        filtered.len(),
        all.len(),
        ctx.now
    );

    let kpi = compute_kpis(&filtered);
    let histogram = build_histogram(&kpi.sample);
    let percentiles = build_percentiles(&kpi.sample);
    log::debug!(
        "KPIs: avg response {}m, SLA {}%, resolution {}%, {} sampled",
        kpi.summary.avg_response,
        kpi.summary.sla_rate,
        kpi.summary.resolution_rate,
        kpi.sample.len()
    );

    AnalyticsReport {
        period,
        kpis: kpi.summary,
        histogram,
        percentiles,
        trend: build_trend(all, ctx),
        heatmap: build_heatmap(&filtered, ctx),
        funnel: build_funnel(&filtered),
        category_trend: build_category_trend(all, ctx),
        hotspots: rank_hotspots(&filtered),
        reporter_quality: score_reporters(&filtered, &snapshot.users),
        categories: category_shares(&filtered),
        severity_breakdown: severity_breakdown(&filtered),
        status_counts: status_counts(&filtered),
        case_stages: case_stages(&filtered),
        unactioned: unactioned_cases(&filtered, ctx),
        incoming: incoming_cases(&filtered, ctx),
        recently_closed: recently_closed(&filtered),
        data_quality: DataQuality {
            total_records: prepared.quality.total_records + snapshot.malformed_incidents,
            malformed_records: snapshot.malformed_incidents,
            ..prepared.quality
        },
    }
}
