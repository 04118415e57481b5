//! Response-time, SLA and resolution KPIs.
//!
//! Also produces the bounded, sorted [`ResponseSample`] that the
//! distribution stage consumes, so the histogram and percentiles always
//! describe exactly the values the KPIs were computed from.

use safesignal_analytics_models::KpiSummary;

use crate::context::ValidIncident;
use crate::numeric::{mean, percent, round_u64};

/// Action target in minutes.
pub const SLA_MINUTES: f64 = 30.0;

/// Responses at or beyond this many minutes (7 days) are treated as stale
/// and left out of the sample.
pub const MAX_RESPONSE_MINUTES: f64 = 10_080.0;

const MINUTES_PER_DAY: f64 = 1_440.0;

/// Response times of actioned incidents in minutes, restricted to
/// `(0, MAX_RESPONSE_MINUTES)` and sorted ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseSample(Vec<f64>);

impl ResponseSample {
    /// Builds the sample from actioned incidents.
    #[must_use]
    pub fn from_incidents(incidents: &[ValidIncident<'_>]) -> Self {
        let mut values: Vec<f64> = incidents
            .iter()
            .filter(|i| i.record.is_actioned())
            .filter_map(ValidIncident::response_minutes)
            .filter(|&m| m > 0.0 && m < MAX_RESPONSE_MINUTES)
            .collect();
        values.sort_by(f64::total_cmp);
        Self(values)
    }

    /// Sorted values.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of sampled responses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was sampled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Nearest-rank-below percentile: `sample[floor(rank/100 * (n-1))]`,
    /// 0 for an empty sample.
    #[must_use]
    pub fn percentile(&self, rank: u8) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        let rank = usize::from(rank.min(100));
        self.0[rank * (self.0.len() - 1) / 100]
    }
}

/// KPI summary plus the sample it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiOutcome {
    /// Headline figures.
    pub summary: KpiSummary,
    /// Shared response-time sample.
    pub sample: ResponseSample,
}

/// Computes the KPI row for the period-filtered incidents.
#[must_use]
pub fn compute_kpis(incidents: &[ValidIncident<'_>]) -> KpiOutcome {
    let sample = ResponseSample::from_incidents(incidents);
    let closed: Vec<&ValidIncident<'_>> =
        incidents.iter().filter(|i| i.record.is_closed()).collect();

    let sampled = sample.len() as u64;
    let sla_compliant = sample.as_slice().iter().filter(|&&m| m <= SLA_MINUTES).count() as u64;

    let days_to_close: Vec<f64> = closed
        .iter()
        .filter_map(|i| i.response_minutes())
        .map(|m| m / MINUTES_PER_DAY)
        .filter(|&d| d > 0.0)
        .collect();
    let avg_time_to_close =
        mean(&days_to_close).map_or_else(|| "0".to_string(), |d| format!("{d:.1}"));

    let summary = KpiSummary {
        avg_response: mean(sample.as_slice()).map_or(0, round_u64),
        sla_rate: percent(sla_compliant, sampled),
        resolution_rate: percent(closed.len() as u64, incidents.len() as u64),
        avg_time_to_close,
        sla_compliant,
        sla_breached: sampled - sla_compliant,
        closed_count: closed.len() as u64,
        sample_size: sampled,
        total_incidents: incidents.len() as u64,
    };

    KpiOutcome { summary, sample }
}
