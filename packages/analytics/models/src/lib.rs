#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate result types for the dashboard analytics view.
//!
//! Every type here is derived from an incident snapshot on each analysis
//! pass and never persisted. All rates are whole percentages in `0..=100`
//! and every `max` field used as a divisor is floored at 1.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Rolling reporting window selected on the dashboard.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Period {
    /// Last 7 days.
    #[serde(rename = "7d")]
    #[strum(serialize = "7d")]
    Week,
    /// Last 30 days.
    #[default]
    #[serde(rename = "30d")]
    #[strum(serialize = "30d")]
    Month,
    /// Last 90 days.
    #[serde(rename = "90d")]
    #[strum(serialize = "90d")]
    Quarter,
    /// Last 365 days.
    #[serde(rename = "1y")]
    #[strum(serialize = "1y")]
    Year,
}

impl Period {
    /// Window length in days.
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
            Self::Year => 365,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Week, Self::Month, Self::Quarter, Self::Year]
    }
}

/// Headline response and resolution figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    /// Mean response time in whole minutes.
    pub avg_response: u64,
    /// Share of sampled responses within the SLA target.
    pub sla_rate: u8,
    /// Share of period incidents in a closed state.
    pub resolution_rate: u8,
    /// Mean days from creation to closure, one decimal.
    pub avg_time_to_close: String,
    /// Sampled responses within the SLA target.
    pub sla_compliant: u64,
    /// Sampled responses over the SLA target.
    pub sla_breached: u64,
    /// Closed incidents in the period.
    pub closed_count: u64,
    /// Number of response times in the bounded sample.
    pub sample_size: u64,
    /// Incidents in the period.
    pub total_incidents: u64,
}

/// One bar of the response-time histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBucket {
    /// Display label (e.g. `"15-30m"`).
    pub label: String,
    /// Inclusive lower bound in minutes.
    pub min_minutes: u32,
    /// Exclusive upper bound in minutes, `None` for the open-ended bucket.
    pub max_minutes: Option<u32>,
    /// Responses falling in this bucket.
    pub count: u64,
}

/// Response-time histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    /// Buckets in ascending order.
    pub buckets: Vec<HistogramBucket>,
    /// Largest bucket count, at least 1.
    pub max: u64,
}

/// Unit a formatted duration is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DurationUnit {
    /// Whole minutes.
    #[strum(serialize = "min")]
    #[serde(rename = "min")]
    Minutes,
    /// Hours with one decimal.
    #[strum(serialize = "hr")]
    #[serde(rename = "hr")]
    Hours,
}

/// A response-time percentile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Percentile {
    /// Label such as `"P50"`.
    pub label: String,
    /// Percentile rank (25, 50, 75, 90).
    pub rank: u8,
    /// Raw value in minutes, 0 for an empty sample.
    pub minutes: f64,
    /// Formatted value in `unit`.
    pub value: String,
    /// Display unit of `value`.
    pub unit: DurationUnit,
}

/// Daily report counts over the trailing 30 days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendLine {
    /// Counts, oldest day first.
    pub counts: Vec<u64>,
    /// Largest daily count, at least 1.
    pub max: u64,
    /// Sum of all daily counts.
    pub total: u64,
    /// Index of the first day holding the largest count.
    pub peak_index: usize,
    /// Local calendar date of the peak day.
    pub peak_date: NaiveDate,
    /// Short label for the peak day (e.g. `"Mon 5"`).
    pub peak_label: String,
}

/// Busiest cell of the weekday/hour heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapPeak {
    /// Row index, Monday = 0.
    pub day: usize,
    /// Column index, hour of day.
    pub hour: usize,
    /// Incidents in the cell.
    pub count: u64,
    /// Short weekday label.
    pub day_label: String,
}

/// Weekday by hour-of-day incident grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heatmap {
    /// Seven rows (Monday first) of 24 hourly counts.
    pub grid: Vec<Vec<u64>>,
    /// Largest cell value, at least 1.
    pub max: u64,
    /// First cell holding the largest count.
    pub peak: HeatmapPeak,
}

/// One stage of the case resolution funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStage {
    /// Stage name.
    pub label: String,
    /// Incidents that reached this stage.
    pub count: u64,
    /// Share of received incidents that reached this stage.
    pub pct_of_received: u8,
    /// Percentage lost since the previous stage, absent for the first
    /// stage or when the previous stage is empty.
    pub drop_from_previous: Option<u8>,
}

/// Case resolution funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funnel {
    /// Stages in workflow order.
    pub stages: Vec<FunnelStage>,
    /// Verified to Dispatched drop, present when anything was verified.
    pub dispatch_backlog_pct: Option<u8>,
}

/// Weekly counts for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrendSeries {
    /// Category tag.
    pub category: String,
    /// Display label.
    pub label: String,
    /// Counts for four weeks ago, three, two, and this week.
    pub weeks: [u64; 4],
}

/// Four-week category trend matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrend {
    /// One series per known category, in declaration order.
    pub series: Vec<CategoryTrendSeries>,
    /// Largest weekly count across all series, at least 1.
    pub max: u64,
    /// Categories with any non-zero week, at most six.
    pub active: Vec<String>,
}

/// Activity tier of a hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HotspotTier {
    /// Eight or more incidents.
    Critical,
    /// Five to seven incidents.
    Active,
    /// Fewer than five incidents.
    Low,
}

/// A location with repeated incidents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    /// Location label, truncated for display.
    pub name: String,
    /// Incidents at this location.
    pub count: u64,
    /// Volume relative to the top hotspot.
    pub pct: u8,
    /// Activity tier.
    pub tier: HotspotTier,
}

/// Quality band of a reporter's accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QualityTier {
    /// 75% or more of reports were valid.
    Good,
    /// 40% to 74%.
    Moderate,
    /// Below 40%, needs review.
    Poor,
}

/// Accuracy of a frequent reporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterQuality {
    /// Reporter user id.
    pub id: String,
    /// Resolved display name.
    pub name: String,
    /// First two characters of the name, uppercased.
    pub initials: String,
    /// Reports submitted in the period.
    pub total: u64,
    /// Reports that were actioned.
    pub valid: u64,
    /// `valid / total` as a whole percentage.
    pub accuracy: u8,
    /// Quality band.
    pub tier: QualityTier,
}

/// A category's share of period incidents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    /// Raw category tag.
    pub category: String,
    /// Incidents in this category.
    pub count: u64,
    /// Volume relative to the top category.
    pub pct: u8,
}

/// Count of active cases at one severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCount {
    /// Severity tag.
    pub severity: String,
    /// Active cases at this severity.
    pub count: u64,
}

/// Count of incidents with one raw status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    /// Raw status string.
    pub status: String,
    /// Incidents with this status.
    pub count: u64,
}

/// Law-enforcement case counts by stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStages {
    /// Counts for verified, dispatched, on scene, investigating and
    /// police closed.
    pub stages: Vec<StatusCount>,
    /// Largest stage count, at least 1.
    pub max: u64,
    /// Open cases (all stages except police closed).
    pub active_count: u64,
}

/// A verified case in the law-enforcement queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedCase {
    /// Incident id.
    pub incident_id: String,
    /// Title, or `"Case #<id>"`.
    pub title: String,
    /// Whole minutes since creation, 0 for future timestamps.
    pub minutes_waiting: u64,
}

/// A case recently closed by law enforcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedCase {
    /// Incident id.
    pub incident_id: String,
    /// Title, or `"Case #<id>"`.
    pub title: String,
    /// Last update, or creation when the update timestamp is unusable.
    pub closed_at: DateTime<Utc>,
}

/// Records that could not take part in every stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    /// Records in the snapshot, malformed entries included.
    pub total_records: u64,
    /// Entries skipped because they did not match the record shape.
    pub malformed_records: u64,
    /// Drafts removed before analysis.
    pub drafts: u64,
    /// Records skipped for an unparseable creation timestamp.
    pub invalid_created_at: u64,
    /// Records kept but excluded from response samples for an
    /// unparseable update timestamp.
    pub invalid_updated_at: u64,
}

/// Everything the analytics view renders for one snapshot and period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// Selected period.
    pub period: Period,
    /// Headline figures.
    pub kpis: KpiSummary,
    /// Response-time histogram.
    pub histogram: Histogram,
    /// P25, P50, P75 and P90 response times.
    pub percentiles: Vec<Percentile>,
    /// Trailing 30-day trend.
    pub trend: TrendLine,
    /// Weekday by hour grid.
    pub heatmap: Heatmap,
    /// Case resolution funnel.
    pub funnel: Funnel,
    /// Four-week category trend.
    pub category_trend: CategoryTrend,
    /// Top locations.
    pub hotspots: Vec<Hotspot>,
    /// Frequent reporters ranked by volume.
    pub reporter_quality: Vec<ReporterQuality>,
    /// Top categories in the period.
    pub categories: Vec<CategoryShare>,
    /// Active cases by severity.
    pub severity_breakdown: Vec<SeverityCount>,
    /// Incidents by raw status.
    pub status_counts: Vec<StatusCount>,
    /// Law-enforcement case stages.
    pub case_stages: CaseStages,
    /// Oldest verified cases past the action threshold.
    pub unactioned: Vec<QueuedCase>,
    /// Newest verified cases still within the action threshold.
    pub incoming: Vec<QueuedCase>,
    /// Most recently closed law-enforcement cases.
    pub recently_closed: Vec<ClosedCase>,
    /// Validation counters.
    pub data_quality: DataQuality,
}
