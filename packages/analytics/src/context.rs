//! Reference instant, timestamp parsing and per-record validation.
//!
//! Every time-windowed stage reads "now" and the local UTC offset from an
//! [`AnalysisContext`] instead of the system clock, so a report can be
//! replayed exactly. Records are validated once here; stages only ever
//! see [`ValidIncident`]s.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset as _, Utc};
use safesignal_analytics_models::DataQuality;
use safesignal_incident_models::IncidentRecord;

use crate::AnalyticsError;

/// The instant and local offset an analysis pass is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisContext {
    /// Reference instant all rolling windows end at.
    pub now: DateTime<Utc>,
    /// Offset used for weekday/hour bucketing and date labels.
    pub offset: FixedOffset,
}

impl AnalysisContext {
    /// Creates a context for an explicit instant and offset.
    #[must_use]
    pub const fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Creates a context that buckets in UTC.
    #[must_use]
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }

    /// Reads the system clock and the machine's local offset.
    #[must_use]
    pub fn current() -> Self {
        let local = Local::now();
        Self::new(local.with_timezone(&Utc), *local.offset())
    }

    /// Converts an instant to local time.
    #[must_use]
    pub fn local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }
}

/// Parses a backend timestamp.
///
/// Accepts RFC 3339, Postgres-style `YYYY-MM-DD HH:MM:SS[.f]+HH[:MM]`, and
/// naive ISO 8601 (with `T` or a space), which is taken as UTC.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Parses a timestamp supplied on the command line or in config.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidTimestamp`] if `s` is not a
/// recognized timestamp.
pub fn parse_reference_instant(s: &str) -> Result<DateTime<Utc>, AnalyticsError> {
    parse_timestamp(s).ok_or_else(|| AnalyticsError::InvalidTimestamp {
        value: s.to_string(),
    })
}

/// An incident whose creation timestamp parsed.
#[derive(Debug, Clone, Copy)]
pub struct ValidIncident<'a> {
    /// The underlying record.
    pub record: &'a IncidentRecord,
    /// Parsed creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Parsed update timestamp, `None` if unparseable.
    pub updated_at: Option<DateTime<Utc>>,
}

impl ValidIncident<'_> {
    /// Minutes between creation and last update, `None` when the update
    /// timestamp is unusable.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn response_minutes(&self) -> Option<f64> {
        self.updated_at
            .map(|updated| (updated - self.created_at).num_milliseconds() as f64 / 60_000.0)
    }
}

/// Non-draft, validated incidents plus the counters describing what was
/// dropped on the way.
#[derive(Debug, Clone)]
pub struct PreparedIncidents<'a> {
    /// Incidents usable by every stage.
    pub incidents: Vec<ValidIncident<'a>>,
    /// Validation counters.
    pub quality: DataQuality,
}

/// Strips drafts and validates timestamps.
///
/// A record whose `created_at` does not parse cannot be placed in any
/// window and is skipped entirely. A record whose `updated_at` does not
/// parse is kept for counting but contributes no response time.
#[must_use]
pub fn prepare(records: &[IncidentRecord]) -> PreparedIncidents<'_> {
    let mut quality = DataQuality {
        total_records: records.len() as u64,
        ..DataQuality::default()
    };
    let mut incidents = Vec::with_capacity(records.len());

    for record in records {
        if record.is_draft {
            quality.drafts += 1;
            continue;
        }

        let Some(created_at) = parse_timestamp(&record.created_at) else {
            log::warn!(
                "Skipping incident {}: unparseable created_at '{}'",
                record.incident_id,
                record.created_at
            );
            quality.invalid_created_at += 1;
            continue;
        };

        let updated_at = parse_timestamp(&record.updated_at);
        if updated_at.is_none() {
            log::warn!(
                "Incident {} has unparseable updated_at '{}', excluding from response times",
                record.incident_id,
                record.updated_at
            );
            quality.invalid_updated_at += 1;
        }

        incidents.push(ValidIncident {
            record,
            created_at,
            updated_at,
        });
    }

    PreparedIncidents { incidents, quality }
}
