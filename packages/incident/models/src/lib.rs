#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident and user record types for the moderation dashboard.
//!
//! These records arrive from the backend REST layer and are treated as
//! read-only snapshots. Status, severity and category are kept as the raw
//! strings the backend sent; the typed accessors map them onto the
//! canonical taxonomy defined here.

use std::str::FromStr as _;

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Workflow status of an incident report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncidentStatus {
    /// Freshly submitted, waiting for moderation
    Submitted,
    /// Picked up by a moderator
    InReview,
    /// Confirmed by a moderator and handed to law enforcement
    Verified,
    /// A unit has been dispatched
    Dispatched,
    /// A unit is on scene
    OnScene,
    /// Under active investigation
    Investigating,
    /// Closed by law enforcement
    PoliceClosed,
    /// Rejected during moderation
    Rejected,
    /// Published to the public feed
    Published,
    /// Resolved without a police case
    Resolved,
    /// Archived after closure
    Archived,
    /// Merged into a duplicate report
    Merged,
    /// Unsubmitted draft
    Draft,
}

impl IncidentStatus {
    /// Whether a moderator has acted on the report (verified or any later stage).
    #[must_use]
    pub const fn is_actioned(self) -> bool {
        matches!(
            self,
            Self::Verified
                | Self::Dispatched
                | Self::OnScene
                | Self::Investigating
                | Self::PoliceClosed
                | Self::Published
                | Self::Resolved
                | Self::Archived
        )
    }

    /// Whether the incident has reached a terminal closed state.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::PoliceClosed | Self::Resolved | Self::Archived)
    }

    /// Whether a unit was dispatched at some point.
    #[must_use]
    pub const fn is_dispatched_or_later(self) -> bool {
        matches!(self, Self::Dispatched) || self.is_on_scene_or_later()
    }

    /// Whether a unit reached the scene at some point.
    #[must_use]
    pub const fn is_on_scene_or_later(self) -> bool {
        matches!(self, Self::OnScene | Self::Investigating) || self.is_closed()
    }

    /// Whether the incident is an open law-enforcement case.
    #[must_use]
    pub const fn is_active_case(self) -> bool {
        matches!(
            self,
            Self::Verified | Self::Dispatched | Self::OnScene | Self::Investigating
        )
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Submitted,
            Self::InReview,
            Self::Verified,
            Self::Dispatched,
            Self::OnScene,
            Self::Investigating,
            Self::PoliceClosed,
            Self::Rejected,
            Self::Published,
            Self::Resolved,
            Self::Archived,
            Self::Merged,
            Self::Draft,
        ]
    }
}

/// Reported severity of an incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncidentSeverity {
    /// Minor, no immediate risk
    Low,
    /// Needs attention within the shift
    Medium,
    /// Needs prompt attention
    High,
    /// Immediate danger to life or property
    Critical,
}

impl IncidentSeverity {
    /// Returns the variants ordered from most to least severe.
    #[must_use]
    pub const fn descending() -> &'static [Self] {
        &[Self::Critical, Self::High, Self::Medium, Self::Low]
    }
}

/// Known incident categories, in dashboard display order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncidentCategory {
    /// Theft of property
    Theft,
    /// Physical assault
    Assault,
    /// Damage to property
    Vandalism,
    /// Suspicious person or activity
    SuspiciousActivity,
    /// Road traffic incident
    TrafficIncident,
    /// Noise complaint
    NoiseComplaint,
    /// Fire
    Fire,
    /// Medical emergency
    MedicalEmergency,
    /// Environmental or public hazard
    Hazard,
    /// Anything else, including missing or unknown categories
    Other,
}

impl IncidentCategory {
    /// Short human-readable label used on the dashboard.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Theft => "Theft",
            Self::Assault => "Assault",
            Self::Vandalism => "Vandalism",
            Self::SuspiciousActivity => "Suspicious",
            Self::TrafficIncident => "Traffic",
            Self::NoiseComplaint => "Noise",
            Self::Fire => "Fire",
            Self::MedicalEmergency => "Medical",
            Self::Hazard => "Hazard",
            Self::Other => "Other",
        }
    }

    /// Returns all variants of this enum in declaration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Theft,
            Self::Assault,
            Self::Vandalism,
            Self::SuspiciousActivity,
            Self::TrafficIncident,
            Self::NoiseComplaint,
            Self::Fire,
            Self::MedicalEmergency,
            Self::Hazard,
            Self::Other,
        ]
    }
}

/// Category tag used when an incident has none.
pub const FALLBACK_CATEGORY: &str = "other";

/// An incident report as served by the backend.
///
/// Timestamps are kept as strings; the analytics layer parses and
/// validates them so that one malformed record cannot fail a whole
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Backend primary key.
    #[serde(deserialize_with = "deserialize_id")]
    pub incident_id: String,
    /// Creation timestamp (ISO 8601). Empty when missing or null.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    /// Last-updated timestamp (ISO 8601). Empty when missing or null.
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
    /// Raw workflow status string.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Raw category tag.
    #[serde(default)]
    pub category: Option<String>,
    /// Raw severity tag.
    #[serde(default)]
    pub severity: Option<String>,
    /// Free-text location label.
    #[serde(default)]
    pub location_name: Option<String>,
    /// Reporting user's identifier.
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub reporter_id: Option<String>,
    /// Report title.
    #[serde(default)]
    pub title: Option<String>,
    /// Whether the report is an unsubmitted draft.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_draft: bool,
}

impl IncidentRecord {
    /// Parses the raw status string, `None` if unrecognized.
    #[must_use]
    pub fn status(&self) -> Option<IncidentStatus> {
        IncidentStatus::from_str(&self.status).ok()
    }

    /// Parses the raw severity string, `None` if missing or unrecognized.
    #[must_use]
    pub fn severity(&self) -> Option<IncidentSeverity> {
        self.severity
            .as_deref()
            .and_then(|s| IncidentSeverity::from_str(s).ok())
    }

    /// Category tag with the `"other"` fallback applied to missing or
    /// empty values.
    #[must_use]
    pub fn category_tag(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => FALLBACK_CATEGORY,
        }
    }

    /// Maps the category onto the known taxonomy. Unknown tags map to
    /// [`IncidentCategory::Other`].
    #[must_use]
    pub fn category(&self) -> IncidentCategory {
        IncidentCategory::from_str(self.category_tag()).unwrap_or(IncidentCategory::Other)
    }

    /// Whether the status is in the actioned set.
    #[must_use]
    pub fn is_actioned(&self) -> bool {
        self.status().is_some_and(IncidentStatus::is_actioned)
    }

    /// Whether the status is in the closed set.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status().is_some_and(IncidentStatus::is_closed)
    }

    /// Reporter id, ignoring empty strings.
    #[must_use]
    pub fn reporter(&self) -> Option<&str> {
        self.reporter_id.as_deref().filter(|r| !r.is_empty())
    }
}

/// A platform user, used only for reporter name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Backend primary key.
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    /// Display handle.
    #[serde(default)]
    pub username: Option<String>,
}

/// Backend ids show up as both JSON numbers and strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

impl From<RawId> for String {
    fn from(value: RawId) -> Self {
        match value {
            RawId::Int(i) => i.to_string(),
            RawId::Str(s) => s,
        }
    }
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn deserialize_opt_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|id| id.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: &str) -> IncidentRecord {
        IncidentRecord {
            incident_id: "1".to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:30:00Z".to_string(),
            status: status.to_string(),
            category: None,
            severity: None,
            location_name: None,
            reporter_id: None,
            title: None,
            is_draft: false,
        }
    }

    #[test]
    fn status_sets_are_nested() {
        for status in IncidentStatus::all() {
            if status.is_closed() {
                assert!(status.is_on_scene_or_later(), "{status} closed but not on scene");
            }
            if status.is_on_scene_or_later() {
                assert!(status.is_dispatched_or_later(), "{status} on scene but not dispatched");
            }
            if status.is_dispatched_or_later() {
                assert!(status.is_actioned(), "{status} dispatched but not actioned");
            }
        }
    }

    #[test]
    fn published_is_actioned_but_not_dispatched() {
        assert!(IncidentStatus::Published.is_actioned());
        assert!(!IncidentStatus::Published.is_dispatched_or_later());
    }

    #[test]
    fn status_round_trips_through_snake_case() {
        assert_eq!(
            IncidentStatus::from_str("police_closed").unwrap(),
            IncidentStatus::PoliceClosed
        );
        assert_eq!(IncidentStatus::OnScene.as_ref(), "on_scene");
        assert!(IncidentStatus::from_str("nonsense").is_err());
    }

    #[test]
    fn unknown_status_matches_no_set() {
        let r = record("escalated");
        assert!(r.status().is_none());
        assert!(!r.is_actioned());
        assert!(!r.is_closed());
    }

    #[test]
    fn missing_category_falls_back_to_other() {
        let mut r = record("verified");
        assert_eq!(r.category_tag(), "other");
        assert_eq!(r.category(), IncidentCategory::Other);

        r.category = Some(String::new());
        assert_eq!(r.category_tag(), "other");

        r.category = Some("graffiti".to_string());
        assert_eq!(r.category_tag(), "graffiti");
        assert_eq!(r.category(), IncidentCategory::Other);

        r.category = Some("medical_emergency".to_string());
        assert_eq!(r.category(), IncidentCategory::MedicalEmergency);
    }

    #[test]
    fn deserializes_numeric_and_string_ids() {
        let json = r#"[
            {"incident_id": 42, "created_at": "2025-01-01T00:00:00Z",
             "updated_at": "2025-01-01T00:00:00Z", "status": "submitted",
             "reporter_id": 7},
            {"incident_id": "abc", "created_at": "2025-01-01T00:00:00Z",
             "updated_at": "2025-01-01T00:00:00Z", "status": "draft",
             "reporter_id": null, "is_draft": true}
        ]"#;
        let records: Vec<IncidentRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].incident_id, "42");
        assert_eq!(records[0].reporter(), Some("7"));
        assert!(!records[0].is_draft);
        assert_eq!(records[1].incident_id, "abc");
        assert_eq!(records[1].reporter(), None);
        assert!(records[1].is_draft);
    }

    #[test]
    fn null_and_missing_fields_take_defaults() {
        let json = r#"[
            {"incident_id": 1, "created_at": null, "status": null, "is_draft": null},
            {"incident_id": 2}
        ]"#;
        let records: Vec<IncidentRecord> = serde_json::from_str(json).unwrap();
        for r in &records {
            assert_eq!(r.created_at, "");
            assert_eq!(r.updated_at, "");
            assert_eq!(r.status, "");
            assert!(r.status().is_none());
            assert!(!r.is_draft);
        }
    }

    #[test]
    fn category_labels_cover_all_variants() {
        for cat in IncidentCategory::all() {
            assert!(!cat.label().is_empty());
        }
        assert_eq!(IncidentCategory::all().len(), 10);
    }
}
