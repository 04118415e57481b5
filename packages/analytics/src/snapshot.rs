//! Loading an incident/user snapshot from JSON.
//!
//! The fetch layer hands over one consistent snapshot per analysis pass.
//! Each document may be a bare array or an object wrapping the array
//! under `incidents`, `users` or `data`.

use std::path::Path;

use safesignal_incident_models::{IncidentRecord, UserRecord};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::AnalyticsError;

/// Keys an object-shaped document may wrap its records under.
const WRAPPER_KEYS: [&str; 3] = ["incidents", "users", "data"];

/// Incidents and users captured at the same fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Incident records, drafts included.
    pub incidents: Vec<IncidentRecord>,
    /// User records for reporter name resolution.
    pub users: Vec<UserRecord>,
    /// Incident entries that did not match the record shape and were
    /// skipped.
    pub malformed_incidents: u64,
}

fn shape_error() -> AnalyticsError {
    AnalyticsError::Json(<serde_json::Error as serde::de::Error>::custom(
        "expected a JSON array, or an object wrapping one under `incidents`, `users` or `data`",
    ))
}

fn document_entries(json: &str) -> Result<Vec<Value>, AnalyticsError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut map) => WRAPPER_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(entries)) => Some(entries),
                _ => None,
            })
            .ok_or_else(shape_error),
        _ => Err(shape_error()),
    }
}

/// Parses each entry on its own. Entries that do not match `T` are
/// logged and counted instead of failing the document.
fn parse_document<T: DeserializeOwned>(json: &str, kind: &str) -> Result<(Vec<T>, u64), AnalyticsError> {
    let mut items = Vec::new();
    let mut skipped = 0;
    for (index, entry) in document_entries(json)?.into_iter().enumerate() {
        match serde_json::from_value(entry) {
            Ok(item) => items.push(item),
            Err(e) => {
                log::warn!("Skipping malformed {kind} record at index {index}: {e}");
                skipped += 1;
            }
        }
    }
    Ok((items, skipped))
}

fn read_file(path: &Path) -> Result<String, AnalyticsError> {
    std::fs::read_to_string(path).map_err(|source| AnalyticsError::Io {
        path: path.display().to_string(),
        source,
    })
}

impl Snapshot {
    /// Parses the incident document and, if given, the user document.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Json`] if either document is not valid
    /// JSON, or is neither an array nor an object wrapping one. Individual
    /// entries that do not parse are skipped, not errors.
    pub fn from_json(incidents_json: &str, users_json: Option<&str>) -> Result<Self, AnalyticsError> {
        let (incidents, malformed_incidents) =
            parse_document::<IncidentRecord>(incidents_json, "incident")?;
        let users = match users_json {
            Some(json) => parse_document::<UserRecord>(json, "user")?.0,
            None => Vec::new(),
        };
        Ok(Self {
            incidents,
            users,
            malformed_incidents,
        })
    }

    /// Reads and parses snapshot files.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Io`] if a file cannot be read, or
    /// [`AnalyticsError::Json`] if its contents do not parse.
    pub fn load(incidents_path: &Path, users_path: Option<&Path>) -> Result<Self, AnalyticsError> {
        let incidents_json = read_file(incidents_path)?;
        let users_json = users_path.map(read_file).transpose()?;
        let snapshot = Self::from_json(&incidents_json, users_json.as_deref())?;
        log::info!(
            "Loaded {} incidents and {} users from {}",
            snapshot.incidents.len(),
            snapshot.users.len(),
            incidents_path.display()
        );
        Ok(snapshot)
    }
}
