//! Dashboard settings from an optional TOML file merged with command-line
//! flags.
//!
//! ```toml
//! period = "7d"
//! utc_offset_minutes = -300
//! pretty = true
//! incidents = "snapshots/incidents.json"
//! users = "snapshots/users.json"
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use safesignal_analytics::context::parse_reference_instant;
use safesignal_analytics::period::resolve_period;
use safesignal_analytics_models::Period;
use serde::Deserialize;

use crate::CliError;

/// Contents of a dashboard config file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Period tag (`7d`, `30d`, `90d`, `1y`).
    pub period: String,
    /// Offset from UTC used for local bucketing, in minutes.
    pub utc_offset_minutes: Option<i32>,
    /// Pretty-print the JSON report.
    pub pretty: bool,
    /// Incident snapshot path.
    pub incidents: Option<PathBuf>,
    /// User snapshot path.
    pub users: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            period: default_period(),
            utc_offset_minutes: None,
            pretty: false,
            incidents: None,
            users: None,
        }
    }
}

fn default_period() -> String {
    Period::default().to_string()
}

impl DashboardConfig {
    /// Parses a config document.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if the document is not valid TOML of
    /// the expected shape.
    pub fn from_toml(contents: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Io`] if the file cannot be read, or
    /// [`CliError::Config`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        log::debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }
}

/// Values given on the command line for the `report` subcommand.
#[derive(Debug, Clone, Default)]
pub struct ReportArgs {
    pub incidents: Option<PathBuf>,
    pub users: Option<PathBuf>,
    pub period: Option<String>,
    pub now: Option<String>,
    pub utc_offset: Option<i32>,
    pub pretty: bool,
}

/// Fully resolved settings for one report run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub incidents: PathBuf,
    pub users: Option<PathBuf>,
    pub period: Period,
    /// Explicit reference instant, if any. The system clock otherwise.
    pub now: Option<DateTime<Utc>>,
    /// Explicit offset, if any. The machine's local offset otherwise.
    pub offset: Option<FixedOffset>,
    pub pretty: bool,
}

fn resolve_offset(minutes: i32) -> Result<FixedOffset, CliError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or(CliError::InvalidOffset { minutes })
}

impl Settings {
    /// Merges flags over the config file. Flags win.
    ///
    /// # Errors
    ///
    /// * [`CliError::MissingIncidents`] if neither source names an
    ///   incident file
    /// * [`CliError::InvalidOffset`] if the offset is out of range
    /// * [`CliError::Analytics`] if `--now` is not a valid timestamp
    pub fn resolve(args: ReportArgs, config: DashboardConfig) -> Result<Self, CliError> {
        let incidents = args
            .incidents
            .or(config.incidents)
            .ok_or(CliError::MissingIncidents)?;
        let period = resolve_period(args.period.as_deref().unwrap_or(&config.period));
        let offset = args
            .utc_offset
            .or(config.utc_offset_minutes)
            .map(resolve_offset)
            .transpose()?;
        let now = args
            .now
            .as_deref()
            .map(parse_reference_instant)
            .transpose()?;

        Ok(Self {
            incidents,
            users: args.users.or(config.users),
            period,
            now,
            offset,
            pretty: args.pretty || config.pretty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.period, "30d");
    }

    #[test]
    fn parses_all_keys() {
        let config = DashboardConfig::from_toml(
            r#"
            period = "7d"
            utc_offset_minutes = -300
            pretty = true
            incidents = "data/incidents.json"
            users = "data/users.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.period, "7d");
        assert_eq!(config.utc_offset_minutes, Some(-300));
        assert!(config.pretty);
        assert_eq!(config.incidents, Some(PathBuf::from("data/incidents.json")));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            DashboardConfig::from_toml("colour = \"blue\""),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn flags_override_file() {
        let config = DashboardConfig {
            period: "90d".to_string(),
            utc_offset_minutes: Some(60),
            incidents: Some(PathBuf::from("file.json")),
            ..DashboardConfig::default()
        };
        let args = ReportArgs {
            incidents: Some(PathBuf::from("flag.json")),
            period: Some("1y".to_string()),
            utc_offset: Some(-120),
            now: Some("2025-06-18T12:00:00Z".to_string()),
            ..ReportArgs::default()
        };
        let settings = Settings::resolve(args, config).unwrap();

        assert_eq!(settings.incidents, PathBuf::from("flag.json"));
        assert_eq!(settings.period, Period::Year);
        assert_eq!(settings.offset, FixedOffset::west_opt(7200));
        assert_eq!(
            settings.now.map(|n| n.to_rfc3339()),
            Some("2025-06-18T12:00:00+00:00".to_string())
        );
    }

    #[test]
    fn file_values_fill_missing_flags() {
        let config = DashboardConfig {
            period: "7d".to_string(),
            pretty: true,
            incidents: Some(PathBuf::from("file.json")),
            users: Some(PathBuf::from("users.json")),
            ..DashboardConfig::default()
        };
        let settings = Settings::resolve(ReportArgs::default(), config).unwrap();

        assert_eq!(settings.incidents, PathBuf::from("file.json"));
        assert_eq!(settings.users, Some(PathBuf::from("users.json")));
        assert_eq!(settings.period, Period::Week);
        assert!(settings.pretty);
        assert_eq!(settings.now, None);
        assert_eq!(settings.offset, None);
    }

    #[test]
    fn unknown_period_falls_back() {
        let args = ReportArgs {
            incidents: Some(PathBuf::from("a.json")),
            period: Some("2w".to_string()),
            ..ReportArgs::default()
        };
        let settings = Settings::resolve(args, DashboardConfig::default()).unwrap();
        assert_eq!(settings.period, Period::Month);
    }

    #[test]
    fn resolution_errors() {
        assert!(matches!(
            Settings::resolve(ReportArgs::default(), DashboardConfig::default()),
            Err(CliError::MissingIncidents)
        ));

        let bad_offset = ReportArgs {
            incidents: Some(PathBuf::from("a.json")),
            utc_offset: Some(24 * 60),
            ..ReportArgs::default()
        };
        assert!(matches!(
            Settings::resolve(bad_offset, DashboardConfig::default()),
            Err(CliError::InvalidOffset { minutes: 1440 })
        ));

        let bad_now = ReportArgs {
            incidents: Some(PathBuf::from("a.json")),
            now: Some("yesterday".to_string()),
            ..ReportArgs::default()
        };
        assert!(matches!(
            Settings::resolve(bad_now, DashboardConfig::default()),
            Err(CliError::Analytics(_))
        ));
    }
}
