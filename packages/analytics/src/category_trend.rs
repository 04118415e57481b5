//! Four-week counts per known category.

use chrono::TimeDelta;
use safesignal_analytics_models::{CategoryTrend, CategoryTrendSeries};
use safesignal_incident_models::IncidentCategory;

use crate::context::{AnalysisContext, ValidIncident};
use crate::numeric::floored_max;

/// Week offsets in output order: four weeks ago first, this week last.
const WEEK_OFFSETS: [i64; 4] = [3, 2, 1, 0];

/// Most categories listed as active.
pub const MAX_ACTIVE_CATEGORIES: usize = 6;

/// Builds the category-by-week matrix over the full non-draft set.
///
/// Week offset `w` covers `[now - (w + 1) weeks, now - w weeks)`. Missing
/// or unrecognized categories count toward `other`.
#[must_use]
pub fn build_category_trend(
    incidents: &[ValidIncident<'_>],
    ctx: &AnalysisContext,
) -> CategoryTrend {
    let week = TimeDelta::weeks(1);
    let windows = WEEK_OFFSETS.map(|w| {
        let end = ctx.now - TimeDelta::weeks(w);
        (end - week, end)
    });

    let series: Vec<CategoryTrendSeries> = IncidentCategory::all()
        .iter()
        .map(|&category| {
            let weeks = windows.map(|(start, end)| {
                incidents
                    .iter()
                    .filter(|i| {
                        i.record.category() == category
                            && i.created_at >= start
                            && i.created_at < end
                    })
                    .count() as u64
            });
            CategoryTrendSeries {
                category: category.to_string(),
                label: category.label().to_string(),
                weeks,
            }
        })
        .collect();

    let active = series
        .iter()
        .filter(|s| s.weeks.iter().any(|&c| c > 0))
        .take(MAX_ACTIVE_CATEGORIES)
        .map(|s| s.category.clone())
        .collect();

    CategoryTrend {
        max: floored_max(series.iter().flat_map(|s| s.weeks)),
        series,
        active,
    }
}

#[cfg(test)]
mod tests {
    use safesignal_incident_models::IncidentRecord;

    use super::*;
    use crate::context::prepare;
    use crate::context::test_support::{incident, reference_now};

    fn with_category(id: u32, days_ago: i64, category: Option<&str>) -> IncidentRecord {
        IncidentRecord {
            category: category.map(str::to_string),
            ..incident(id, reference_now() - TimeDelta::days(days_ago), "submitted")
        }
    }

    fn weeks_of<'a>(trend: &'a CategoryTrend, category: &str) -> &'a [u64; 4] {
        &trend
            .series
            .iter()
            .find(|s| s.category == category)
            .unwrap()
            .weeks
    }

    #[test]
    fn only_week_offset_two() {
        let records = vec![
            with_category(1, 15, Some("fire")),
            with_category(2, 17, Some("fire")),
            with_category(3, 20, Some("fire")),
        ];
        let prepared = prepare(&records);
        let trend = build_category_trend(&prepared.incidents, &AnalysisContext::utc(reference_now()));

        assert_eq!(weeks_of(&trend, "fire"), &[0, 3, 0, 0]);
        assert_eq!(trend.active, ["fire"]);
        assert_eq!(trend.max, 3);
    }

    #[test]
    fn series_follow_declaration_order() {
        let trend = build_category_trend(&[], &AnalysisContext::utc(reference_now()));
        let tags: Vec<&str> = trend.series.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(
            tags,
            [
                "theft",
                "assault",
                "vandalism",
                "suspicious_activity",
                "traffic_incident",
                "noise_complaint",
                "fire",
                "medical_emergency",
                "hazard",
                "other"
            ]
        );
        assert_eq!(trend.max, 1);
        assert!(trend.active.is_empty());
    }

    #[test]
    fn week_boundaries() {
        let now = reference_now();
        let records = vec![
            IncidentRecord {
                category: Some("theft".to_string()),
                ..incident(1, now - TimeDelta::weeks(1), "submitted")
            },
            IncidentRecord {
                category: Some("theft".to_string()),
                ..incident(2, now - TimeDelta::weeks(4), "submitted")
            },
            IncidentRecord {
                category: Some("theft".to_string()),
                ..incident(3, now - TimeDelta::weeks(4) - TimeDelta::seconds(1), "submitted")
            },
            IncidentRecord {
                category: Some("theft".to_string()),
                ..incident(4, now, "submitted")
            },
        ];
        let prepared = prepare(&records);
        let trend = build_category_trend(&prepared.incidents, &AnalysisContext::utc(now));
        assert_eq!(weeks_of(&trend, "theft"), &[1, 0, 0, 1]);
    }

    #[test]
    fn missing_and_unknown_categories_count_as_other() {
        let records = vec![
            with_category(1, 1, None),
            with_category(2, 2, Some("graffiti")),
            with_category(3, 3, Some("")),
        ];
        let prepared = prepare(&records);
        let trend = build_category_trend(&prepared.incidents, &AnalysisContext::utc(reference_now()));
        assert_eq!(weeks_of(&trend, "other"), &[0, 0, 0, 3]);
    }

    #[test]
    fn active_is_capped_at_six() {
        let records: Vec<_> = IncidentCategory::all()
            .iter()
            .zip(0..)
            .map(|(c, id)| with_category(id, 2, Some(c.as_ref())))
            .collect();
        let prepared = prepare(&records);
        let trend = build_category_trend(&prepared.incidents, &AnalysisContext::utc(reference_now()));
        assert_eq!(
            trend.active,
            [
                "theft",
                "assault",
                "vandalism",
                "suspicious_activity",
                "traffic_incident",
                "noise_complaint"
            ]
        );
    }
}
