//! Weekday by hour-of-day heatmap.

use chrono::{Datelike as _, Timelike as _};
use safesignal_analytics_models::{Heatmap, HeatmapPeak};

use crate::context::{AnalysisContext, ValidIncident};
use crate::numeric::floored_max;

/// Row labels, Monday first.
pub const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const HOURS: usize = 24;

/// Buckets period incidents by local weekday (Monday = row 0) and hour.
#[must_use]
pub fn build_heatmap(incidents: &[ValidIncident<'_>], ctx: &AnalysisContext) -> Heatmap {
    let mut grid = vec![vec![0_u64; HOURS]; DAY_LABELS.len()];

    for incident in incidents {
        let local = ctx.local(incident.created_at);
        // Sunday-based weekday shifted so Monday is row 0.
        let row = (local.weekday().num_days_from_sunday() + 6) % 7;
        grid[row as usize][local.hour() as usize] += 1;
    }

    let mut peak = HeatmapPeak {
        day: 0,
        hour: 0,
        count: 0,
        day_label: DAY_LABELS[0].to_string(),
    };
    for (day, row) in grid.iter().enumerate() {
        for (hour, &count) in row.iter().enumerate() {
            if count > peak.count {
                peak = HeatmapPeak {
                    day,
                    hour,
                    count,
                    day_label: DAY_LABELS[day].to_string(),
                };
            }
        }
    }

    Heatmap {
        max: floored_max(grid.iter().flatten().copied()),
        grid,
        peak,
    }
}
