//! Response-time histogram and percentiles.
//!
//! Both read the [`ResponseSample`] produced by the KPI stage rather than
//! re-deriving it, so `sum(bucket counts) == sample.len()` always holds.

use safesignal_analytics_models::{DurationUnit, Histogram, HistogramBucket, Percentile};

use crate::kpi::ResponseSample;
use crate::numeric::{floored_max, round_u64};

struct BucketDef {
    label: &'static str,
    /// Exclusive upper bound in minutes; `None` is unbounded.
    max: Option<u32>,
}

const BUCKETS: &[BucketDef] = &[
    BucketDef { label: "0-5m", max: Some(5) },
    BucketDef { label: "5-15m", max: Some(15) },
    BucketDef { label: "15-30m", max: Some(30) },
    BucketDef { label: "30-60m", max: Some(60) },
    BucketDef { label: "1-2h", max: Some(120) },
    BucketDef { label: "2-4h", max: Some(240) },
    BucketDef { label: ">4h", max: None },
];

/// Percentile ranks shown on the response-time card.
pub const PERCENTILE_RANKS: [u8; 4] = [25, 50, 75, 90];

fn bucket_index(minutes: f64) -> Option<usize> {
    let mut lower = 0.0;
    for (i, bucket) in BUCKETS.iter().enumerate() {
        let fits = match bucket.max {
            Some(max) => minutes >= lower && minutes < f64::from(max),
            None => minutes >= lower,
        };
        if fits {
            return Some(i);
        }
        lower = bucket.max.map_or(lower, f64::from);
    }
    None
}

/// Buckets the sample into the fixed response-time ranges.
#[must_use]
pub fn build_histogram(sample: &ResponseSample) -> Histogram {
    let mut counts = vec![0_u64; BUCKETS.len()];
    for &minutes in sample.as_slice() {
        if let Some(idx) = bucket_index(minutes) {
            counts[idx] += 1;
        }
    }

    let mut lower = 0;
    let buckets: Vec<HistogramBucket> = BUCKETS
        .iter()
        .zip(&counts)
        .map(|(def, &count)| {
            let bucket = HistogramBucket {
                label: def.label.to_string(),
                min_minutes: lower,
                max_minutes: def.max,
                count,
            };
            lower = def.max.unwrap_or(lower);
            bucket
        })
        .collect();

    Histogram {
        max: floored_max(counts),
        buckets,
    }
}

/// Formats minutes for display: hours with one decimal from 60 minutes
/// up, whole minutes below.
#[must_use]
pub fn format_duration(minutes: f64) -> (String, DurationUnit) {
    if minutes >= 60.0 {
        (format!("{:.1}", minutes / 60.0), DurationUnit::Hours)
    } else {
        (round_u64(minutes).to_string(), DurationUnit::Minutes)
    }
}

/// P25, P50, P75 and P90 of the sample.
#[must_use]
pub fn build_percentiles(sample: &ResponseSample) -> Vec<Percentile> {
    PERCENTILE_RANKS
        .iter()
        .map(|&rank| {
            let minutes = sample.percentile(rank);
            let (value, unit) = format_duration(minutes);
            Percentile {
                label: format!("P{rank}"),
                rank,
                minutes,
                value,
                unit,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::context::prepare;
    use crate::context::test_support::{reference_now, responded};
    use crate::kpi::compute_kpis;

    fn sample_of(minutes: &[i64]) -> ResponseSample {
        let start = reference_now() - TimeDelta::days(2);
        let records: Vec<_> = minutes
            .iter()
            .zip(0..)
            .map(|(&m, id)| responded(id, start, m, "verified"))
            .collect();
        compute_kpis(&prepare(&records).incidents).sample
    }

    #[test]
    fn bucket_boundaries_are_upper_exclusive() {
        assert_eq!(bucket_index(0.5), Some(0));
        assert_eq!(bucket_index(5.0), Some(1));
        assert_eq!(bucket_index(14.99), Some(1));
        assert_eq!(bucket_index(30.0), Some(3));
        assert_eq!(bucket_index(239.0), Some(5));
        assert_eq!(bucket_index(240.0), Some(6));
        assert_eq!(bucket_index(10_000.0), Some(6));
    }

    #[test]
    fn forty_five_minute_sample_lands_in_one_bucket() {
        let histogram = build_histogram(&sample_of(&[45; 10]));
        let counts: Vec<u64> = histogram.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, [0, 0, 0, 10, 0, 0, 0]);
        assert_eq!(histogram.buckets[3].label, "30-60m");
        assert_eq!(histogram.max, 10);

        let p50 = &build_percentiles(&sample_of(&[45; 10]))[1];
        assert_eq!(p50.label, "P50");
        assert_eq!(p50.value, "45");
        assert_eq!(p50.unit, DurationUnit::Minutes);
    }

    #[test]
    fn histogram_conserves_sample() {
        let sample = sample_of(&[1, 3, 7, 22, 29, 59, 61, 119, 130, 500, 9_000, 20_000, 0]);
        let histogram = build_histogram(&sample);
        let total: u64 = histogram.buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, sample.len() as u64);
        assert_eq!(total, 11);
    }

    #[test]
    fn empty_sample_gives_zero_buckets_and_floored_max() {
        let histogram = build_histogram(&ResponseSample::default());
        assert!(histogram.buckets.iter().all(|b| b.count == 0));
        assert_eq!(histogram.max, 1);
        assert_eq!(histogram.buckets.len(), 7);
        assert_eq!(histogram.buckets[6].max_minutes, None);
        assert_eq!(histogram.buckets[6].min_minutes, 240);

        for p in build_percentiles(&ResponseSample::default()) {
            assert!(p.minutes.abs() < f64::EPSILON);
            assert_eq!(p.value, "0");
        }
    }

    #[test]
    fn percentiles_are_monotonic() {
        let sample = sample_of(&[300, 2, 45, 17, 90, 5, 61, 1_000, 33, 8, 12]);
        let ps = build_percentiles(&sample);
        for pair in ps.windows(2) {
            assert!(pair[0].minutes <= pair[1].minutes, "{pair:?}");
        }
    }

    #[test]
    fn formats_hours_above_an_hour() {
        assert_eq!(format_duration(90.0), ("1.5".to_string(), DurationUnit::Hours));
        assert_eq!(format_duration(60.0), ("1.0".to_string(), DurationUnit::Hours));
        assert_eq!(format_duration(59.6), ("60".to_string(), DurationUnit::Minutes));
    }
}
