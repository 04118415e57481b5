//! Zero-guarded arithmetic shared by the stages.
//!
//! Nothing here can produce `NaN` or infinity: empty inputs and zero
//! denominators collapse to 0, and divisors handed to the UI are floored
//! at 1.

/// `round(100 * part / whole)` clamped to `0..=100`, or 0 when `whole` is 0.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percent(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Arithmetic mean, `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Rounds a non-negative finite value to the nearest whole number.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_u64(value: f64) -> u64 {
    if value.is_finite() {
        value.round().max(0.0) as u64
    } else {
        0
    }
}

/// Largest value in `values`, never less than 1.
#[must_use]
pub fn floored_max<I: IntoIterator<Item = u64>>(values: I) -> u64 {
    values.into_iter().max().unwrap_or(0).max(1)
}

/// Index of the first occurrence of the largest value, 0 when empty.
#[must_use]
pub fn first_max_index(values: &[u64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Shortens labels over `max_chars` to `max_chars - 2` characters
/// followed by an ellipsis.
#[must_use]
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() > max_chars {
        let head: String = label.chars().take(max_chars.saturating_sub(2)).collect();
        format!("{head}…")
    } else {
        label.to_string()
    }
}
