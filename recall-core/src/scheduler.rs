use crate::{Quality, ReviewItem, EF_MIN, MAX_INTERVAL_DAYS};
use chrono::{DateTime, Duration, Utc};

fn clamp_ef(x: f64) -> f64 {
    x.max(EF_MIN)
}

/// SM-2 ease update. Only applied on a passing grade.
pub fn next_ease_factor(ef: f64, quality: Quality) -> f64 {
    let q = quality.value() as f64;
    let delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
    clamp_ef(ef + delta)
}

/// `now + days`, saturating at the interval ceiling so the date is always
/// representable and strictly in the future.
pub fn review_date_after(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    let days = days.clamp(1, MAX_INTERVAL_DAYS);
    now + Duration::days(days as i64)
}

/// Deterministic SM-2 update. Pure function of (item, quality, now).
pub fn schedule(mut item: ReviewItem, quality: Quality, now: DateTime<Utc>) -> ReviewItem {
    if !quality.is_pass() {
        item.repetitions = 0;
        item.interval = 1;
        // no-op for any well-formed item
        item.ease_factor = clamp_ef(item.ease_factor);
    } else {
        let new_ef = next_ease_factor(item.ease_factor, quality);
        let new_reps = item.repetitions.saturating_add(1);
        let new_interval = match new_reps {
            1 => 1,
            2 => 6,
            _ => {
                let base = item.interval.max(1) as f64;
                (base * new_ef).round().clamp(1.0, MAX_INTERVAL_DAYS as f64) as u32
            }
        };
        item.ease_factor = new_ef;
        item.repetitions = new_reps;
        item.interval = new_interval;
    }

    item.next_review_date = review_date_after(now, item.interval);
    item.last_reviewed_at = Some(now);

    tracing::debug!(
        item = %item.id,
        quality = quality.value(),
        interval = item.interval,
        ease = item.ease_factor,
        "scheduled item"
    );
    item
}
