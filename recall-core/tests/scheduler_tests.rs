use chrono::{Duration, TimeZone, Utc};
use recall_core::{schedule, CoreError, ItemKind, Quality, ReviewItem, EF_DEFAULT, EF_MIN};

fn q(score: i64) -> Quality {
    Quality::new(score).unwrap()
}

fn item() -> ReviewItem {
    ReviewItem::new(ItemKind::FreeText, "capital of France", Some("Paris".into()))
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn perfect_from_new() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let c = schedule(item(), q(5), now);

    assert_eq!(c.repetitions, 1);
    assert_eq!(c.interval, 1);
    assert!(approx(c.ease_factor, 2.6));
    assert_eq!(c.next_review_date, now + Duration::days(1));
    assert_eq!(c.last_reviewed_at, Some(now));
}

#[test]
fn second_pass_is_six_days() {
    let now = Utc::now();
    let c1 = schedule(item(), q(4), now);
    assert_eq!(c1.repetitions, 1);
    assert_eq!(c1.interval, 1);
    assert!(approx(c1.ease_factor, EF_DEFAULT));

    let c2 = schedule(c1, q(4), now);
    assert_eq!(c2.repetitions, 2);
    assert_eq!(c2.interval, 6);
    assert_eq!(c2.next_review_date, now + Duration::days(6));
}

#[test]
fn third_pass_multiplies_by_new_ease() {
    let now = Utc::now();
    let mut it = item();
    it.repetitions = 2;
    it.interval = 6;
    it.ease_factor = 2.5;

    // q=3 lowers ease by 0.14 before it is applied
    let c = schedule(it, q(3), now);
    assert_eq!(c.repetitions, 3);
    assert!(approx(c.ease_factor, 2.36));
    assert_eq!(c.interval, (6.0_f64 * 2.36).round() as u32);
    assert_eq!(c.interval, 14);
}

#[test]
fn failure_resets_and_keeps_ease() {
    let now = Utc::now();
    let mut it = item();
    it.repetitions = 5;
    it.interval = 40;
    it.ease_factor = 2.1;

    for score in 0..3 {
        let c = schedule(it.clone(), q(score), now);
        assert_eq!(c.repetitions, 0);
        assert_eq!(c.interval, 1);
        assert!(approx(c.ease_factor, 2.1));
        assert_eq!(c.next_review_date, now + Duration::days(1));
    }
}

#[test]
fn ease_never_drops_below_floor() {
    let now = Utc::now();
    for start in [1.3, 1.35, 1.5, 2.5] {
        for score in 3..=5 {
            let mut it = item();
            it.repetitions = 4;
            it.interval = 10;
            it.ease_factor = start;
            let c = schedule(it, q(score), now);
            assert!(c.ease_factor >= EF_MIN, "ease {} from {start} q{score}", c.ease_factor);
            assert!(c.interval >= 1);
        }
    }
}

#[test]
fn next_review_is_strictly_in_the_future() {
    let now = Utc::now();
    for score in 0..=5 {
        let c = schedule(item(), q(score), now);
        assert!(c.next_review_date > now);
    }
}

#[test]
fn huge_intervals_saturate() {
    let now = Utc::now();
    let mut it = item();
    it.repetitions = 30;
    it.interval = u32::MAX / 2;
    let c = schedule(it, q(5), now);
    assert_eq!(c.interval, recall_core::MAX_INTERVAL_DAYS);
}

#[test]
fn repetition_counter_saturates() {
    let now = Utc::now();
    let mut it = item();
    it.repetitions = u32::MAX;
    it.interval = 10;
    let c = schedule(it, q(4), now);
    assert_eq!(c.repetitions, u32::MAX);
    assert_eq!(c.interval, 25);
}

#[test]
fn quality_out_of_range_is_rejected() {
    assert!(matches!(Quality::new(6), Err(CoreError::InvalidQuality(6))));
    assert!(matches!(Quality::new(-1), Err(CoreError::InvalidQuality(-1))));
    assert!(serde_json::from_str::<Quality>("7").is_err());
    assert_eq!(serde_json::from_str::<Quality>("3").unwrap(), q(3));
}

#[test]
fn input_item_is_not_mutated() {
    let original = item();
    let copy = original.clone();
    let _ = schedule(copy, q(5), Utc::now());
    assert_eq!(original.repetitions, 0);
    assert!(original.last_reviewed_at.is_none());
}
