use chrono::{DateTime, Duration, TimeZone, Utc};
use recall_core::{
    select_for_session, Difficulty, ItemKind, LocationRotation, ReviewItem, SelectionOptions,
    DEFAULT_SESSION_LIMIT,
};
use std::collections::HashMap;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn item_due(name: &str, at: DateTime<Utc>) -> ReviewItem {
    let mut it = ReviewItem::new(ItemKind::FreeText, name, Some(name.to_uppercase()));
    it.next_review_date = at;
    it
}

#[test]
fn default_limit_takes_oldest_due_first() {
    // interleave so pool order is not due order
    let mut pool: Vec<ReviewItem> = (0..25)
        .map(|k| item_due(&format!("i{k}"), now() - Duration::hours(((k * 7) % 25) as i64 + 1)))
        .collect();
    pool.reverse();

    let out = select_for_session(pool, now(), &SelectionOptions::default(), None);

    assert_eq!(DEFAULT_SESSION_LIMIT, 20);
    assert_eq!(out.len(), 20);
    assert!(out
        .windows(2)
        .all(|w| w[0].next_review_date <= w[1].next_review_date));
    // the five least overdue were cut
    assert!(out.iter().all(|i| i.next_review_date <= now() - Duration::hours(6)));
}

#[test]
fn due_items_precede_upcoming_ones() {
    let pool = vec![
        item_due("later", now() + Duration::days(2)),
        item_due("soon", now() + Duration::hours(1)),
        item_due("due", now()),
        item_due("overdue", now() - Duration::days(3)),
    ];
    let out = select_for_session(pool.clone(), now(), &SelectionOptions::default(), None);
    let names: Vec<&str> = out.iter().map(|i| i.prompt.as_str()).collect();
    assert_eq!(names, ["overdue", "due", "soon", "later"]);

    let due_only = SelectionOptions {
        due_only: true,
        ..SelectionOptions::default()
    };
    let out = select_for_session(pool, now(), &due_only, None);
    let names: Vec<&str> = out.iter().map(|i| i.prompt.as_str()).collect();
    assert_eq!(names, ["overdue", "due"]);
}

#[test]
fn prioritize_hard_breaks_ties() {
    let at = now() - Duration::hours(2);
    let easy = item_due("easy", at).with_difficulty(Difficulty::EASIEST);
    let hard = item_due("hard", at).with_difficulty(Difficulty::HARDEST);
    let medium = item_due("medium", at);
    let pool = vec![easy, medium, hard];

    let plain = select_for_session(pool.clone(), now(), &SelectionOptions::default(), None);
    let names: Vec<&str> = plain.iter().map(|i| i.prompt.as_str()).collect();
    assert_eq!(names, ["easy", "medium", "hard"]);

    let opts = SelectionOptions {
        prioritize_hard: true,
        ..SelectionOptions::default()
    };
    let hard_first = select_for_session(pool, now(), &opts, None);
    let names: Vec<&str> = hard_first.iter().map(|i| i.prompt.as_str()).collect();
    assert_eq!(names, ["hard", "medium", "easy"]);
}

#[test]
fn location_rotation_prefers_least_recently_seen() {
    let a = item_due("A", now() - Duration::days(10));
    let b = item_due("B", now() + Duration::days(10));
    let c = item_due("C", now());

    let mut seen = HashMap::new();
    seen.insert(a.id, Utc.timestamp_opt(100, 0).unwrap());
    seen.insert(b.id, Utc.timestamp_opt(0, 0).unwrap());
    seen.insert(c.id, Utc.timestamp_opt(50, 0).unwrap());
    let rotation = LocationRotation::new("gym", seen);

    let opts = SelectionOptions {
        limit: 2,
        ..SelectionOptions::default()
    };
    let out = select_for_session(vec![a, b, c], now(), &opts, Some(&rotation));
    let names: Vec<&str> = out.iter().map(|i| i.prompt.as_str()).collect();
    assert_eq!(names, ["B", "C"]);
}

#[test]
fn never_seen_at_location_sorts_first() {
    let a = item_due("A", now());
    let fresh = item_due("fresh", now());
    let mut seen = HashMap::new();
    seen.insert(a.id, now() - Duration::days(30));
    let rotation = LocationRotation::new("bus", seen);

    let out = select_for_session(vec![a, fresh], now(), &SelectionOptions::default(), Some(&rotation));
    assert_eq!(out[0].prompt, "fresh");
    assert_eq!(out.len(), 2);
}

#[test]
fn empty_pool_gives_empty_session() {
    let out = select_for_session(Vec::new(), now(), &SelectionOptions::default(), None);
    assert!(out.is_empty());

    let zero = SelectionOptions {
        limit: 0,
        ..SelectionOptions::default()
    };
    let out = select_for_session(vec![item_due("x", now())], now(), &zero, None);
    assert!(out.is_empty());
}
