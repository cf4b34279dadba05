use crate::{Difficulty, DueStatus, ReviewItem};
use chrono::{DateTime, Utc};

pub fn filter_by_text(items: &[ReviewItem], query: &str) -> Vec<ReviewItem> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|i| {
            i.prompt.to_lowercase().contains(&q)
                || i.answer
                    .as_ref()
                    .map(|a| a.to_lowercase().contains(&q))
                    .unwrap_or(false)
        })
        .cloned()
        .collect()
}

pub fn filter_by_due(items: &[ReviewItem], now: DateTime<Utc>, want: DueStatus) -> Vec<ReviewItem> {
    items
        .iter()
        .filter(|i| i.due_status(now) == want)
        .cloned()
        .collect()
}

pub fn filter_by_difficulty(items: &[ReviewItem], at_least: Difficulty) -> Vec<ReviewItem> {
    items
        .iter()
        .filter(|i| i.difficulty >= at_least)
        .cloned()
        .collect()
}
