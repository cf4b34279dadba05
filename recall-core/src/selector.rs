use crate::{ItemId, ReviewItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

pub const DEFAULT_SESSION_LIMIT: usize = 20;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectionOptions {
    pub limit: usize,
    /// Among items due at the same instant, show harder ones first.
    pub prioritize_hard: bool,
    /// Drop items that are not yet due instead of queueing them after due ones.
    pub due_only: bool,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SESSION_LIMIT,
            prioritize_hard: false,
            due_only: false,
        }
    }
}

/// Rotation state for one physical location: when each item was last seen there.
#[derive(Clone, Debug, Default)]
pub struct LocationRotation {
    pub location: String,
    pub last_reviewed: HashMap<ItemId, DateTime<Utc>>,
}

impl LocationRotation {
    pub fn new(location: impl Into<String>, last_reviewed: HashMap<ItemId, DateTime<Utc>>) -> Self {
        Self {
            location: location.into(),
            last_reviewed,
        }
    }

    /// Items never reviewed here count as seen at the Unix epoch.
    pub fn last_seen(&self, id: &ItemId) -> DateTime<Utc> {
        self.last_reviewed
            .get(id)
            .copied()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Orders `pool` for one study session and keeps the first `options.limit`.
///
/// Without a rotation, due items come first, oldest-due first. With a
/// rotation, items least recently reviewed at that location come first and
/// due dates are ignored. Sorting is stable, so remaining ties keep pool order.
/// Truncation happens only after ordering.
pub fn select_for_session(
    mut pool: Vec<ReviewItem>,
    now: DateTime<Utc>,
    options: &SelectionOptions,
    rotation: Option<&LocationRotation>,
) -> Vec<ReviewItem> {
    if options.due_only {
        pool.retain(|i| i.is_due(now));
    }

    match rotation {
        Some(rot) => pool.sort_by_key(|i| rot.last_seen(&i.id)),
        None if options.prioritize_hard => {
            pool.sort_by_key(|i| (!i.is_due(now), i.next_review_date, Reverse(i.difficulty)))
        }
        None => pool.sort_by_key(|i| (!i.is_due(now), i.next_review_date)),
    }

    pool.truncate(options.limit);
    tracing::debug!(
        selected = pool.len(),
        location = rotation.map(|r| r.location.as_str()),
        "session selected"
    );
    pool
}
