use crate::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type ItemId = Uuid;
pub type RecordId = Uuid;

pub const EF_MIN: f64 = 1.3;
pub const EF_DEFAULT: f64 = 2.5;

/// Upper bound on any scheduled interval (about a century).
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// Graded recall quality, 0 (blackout) to 5 (perfect). 0–2 fail, 3–5 pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const PASS_THRESHOLD: u8 = 3;
    pub const PERFECT: Quality = Quality(5);
    pub const HESITANT: Quality = Quality(4);
    pub const FAILED: Quality = Quality(1);

    pub fn new(score: i64) -> Result<Self, CoreError> {
        if (0..=5).contains(&score) {
            Ok(Self(score as u8))
        } else {
            Err(CoreError::InvalidQuality(score))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_pass(self) -> bool {
        self.0 >= Self::PASS_THRESHOLD
    }
}

impl TryFrom<i64> for Quality {
    type Error = CoreError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        Quality::new(v)
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> u8 {
        q.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordinal difficulty tag, 1 (easiest) to 5 (hardest).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const EASIEST: Difficulty = Difficulty(1);
    pub const HARDEST: Difficulty = Difficulty(5);

    pub fn new(level: i64) -> Result<Self, CoreError> {
        if (1..=5).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(CoreError::InvalidDifficulty(level))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "very easy",
            2 => "easy",
            3 => "medium",
            4 => "hard",
            _ => "very hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty(3)
    }
}

impl TryFrom<i64> for Difficulty {
    type Error = CoreError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        Difficulty::new(v)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Answer is picked from fixed options and compared exactly.
    Choice,
    #[default]
    FreeText,
    /// Prompt carries `{{c1::answer::hint}}` markup.
    Cloze,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    New,
    Due,
    Overdue,
    Upcoming,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReviewItem {
    pub id: ItemId,
    pub kind: ItemKind,
    pub prompt: String,
    pub answer: Option<String>,
    pub difficulty: Difficulty,

    pub repetitions: u32,
    pub interval: u32,
    pub ease_factor: f64,
    pub next_review_date: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl ReviewItem {
    pub fn new(kind: ItemKind, prompt: impl Into<String>, answer: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            prompt: prompt.into(),
            answer,
            difficulty: Difficulty::default(),
            repetitions: 0,
            interval: 1,
            ease_factor: EF_DEFAULT,
            next_review_date: now,
            last_reviewed_at: None,
            created_at: now,
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn is_new(&self) -> bool {
        self.last_reviewed_at.is_none()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date <= now
    }

    pub fn due_status(&self, now: DateTime<Utc>) -> DueStatus {
        if self.is_new() {
            DueStatus::New
        } else if self.next_review_date > now {
            DueStatus::Upcoming
        } else if (now - self.next_review_date).num_hours() >= 24 {
            DueStatus::Overdue
        } else {
            DueStatus::Due
        }
    }
}

/// Aggregate history of one item, recomputed externally after each session.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemStatistics {
    pub attempts: u32,
    pub correct: u32,
    pub average_response_time_ms: f64,
}

impl ItemStatistics {
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LocationContext {
    pub name: String,
    /// Rolling performance in percent, 0–100.
    pub average_performance: f64,
    pub session_count: u32,
}

/// One answered review, handed back for persistence alongside the item.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PerformanceRecord {
    pub id: RecordId,
    pub item_id: ItemId,
    pub quality: Quality,
    pub is_correct: bool,
    pub response_time_ms: u64,
    pub reviewed_at: DateTime<Utc>,
    pub location: Option<String>,
    pub interval_applied: u32,
    pub ease_after: f64,
}

impl PerformanceRecord {
    pub fn new(
        item: &ReviewItem,
        quality: Quality,
        response_time_ms: u64,
        reviewed_at: DateTime<Utc>,
        location: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id: item.id,
            quality,
            is_correct: quality.is_pass(),
            response_time_ms,
            reviewed_at,
            location,
            interval_applied: item.interval,
            ease_after: item.ease_factor,
        }
    }
}

/// Outcome of one adaptive review. Always a complete replacement record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScheduleResult {
    pub item: ReviewItem,
    pub is_correct: bool,
    pub difficulty_increase: bool,
    pub next_review_days: u32,
    pub record: PerformanceRecord,
}
