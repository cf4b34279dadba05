use chrono::{DateTime, Utc};
use recall_core::{cloze, hints, ClozeBlank, DueStatus, ItemKind, ReviewItem};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize)]
pub struct ItemOut {
    pub id: Uuid,
    pub kind: ItemKind,
    /// Cloze markup is rendered with placeholders.
    pub prompt: String,
    pub blanks: Vec<ClozeBlank>,
    pub difficulty: u8,
    pub due_status: DueStatus,
    pub next_review_date: DateTime<Utc>,
    pub interval: u32,
}

impl ItemOut {
    pub fn from_item(item: ReviewItem, now: DateTime<Utc>) -> Self {
        let due_status = item.due_status(now);
        let (prompt, blanks) = match item.kind {
            ItemKind::Cloze => {
                let r = cloze::process(&item.prompt);
                (r.text, r.blanks)
            }
            _ => (item.prompt, Vec::new()),
        };
        Self {
            id: item.id,
            kind: item.kind,
            prompt,
            blanks,
            difficulty: item.difficulty.value(),
            due_status,
            next_review_date: item.next_review_date,
            interval: item.interval,
        }
    }
}

#[derive(Deserialize)]
pub struct ReviewIn {
    pub item_id: Uuid,
    pub quality: i64,
    #[serde(default)]
    pub response_time_ms: u64,
    pub location: Option<String>,
}

#[derive(Deserialize)]
pub struct CheckIn {
    pub expected: String,
    pub actual: String,
}

#[derive(Serialize)]
pub struct CheckOut {
    pub equivalent: bool,
    pub hints: Vec<String>,
}

#[derive(Deserialize)]
pub struct ClozeIn {
    pub markup: String,
}

#[derive(Serialize)]
pub struct BlankOut {
    #[serde(flatten)]
    pub blank: ClozeBlank,
    pub hints: Vec<String>,
}

#[derive(Serialize)]
pub struct ClozeOut {
    pub text: String,
    pub blanks: Vec<BlankOut>,
}

impl ClozeOut {
    pub fn render(markup: &str) -> Self {
        let r = cloze::process(markup);
        Self {
            text: r.text,
            blanks: r
                .blanks
                .into_iter()
                .map(|b| BlankOut {
                    hints: hints(&b.correct_answer),
                    blank: b,
                })
                .collect(),
        }
    }
}
