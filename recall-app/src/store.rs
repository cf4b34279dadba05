use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use recall_core::{ItemId, LocationPerformance, MemoryStats, PerformanceRecord, ReviewItem, ScheduleResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;

const FILE_VERSION: u32 = 1;

/// Everything the app persists: items, their review history and per-location
/// rolling performance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deck {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<ReviewItem>,
    #[serde(default)]
    pub records: Vec<PerformanceRecord>,
    #[serde(default)]
    pub locations: BTreeMap<String, LocationPerformance>,
}

impl Deck {
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            version: FILE_VERSION,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
            records: Vec::new(),
            locations: BTreeMap::new(),
        }
    }

    pub fn item(&self, id: ItemId) -> Option<&ReviewItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.records.retain(|r| r.item_id != id);
        self.items.len() != before
    }

    /// Replaces the reviewed item wholesale and appends its record.
    pub fn apply(&mut self, result: &ScheduleResult) {
        if let Some(slot) = self.items.iter_mut().find(|i| i.id == result.item.id) {
            *slot = result.item.clone();
        }
        self.records.push(result.record.clone());
    }

    pub fn stats(&self) -> MemoryStats {
        let stats = MemoryStats::from_records(self.records.iter().cloned());
        for (name, perf) in &self.locations {
            stats.restore_location(name, perf.clone());
        }
        stats
    }
}

pub struct DeckStore {
    path: PathBuf,
}

impl DeckStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty deck.
    pub async fn load(&self) -> Result<Deck> {
        let path = self.path.clone();
        task::spawn_blocking(move || {
            if !path.exists() {
                return Ok(Deck::empty());
            }
            let data = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let deck: Deck = serde_json::from_str(&data)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok::<Deck, anyhow::Error>(deck)
        })
        .await?
    }

    pub async fn save(&self, deck: &mut Deck) -> Result<()> {
        deck.updated_at = Utc::now();
        let json = serde_json::to_vec_pretty(deck)?;
        let path = self.path.clone();
        task::spawn_blocking(move || write_atomic(&path, &json)).await??;
        tracing::debug!(path = %self.path.display(), "deck saved");
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}
