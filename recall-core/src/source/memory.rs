use crate::stats::{session_score, LocationPerformance};
use crate::{CoreError, ItemId, ItemStatistics, LocationContext, PerformanceRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory performance aggregator.
#[derive(Default)]
pub struct MemoryStats {
    records: RwLock<HashMap<ItemId, Vec<PerformanceRecord>>>,
    locations: RwLock<HashMap<String, LocationPerformance>>,
}

impl MemoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = PerformanceRecord>) -> Self {
        let stats = Self::new();
        {
            let mut m = stats.records.write();
            for r in records {
                m.entry(r.item_id).or_default().push(r);
            }
        }
        stats
    }

    pub fn record(&self, record: &PerformanceRecord) {
        self.records
            .write()
            .entry(record.item_id)
            .or_default()
            .push(record.clone());
    }

    /// Closes a session at `location`, folding its accuracy into the rolling
    /// average. Empty sessions are ignored.
    pub fn finish_session(&self, location: &str, records: &[PerformanceRecord]) {
        if records.is_empty() {
            return;
        }
        self.locations
            .write()
            .entry(location.to_string())
            .or_default()
            .push_session(session_score(records));
    }

    /// Seeds a location with previously persisted performance.
    pub fn restore_location(&self, location: &str, performance: LocationPerformance) {
        self.locations
            .write()
            .insert(location.to_string(), performance);
    }

    pub fn location_performance(&self) -> HashMap<String, LocationPerformance> {
        self.locations.read().clone()
    }

    pub fn location_context(&self, location: &str) -> Option<LocationContext> {
        self.locations
            .read()
            .get(location)
            .map(|p| p.context(location))
    }

    pub fn locations(&self) -> Vec<LocationContext> {
        let mut v: Vec<LocationContext> = self
            .locations
            .read()
            .iter()
            .map(|(name, p)| p.context(name))
            .collect();
        v.sort_by(|a, b| a.name.cmp(&b.name));
        v
    }

    /// Most recent review time of each item at `location`.
    pub fn last_reviewed_at(&self, location: &str) -> HashMap<ItemId, DateTime<Utc>> {
        let records = self.records.read();
        let mut out = HashMap::new();
        for (id, rs) in records.iter() {
            let latest = rs
                .iter()
                .filter(|r| r.location.as_deref() == Some(location))
                .map(|r| r.reviewed_at)
                .max();
            if let Some(at) = latest {
                out.insert(*id, at);
            }
        }
        out
    }

    pub fn records_for_item(&self, id: ItemId) -> Vec<PerformanceRecord> {
        self.records.read().get(&id).cloned().unwrap_or_default()
    }

    pub fn all_records(&self) -> Vec<PerformanceRecord> {
        let mut v: Vec<PerformanceRecord> =
            self.records.read().values().flatten().cloned().collect();
        v.sort_by_key(|r| r.reviewed_at);
        v
    }
}

#[async_trait]
impl crate::source::StatisticsSource for MemoryStats {
    async fn item_statistics(&self, id: ItemId) -> Result<Option<ItemStatistics>, CoreError> {
        Ok(self
            .records
            .read()
            .get(&id)
            .filter(|rs| !rs.is_empty())
            .map(|rs| ItemStatistics::from_records(rs.iter())))
    }
}
