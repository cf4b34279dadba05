use crate::{ItemStatistics, LocationContext, PerformanceRecord};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Number of most recent sessions that feed a location's rolling average.
pub const LOCATION_WINDOW: usize = 10;

impl ItemStatistics {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PerformanceRecord>) -> Self {
        let mut attempts = 0u32;
        let mut correct = 0u32;
        let mut total_ms = 0u64;
        for r in records {
            attempts += 1;
            if r.is_correct {
                correct += 1;
            }
            total_ms = total_ms.saturating_add(r.response_time_ms);
        }
        let average_response_time_ms = if attempts == 0 {
            0.0
        } else {
            total_ms as f64 / attempts as f64
        };
        Self {
            attempts,
            correct,
            average_response_time_ms,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Totals {
    pub total: u32,
    pub correct: u32,
    pub response_time_ms: u64,
}

impl Totals {
    pub fn record(&mut self, r: &PerformanceRecord) {
        self.total += 1;
        if r.is_correct {
            self.correct += 1;
        }
        self.response_time_ms = self.response_time_ms.saturating_add(r.response_time_ms);
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    pub fn average_response_time_ms(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.response_time_ms as f64 / self.total as f64
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct StatsSummary {
    pub totals: Totals,
    pub per_day: BTreeMap<NaiveDate, Totals>,
}

pub fn summarize(records: &[PerformanceRecord]) -> StatsSummary {
    let mut summary = StatsSummary::default();
    for r in records {
        summary.totals.record(r);
        let d = r.reviewed_at.date_naive();
        summary.per_day.entry(d).or_default().record(r);
    }
    summary
}

pub fn daily_streak(records: &[PerformanceRecord], today: NaiveDate) -> u32 {
    let per_day = summarize(records).per_day;
    let mut streak = 0u32;
    let mut day = today;
    while per_day.get(&day).map(|t| t.total > 0).unwrap_or(false) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

pub fn per_location_totals(records: &[PerformanceRecord]) -> HashMap<String, Totals> {
    let mut map: HashMap<String, Totals> = HashMap::new();
    for r in records {
        if let Some(loc) = &r.location {
            map.entry(loc.clone()).or_default().record(r);
        }
    }
    map
}

/// Rolling per-location performance over the last [`LOCATION_WINDOW`] sessions.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LocationPerformance {
    pub session_count: u32,
    recent: VecDeque<f64>,
}

impl LocationPerformance {
    /// Adds one finished session scored 0–100.
    pub fn push_session(&mut self, score: f64) {
        self.session_count += 1;
        self.recent.push_back(score.clamp(0.0, 100.0));
        while self.recent.len() > LOCATION_WINDOW {
            self.recent.pop_front();
        }
    }

    pub fn average(&self) -> f64 {
        if self.recent.is_empty() {
            0.0
        } else {
            self.recent.iter().sum::<f64>() / self.recent.len() as f64
        }
    }

    pub fn context(&self, name: &str) -> LocationContext {
        LocationContext {
            name: name.to_string(),
            average_performance: self.average(),
            session_count: self.session_count,
        }
    }
}

/// Session score in percent for a batch of records.
pub fn session_score(records: &[PerformanceRecord]) -> f64 {
    let mut t = Totals::default();
    records.iter().for_each(|r| t.record(r));
    t.accuracy() * 100.0
}
