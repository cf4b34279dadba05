//! Advisory interval adjustment.
//!
//! The SM-2 result is the baseline. An external [`TextAdvisor`] may nudge the
//! interval by a multiplier in `[0.5, 2.0]`; anything it does wrong collapses
//! to a multiplier of `1.0`, so the schedule never depends on it.

use crate::{
    scheduler, AdvisorError, Clock, ItemStatistics, LocationContext, PerformanceRecord, Quality,
    ReviewItem, ScheduleResult, StatisticsSource, MAX_INTERVAL_DAYS,
};
use async_trait::async_trait;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

/// Text generation capability consulted for interval multipliers.
#[async_trait]
pub trait TextAdvisor: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, AdvisorError>;
}

#[derive(Clone, Debug)]
pub struct AdvisorConfig {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Item content beyond this many characters is cut from the prompt.
    pub content_prefix_chars: usize,
    pub timeout: Option<Duration>,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            max_tokens: 8,
            temperature: 0.2,
            content_prefix_chars: 200,
            timeout: None,
            min_multiplier: 0.5,
            max_multiplier: 2.0,
        }
    }
}

pub struct AdaptiveScheduler {
    advisor: Option<Arc<dyn TextAdvisor>>,
    clock: Arc<dyn Clock>,
    config: AdvisorConfig,
}

impl AdaptiveScheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            advisor: None,
            clock,
            config: AdvisorConfig::default(),
        }
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn TextAdvisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn with_config(mut self, config: AdvisorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub async fn schedule_adaptive(
        &self,
        item: ReviewItem,
        quality: Quality,
        response_time_ms: u64,
        stats: Option<&ItemStatistics>,
        location: Option<&LocationContext>,
    ) -> ScheduleResult {
        let now = self.clock.now();
        let base = scheduler::schedule(item, quality, now);
        let base_days = base.interval;

        let multiplier = match &self.advisor {
            Some(advisor) => {
                let prompt = build_prompt(
                    &base,
                    quality,
                    response_time_ms,
                    stats,
                    location,
                    self.config.content_prefix_chars,
                );
                self.request_multiplier(advisor.as_ref(), &prompt).await
            }
            None => NEUTRAL_MULTIPLIER,
        };

        let adjusted = apply_multiplier(base_days, multiplier);
        let mut updated = base;
        updated.interval = adjusted;
        updated.next_review_date = scheduler::review_date_after(now, adjusted);

        tracing::debug!(
            item = %updated.id,
            base_days,
            multiplier,
            adjusted,
            "adaptive schedule"
        );

        let record = PerformanceRecord::new(
            &updated,
            quality,
            response_time_ms,
            now,
            location.map(|l| l.name.clone()),
        );
        ScheduleResult {
            item: updated,
            is_correct: quality.is_pass(),
            difficulty_increase: quality.value() <= Quality::PASS_THRESHOLD,
            next_review_days: adjusted,
            record,
        }
    }

    /// Like [`schedule_adaptive`](Self::schedule_adaptive), reading history from
    /// `source`. A failed lookup counts as "no history".
    pub async fn schedule_with_source(
        &self,
        item: ReviewItem,
        quality: Quality,
        response_time_ms: u64,
        source: &dyn StatisticsSource,
        location: Option<&LocationContext>,
    ) -> ScheduleResult {
        let stats = match source.item_statistics(item.id).await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(item = %item.id, error = %e, "statistics lookup failed");
                None
            }
        };
        self.schedule_adaptive(item, quality, response_time_ms, stats.as_ref(), location)
            .await
    }

    async fn request_multiplier(&self, advisor: &dyn TextAdvisor, prompt: &str) -> f64 {
        let request = advisor.generate(prompt, self.config.max_tokens, self.config.temperature);
        let response = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, request).await {
                Ok(r) => r,
                Err(_) => Err(AdvisorError::Timeout),
            },
            None => request.await,
        };

        let text = match response {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "advisor failed, keeping base interval");
                return NEUTRAL_MULTIPLIER;
            }
        };

        match parse_multiplier(&text) {
            Some(m) => m.clamp(self.config.min_multiplier, self.config.max_multiplier),
            None => {
                tracing::warn!(response = %text, "advisor returned a non-numeric answer");
                NEUTRAL_MULTIPLIER
            }
        }
    }
}

/// Reads a bare decimal number, tolerating surrounding whitespace and a
/// trailing period. Rejects NaN and infinities.
pub fn parse_multiplier(text: &str) -> Option<f64> {
    let trimmed = text.trim().trim_end_matches('.');
    let value: f64 = trimmed.parse().ok()?;
    value.is_finite().then_some(value)
}

pub fn apply_multiplier(days: u32, multiplier: f64) -> u32 {
    let scaled = (days as f64 * multiplier).round();
    scaled.clamp(1.0, MAX_INTERVAL_DAYS as f64) as u32
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub fn build_prompt(
    item: &ReviewItem,
    quality: Quality,
    response_time_ms: u64,
    stats: Option<&ItemStatistics>,
    location: Option<&LocationContext>,
    content_prefix_chars: usize,
) -> String {
    let mut p = String::new();
    p.push_str(
        "You tune a spaced-repetition scheduler. Reply with a single decimal multiplier \
         between 0.5 and 2.0 for the next review interval and nothing else.\n",
    );
    let _ = writeln!(
        p,
        "Item: \"{}\"",
        truncate_chars(&item.prompt, content_prefix_chars)
    );
    let _ = writeln!(p, "Difficulty: {}", item.difficulty.label());
    let _ = writeln!(
        p,
        "Answer quality: {}/5 after {}ms",
        quality.value(),
        response_time_ms
    );
    match stats {
        Some(s) => {
            let _ = writeln!(
                p,
                "History: {}/{} correct, avg response time {:.0}ms",
                s.correct, s.attempts, s.average_response_time_ms
            );
        }
        None => p.push_str("History: none\n"),
    }
    if let Some(loc) = location {
        let _ = writeln!(
            p,
            "Location: {} (average performance {:.0}%, {} sessions)",
            loc.name, loc.average_performance, loc.session_count
        );
    }
    let _ = writeln!(p, "Proposed interval: {} days", item.interval);
    p.push_str("Multiplier:");
    p
}
