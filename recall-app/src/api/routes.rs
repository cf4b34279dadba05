use axum::{extract::{Query, State}, http::StatusCode, Json};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use recall_core::{
    hints, is_equivalent, select_for_session, AdaptiveScheduler, LocationContext,
    LocationRotation, Quality, ScheduleResult, SelectionOptions,
};

use crate::api::dto::{CheckIn, CheckOut, ClozeIn, ClozeOut, ItemOut, ReviewIn};
use crate::store::{Deck, DeckStore};

pub struct AppState {
    pub store: DeckStore,
    pub deck: Mutex<Deck>,
    pub scheduler: AdaptiveScheduler,
}

#[derive(Deserialize)]
pub struct SessionQuery {
    limit: Option<usize>,
    prioritize_hard: Option<bool>,
    due_only: Option<bool>,
    location: Option<String>,
}

pub async fn list_items(State(st): State<Arc<AppState>>) -> Json<Vec<ItemOut>> {
    let now = st.scheduler.clock().now();
    let mut items = st.deck.lock().await.items.clone();
    items.sort_by_key(|i| i.created_at);
    Json(items.into_iter().map(|i| ItemOut::from_item(i, now)).collect())
}

pub async fn session(State(st): State<Arc<AppState>>, Query(q): Query<SessionQuery>) -> Json<Vec<ItemOut>> {
    let now = st.scheduler.clock().now();
    let deck = st.deck.lock().await;
    let defaults = SelectionOptions::default();
    let options = SelectionOptions {
        limit: q.limit.unwrap_or(defaults.limit),
        prioritize_hard: q.prioritize_hard.unwrap_or(false),
        due_only: q.due_only.unwrap_or(false),
    };
    let rotation = q
        .location
        .as_ref()
        .map(|loc| LocationRotation::new(loc.clone(), deck.stats().last_reviewed_at(loc)));
    let picked = select_for_session(deck.items.clone(), now, &options, rotation.as_ref());
    Json(picked.into_iter().map(|i| ItemOut::from_item(i, now)).collect())
}

/// The deck lock is released while the advisor is consulted; only the
/// apply-and-save step is serialized. Concurrent reviews of one item are
/// last-writer-wins.
pub async fn post_review(
    State(st): State<Arc<AppState>>,
    Json(body): Json<ReviewIn>,
) -> Result<Json<ScheduleResult>, StatusCode> {
    let quality = Quality::new(body.quality).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;

    let (item, stats) = {
        let deck = st.deck.lock().await;
        let item = deck.item(body.item_id).cloned().ok_or(StatusCode::NOT_FOUND)?;
        (item, deck.stats())
    };
    let location = body.location.as_ref().map(|loc| {
        stats.location_context(loc).unwrap_or(LocationContext {
            name: loc.clone(),
            average_performance: 0.0,
            session_count: 0,
        })
    });

    let result = st
        .scheduler
        .schedule_with_source(item, quality, body.response_time_ms, &stats, location.as_ref())
        .await;

    let mut deck = st.deck.lock().await;
    // removed while the advisor was thinking
    if deck.item(result.item.id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    deck.apply(&result);
    st.store.save(&mut deck).await.map_err(|e| {
        tracing::error!(error = %e, "saving deck failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(result))
}

pub async fn check(Json(body): Json<CheckIn>) -> Json<CheckOut> {
    let equivalent = is_equivalent(&body.expected, &body.actual);
    let hints = if equivalent { Vec::new() } else { hints(&body.expected) };
    Json(CheckOut { equivalent, hints })
}

pub async fn render_cloze(Json(body): Json<ClozeIn>) -> Json<ClozeOut> {
    Json(ClozeOut::render(&body.markup))
}
