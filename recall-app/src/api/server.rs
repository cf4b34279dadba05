use axum::{routing::{get, post}, Router};
use recall_core::AdaptiveScheduler;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::api::routes::{check, list_items, post_review, render_cloze, session, AppState};
use crate::store::DeckStore;

pub async fn run(store: DeckStore, scheduler: AdaptiveScheduler, addr: SocketAddr) -> anyhow::Result<()> {
    let deck = store.load().await?;
    let state = Arc::new(AppState {
        store,
        deck: Mutex::new(deck),
        scheduler,
    });

    let app = Router::new()
        .route("/items", get(list_items))
        .route("/session", get(session))
        .route("/review", post(post_review))
        .route("/check", post(check))
        .route("/cloze", post(render_cloze))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "api listening");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
