use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use medibook::config::AppConfig;
use medibook::handlers;
use medibook::services::nlp::{Lemmatizer, Passthrough, WordlistLemmatizer};
use medibook::services::sessions::SessionStore;
use medibook::services::store::{BookingStore, DemoStore, SqliteStore};
use medibook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let store: Box<dyn BookingStore> = match SqliteStore::open(&config.database_url) {
        Ok(store) => {
            tracing::info!(path = %config.database_url, "using SQLite store");
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!(error = %e, "database unavailable, serving from in-memory demo store");
            Box::new(DemoStore::new())
        }
    };

    let lemmatizer: Box<dyn Lemmatizer> = match WordlistLemmatizer::load(&config.lexicon_path) {
        Ok(wordlist) => {
            tracing::info!(path = %config.lexicon_path, entries = wordlist.len(), "lemma list loaded");
            Box::new(wordlist)
        }
        Err(e) => {
            tracing::warn!(error = %e, "lemma list unavailable, tokens pass through unreduced");
            Box::new(Passthrough)
        }
    };

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        sessions: SessionStore::new(),
        lemmatizer,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/check-booking", post(handlers::lookup::check_booking))
        .route("/api/doctors", get(handlers::directory::get_doctors))
        .route("/api/dates", get(handlers::directory::get_dates))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
