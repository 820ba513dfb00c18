use crate::config::AppConfig;
use crate::services::nlp::Lemmatizer;
use crate::services::sessions::SessionStore;
use crate::services::store::BookingStore;

/// Shared application state. The store and lemmatizer are capability
/// boundaries: the full or degraded implementation is picked once in
/// `main` and injected here.
pub struct AppState {
    pub config: AppConfig,
    pub store: Box<dyn BookingStore>,
    pub sessions: SessionStore,
    pub lemmatizer: Box<dyn Lemmatizer>,
}
