use std::sync::Arc;

use reel_db::store::MovieStore;

use crate::media::MediaStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Movie persistence (Postgres or in-memory).
    pub store: Arc<dyn MovieStore>,
    /// Poster file storage.
    pub media: Arc<MediaStorage>,
}
