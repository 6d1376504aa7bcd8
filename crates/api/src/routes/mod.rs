pub mod health;
pub mod movie;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /movies/                 list, create
/// /movies/{id}/            get, replace, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(movie::router())
}
