//! Route definitions for the `/movies` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::movie;
use crate::state::AppState;

/// Routes for movies. Paths keep their trailing slash, which is the form
/// existing clients request.
///
/// ```text
/// GET    /movies/          -> list
/// POST   /movies/          -> create
/// GET    /movies/{id}/     -> get_by_id
/// PUT    /movies/{id}/     -> replace
/// DELETE /movies/{id}/     -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/movies/", get(movie::list).post(movie::create))
        .route(
            "/movies/{id}/",
            get(movie::get_by_id)
                .put(movie::replace)
                .delete(movie::delete),
        )
}
