//! Handlers for the `/movies` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use reel_core::error::CoreError;
use reel_core::types::DbId;
use reel_db::models::movie::{MovieInput, PosterChange};

use crate::error::{AppError, AppResult};
use crate::payload::{MovieForm, MoviePayload};
use crate::response::MovieResponse;
use crate::state::AppState;

const ENTITY: &str = "Movie";

/// Path ids that do not parse as integers are treated like missing rows.
fn parse_id(raw: &str) -> AppResult<DbId> {
    raw.parse()
        .map_err(|_| AppError::Core(CoreError::not_found(ENTITY, raw)))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::not_found(ENTITY, id))
}

/// Store an uploaded poster (if any) and fold its path into the input.
async fn resolve_poster(state: &AppState, form: MovieForm) -> AppResult<MovieInput> {
    let mut input = form.input;
    if let Some(image) = form.poster {
        let path = state.media.store_poster(&image).await?;
        input.poster = PosterChange::Set(path);
    }
    Ok(input)
}

/// Remove a poster stored by this request when its row was never written.
async fn discard_upload(state: &AppState, input: &MovieInput) {
    if let PosterChange::Set(path) = &input.poster {
        state.media.discard(path).await;
    }
}

/// GET /api/movies/
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<MovieResponse>>> {
    let movies = state.store.list().await?;
    let body = movies
        .into_iter()
        .map(|movie| MovieResponse::from_movie(movie, &state.media))
        .collect();
    Ok(Json(body))
}

/// POST /api/movies/
pub async fn create(
    State(state): State<AppState>,
    payload: MoviePayload,
) -> AppResult<(StatusCode, Json<MovieResponse>)> {
    let form = payload.into_form()?;
    let input = resolve_poster(&state, form).await?;

    let movie = match state.store.create(&input).await {
        Ok(movie) => movie,
        Err(err) => {
            discard_upload(&state, &input).await;
            return Err(err.into());
        }
    };
    tracing::info!(movie_id = movie.id, title = %movie.title, "Movie created");

    Ok((
        StatusCode::CREATED,
        Json(MovieResponse::from_movie(movie, &state.media)),
    ))
}

/// GET /api/movies/{id}/
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MovieResponse>> {
    let id = parse_id(&raw_id)?;
    let movie = state.store.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(MovieResponse::from_movie(movie, &state.media)))
}

/// PUT /api/movies/{id}/
///
/// Full replacement. A missing movie is reported before payload validation.
pub async fn replace(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: MoviePayload,
) -> AppResult<Json<MovieResponse>> {
    let id = parse_id(&raw_id)?;
    if state.store.find_by_id(id).await?.is_none() {
        return Err(not_found(id));
    }

    let form = payload.into_form()?;
    let input = resolve_poster(&state, form).await?;

    // The row can vanish between the lookup above and this write.
    let movie = match state.store.replace(id, &input).await {
        Ok(Some(movie)) => movie,
        Ok(None) => {
            discard_upload(&state, &input).await;
            return Err(not_found(id));
        }
        Err(err) => {
            discard_upload(&state, &input).await;
            return Err(err.into());
        }
    };
    tracing::info!(movie_id = movie.id, title = %movie.title, "Movie replaced");

    Ok(Json(MovieResponse::from_movie(movie, &state.media)))
}

/// DELETE /api/movies/{id}/
pub async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&raw_id)?;
    if state.store.delete(id).await? {
        tracing::info!(movie_id = id, "Movie deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
