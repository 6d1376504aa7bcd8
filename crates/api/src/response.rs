//! Wire representation of a movie.
//!
//! Responses are plain objects (no envelope), matching what the frontend
//! client reads. The stored poster path is rendered as a public URL.

use reel_core::types::DbId;
use reel_db::models::movie::Movie;
use serde::Serialize;

use crate::media::MediaStorage;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieResponse {
    pub id: DbId,
    pub title: String,
    pub genre: String,
    pub director: String,
    pub release_year: i32,
    pub rating: f64,
    pub poster: Option<String>,
}

impl MovieResponse {
    pub fn from_movie(movie: Movie, media: &MediaStorage) -> Self {
        Self {
            poster: movie.poster.as_deref().map(|path| media.url_for(path)),
            id: movie.id,
            title: movie.title,
            genre: movie.genre,
            director: movie.director,
            release_year: movie.release_year,
            rating: movie.rating,
        }
    }
}
