//! Movie entity model and DTOs.

use reel_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;
use validator::Validate;

/// A movie row from the `movies` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub genre: String,
    pub director: String,
    pub release_year: i32,
    pub rating: f64,
    /// Stored path relative to the media root, e.g. `posters/<uuid>.png`.
    pub poster: Option<String>,
}

/// How a write treats the stored poster reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PosterChange {
    /// Leave the current value alone (inserts store `NULL`).
    #[default]
    Keep,
    Clear,
    Set(String),
}

impl PosterChange {
    /// Whether the write replaces the stored value.
    pub fn overwrites(&self) -> bool {
        !matches!(self, PosterChange::Keep)
    }

    /// The value written when [`overwrites`](Self::overwrites) is true.
    pub fn value(&self) -> Option<&str> {
        match self {
            PosterChange::Set(path) => Some(path),
            PosterChange::Keep | PosterChange::Clear => None,
        }
    }

    /// Resolve against the value currently stored.
    pub fn apply(&self, current: Option<String>) -> Option<String> {
        if self.overwrites() {
            self.value().map(str::to_string)
        } else {
            current
        }
    }
}

/// DTO for creating a movie or replacing every mutable field of one.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct MovieInput {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub title: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub genre: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub director: String,
    pub release_year: i32,
    pub rating: f64,
    pub poster: PosterChange,
}

impl Movie {
    /// Build the row an insert of `input` produces under `id`.
    pub fn from_input(id: DbId, input: &MovieInput) -> Self {
        Self {
            id,
            title: input.title.clone(),
            genre: input.genre.clone(),
            director: input.director.clone(),
            release_year: input.release_year,
            rating: input.rating,
            poster: input.poster.apply(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> MovieInput {
        MovieInput {
            title: title.to_string(),
            genre: "Sci-Fi".to_string(),
            director: "Villeneuve".to_string(),
            release_year: 2021,
            rating: 8.0,
            poster: PosterChange::Keep,
        }
    }

    #[test]
    fn blank_title_fails_validation() {
        let errors = input("").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(input("Dune").validate().is_ok());
    }

    #[test]
    fn poster_change_apply() {
        let current = Some("posters/a.png".to_string());
        assert_eq!(PosterChange::Keep.apply(current.clone()), current);
        assert_eq!(PosterChange::Clear.apply(current.clone()), None);
        assert_eq!(
            PosterChange::Set("posters/b.png".into()).apply(current),
            Some("posters/b.png".to_string())
        );
    }

    #[test]
    fn from_input_copies_fields() {
        let mut dto = input("Dune");
        dto.poster = PosterChange::Set("posters/d.jpg".into());
        let movie = Movie::from_input(7, &dto);
        assert_eq!(movie.id, 7);
        assert_eq!(movie.title, "Dune");
        assert_eq!(movie.poster.as_deref(), Some("posters/d.jpg"));
    }
}
