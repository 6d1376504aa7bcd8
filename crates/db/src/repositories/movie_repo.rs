//! Repository for the `movies` table.

use reel_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::{Movie, MovieInput};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, genre, director, release_year, rating, poster";

/// Provides CRUD operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a new movie, returning the created row.
    pub async fn create(pool: &PgPool, input: &MovieInput) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies (title, genre, director, release_year, rating, poster)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(&input.title)
            .bind(&input.genre)
            .bind(&input.director)
            .bind(input.release_year)
            .bind(input.rating)
            .bind(input.poster.value())
            .fetch_one(pool)
            .await
    }

    /// Find a movie by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all movies in insertion (primary key) order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies ORDER BY id");
        sqlx::query_as::<_, Movie>(&query).fetch_all(pool).await
    }

    /// Overwrite every mutable field of a movie.
    ///
    /// The poster column is only written when `input.poster` overwrites it.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        input: &MovieInput,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET
                title = $2,
                genre = $3,
                director = $4,
                release_year = $5,
                rating = $6,
                poster = CASE WHEN $7 THEN $8 ELSE poster END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.genre)
            .bind(&input.director)
            .bind(input.release_year)
            .bind(input.rating)
            .bind(input.poster.overwrites())
            .bind(input.poster.value())
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a movie by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
