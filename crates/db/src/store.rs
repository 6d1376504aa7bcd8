//! The persistence seam used by the HTTP handlers.
//!
//! Handlers receive an `Arc<dyn MovieStore>` through application state
//! rather than a concrete pool, so the same routes run against Postgres in
//! production and against [`MemoryMovieStore`] in tests or `MOVIE_STORE=memory`
//! deployments.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reel_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::movie::{Movie, MovieInput};
use crate::repositories::MovieRepo;
use crate::DbPool;

/// The five movie operations plus a health check.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// All movies in primary key order.
    async fn list(&self) -> Result<Vec<Movie>, sqlx::Error>;

    async fn create(&self, input: &MovieInput) -> Result<Movie, sqlx::Error>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, sqlx::Error>;

    /// Full replacement. `None` when the movie does not exist.
    async fn replace(&self, id: DbId, input: &MovieInput) -> Result<Option<Movie>, sqlx::Error>;

    /// `true` when a movie was removed.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;

    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// [`MovieStore`] backed by the `movies` table.
#[derive(Clone)]
pub struct PgMovieStore {
    pool: DbPool,
}

impl PgMovieStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn list(&self) -> Result<Vec<Movie>, sqlx::Error> {
        MovieRepo::list(&self.pool).await
    }

    async fn create(&self, input: &MovieInput) -> Result<Movie, sqlx::Error> {
        MovieRepo::create(&self.pool, input).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        MovieRepo::find_by_id(&self.pool, id).await
    }

    async fn replace(&self, id: DbId, input: &MovieInput) -> Result<Option<Movie>, sqlx::Error> {
        MovieRepo::replace(&self.pool, id, input).await
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        MovieRepo::delete(&self.pool, id).await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryState {
    /// Last id handed out. Never decremented, so ids are not reused.
    last_id: DbId,
    rows: BTreeMap<DbId, Movie>,
}

/// Process-local [`MovieStore`]. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryMovieStore {
    state: RwLock<MemoryState>,
}

impl MemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn list(&self) -> Result<Vec<Movie>, sqlx::Error> {
        let state = self.state.read().await;
        Ok(state.rows.values().cloned().collect())
    }

    async fn create(&self, input: &MovieInput) -> Result<Movie, sqlx::Error> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let movie = Movie::from_input(state.last_id, input);
        state.rows.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let state = self.state.read().await;
        Ok(state.rows.get(&id).cloned())
    }

    async fn replace(&self, id: DbId, input: &MovieInput) -> Result<Option<Movie>, sqlx::Error> {
        let mut state = self.state.write().await;
        let Some(existing) = state.rows.get_mut(&id) else {
            return Ok(None);
        };
        let poster = input.poster.apply(existing.poster.take());
        *existing = Movie {
            poster,
            ..Movie::from_input(id, input)
        };
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut state = self.state.write().await;
        Ok(state.rows.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
