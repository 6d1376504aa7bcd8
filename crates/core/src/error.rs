use crate::fields::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The lookup key is kept as the caller supplied it, so a path segment
    /// that is not a valid id reports the same way as a missing row.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
