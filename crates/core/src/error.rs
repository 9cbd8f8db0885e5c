use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A variant tag outside `ectopic` / `molar`. This is a configuration
    /// or programming error, never a user-input error.
    #[error("Unsupported intake variant: {0}")]
    UnsupportedVariant(String),
}
