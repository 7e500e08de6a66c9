use thiserror::Error;

/// Errors raised by the planet store and service.
///
/// Absence on reads is not an error: lookups return `Ok(None)`. Only
/// deleting a missing planet produces [`PlanetError::NotFound`].
#[derive(Debug, Error)]
pub enum PlanetError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("A planet named '{0}' already exists")]
    DuplicateName(String),

    #[error("Planet {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlanetError {
    /// True for the errors a store reports when a row breaks a table constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::DuplicateName(_))
    }
}

pub type Result<T, E = PlanetError> = std::result::Result<T, E>;
