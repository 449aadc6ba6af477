/// Domain-level error taxonomy.
///
/// Mapped to HTTP responses by the API crate's `AppError`. Repository-level
/// `sqlx::Error`s are classified separately at that boundary.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A scanned string does not match the QR payload grammar.
    #[error("Invalid QR payload format")]
    InvalidFormat,

    /// A scanned token does not match the location's current entry code.
    #[error("Invalid or expired QR code")]
    InvalidToken,

    #[error("Internal error: {0}")]
    Internal(String),
}
