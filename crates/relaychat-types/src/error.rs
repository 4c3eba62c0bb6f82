use thiserror::Error;

/// Errors raised while converting raw values into relaychat types.
#[derive(Debug, Error)]
pub enum TypesError {
    /// A stored or received role string is not `system`, `user` or `assistant`.
    #[error("unknown chat role: {0:?}")]
    UnknownRole(String),
}
