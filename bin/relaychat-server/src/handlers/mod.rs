//! Relay logic that does not depend on the HTTP layer.

pub mod prompt;
pub mod upstream;
