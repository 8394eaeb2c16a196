//! Error types for the producer combinators.
//!
//! Ordinary data conditions (absent keys, empty producers) are never errors.
//! The only failure this crate knows about is a dynamically typed value that
//! turns out not to be the type the caller asked for.

use thiserror::Error;

/// The main error type for the combinator library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A dynamic value was not of the expected type
    #[error("type mismatch: value is not a `{expected}`")]
    TypeMismatch { expected: &'static str },
}

impl Error {
    /// Create a type mismatch error for the type `T`
    pub fn type_mismatch<T: ?Sized>() -> Self {
        Error::TypeMismatch {
            expected: std::any::type_name::<T>(),
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, Error>;
