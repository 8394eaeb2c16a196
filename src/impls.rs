//! Concrete implementations of producers, combinators, and consumers.

pub mod combinators;
pub mod consumers;
pub mod producers;

// Re-export commonly used implementations
pub use consumers::*;
pub use producers::*;
