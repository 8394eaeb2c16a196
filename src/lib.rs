//! # Lazy, restartable producer combinators
//!
//! This crate provides single-pass, early-terminating sequence pipelines built
//! on internal iteration: a producer pushes items into a sink until the sink
//! says stop.
//!
//! ## Core Concepts
//!
//! - **Producer**: Emits a sequence to a sink, restartable on every drive
//! - **Paired producer**: Emits `(key, value)` pairs
//! - **Sink**: A closure returning `true` to continue and `false` to stop
//! - **Combinators**: Map, filter, distinct, take, keys, values, intersections
//! - **Consumers**: Reduce, sum, group-by, all, any, and materializers
//! - **Store adapters**: Weakly consistent producers over concurrent maps
//!
//! ## Example
//!
//! ```rust
//! use seqweld::prelude::*;
//!
//! let words = from_iter(vec!["apple", "ant", "banana", "bat", "cherry"]);
//! let short = (&words).filter(|w| w.len() <= 3).map(str::to_uppercase).to_vec();
//! assert_eq!(short, vec!["ANT", "BAT"]);
//!
//! let store: SyncMap<&str, u32> = [("a", 1), ("b", 2)].into_iter().collect();
//! let total = sync_values(&store).sum();
//! assert_eq!(total, 3);
//! ```

#[macro_use]
mod tracing_support;

pub mod error;
pub mod impls;
pub mod store;
pub mod traits;

// Re-export commonly used items
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::impls::{consumers::intersection_set, producers::*};
    pub use crate::store::{
        any_as, sync_all, sync_get_all_by_keys, sync_keys, sync_values, try_any_as, AnyValue,
        ConcurrentStore, SyncMap,
    };
    pub use crate::traits::{PairedProducer, PairedProducerExt, Producer, ProducerExt};
}

// Re-export main error type
pub use error::{Error, Result};

// Feature flags for optional dependencies
#[cfg(feature = "metrics")]
pub mod metrics;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
