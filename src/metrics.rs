//! Counters emitted by the store adapters when the `metrics` feature is on.
//!
//! Install any `metrics` recorder to collect them.

/// Entries handed to a sink by a store adapter
pub const STORE_ENTRIES_VISITED: &str = "seqweld_store_entries_visited_total";

/// Completed or stopped passes over a store
pub const STORE_PASSES: &str = "seqweld_store_passes_total";

/// Record one pass of `adapter` that visited `visited` entries
pub fn record_store_pass(adapter: &'static str, visited: usize) {
    ::metrics::counter!(STORE_ENTRIES_VISITED, "adapter" => adapter).increment(visited as u64);
    ::metrics::counter!(STORE_PASSES, "adapter" => adapter).increment(1);
}
