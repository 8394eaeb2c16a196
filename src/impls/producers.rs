//! Concrete producer implementations.
//!
//! These are the leaves of a pipeline: adapters that turn ordinary Rust
//! collections, iterators and closures into restartable producers.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

use crate::traits::{PairedProducer, Producer};

/// A producer that replays a cloneable iterable on every pass
#[derive(Debug, Clone)]
pub struct IterProducer<I> {
    iter: I,
}

/// Create a producer from anything that can be iterated more than once.
///
/// The iterable is cloned at the start of every pass, so ranges, slices and
/// `&Vec<T>` are cheap; an owned `Vec<T>` is copied per pass.
pub fn from_iter<I>(iter: I) -> IterProducer<I>
where
    I: IntoIterator + Clone,
{
    IterProducer { iter }
}

impl<I> Producer for IterProducer<I>
where
    I: IntoIterator + Clone,
{
    type Item = I::Item;

    fn drive<F>(&self, mut sink: F) -> bool
    where
        F: FnMut(Self::Item) -> bool,
    {
        for item in self.iter.clone() {
            if !sink(item) {
                return false;
            }
        }
        true
    }
}

/// A paired producer that replays a cloneable iterable of tuples
#[derive(Debug, Clone)]
pub struct PairIterProducer<I> {
    iter: I,
}

/// Create a paired producer from a cloneable iterable of `(key, value)` tuples
pub fn from_pairs<I, K, V>(iter: I) -> PairIterProducer<I>
where
    I: IntoIterator<Item = (K, V)> + Clone,
{
    PairIterProducer { iter }
}

impl<I, K, V> PairedProducer for PairIterProducer<I>
where
    I: IntoIterator<Item = (K, V)> + Clone,
{
    type Key = K;
    type Value = V;

    fn drive_pairs<F>(&self, mut sink: F) -> bool
    where
        F: FnMut(Self::Key, Self::Value) -> bool,
    {
        for (key, value) in self.iter.clone() {
            if !sink(key, value) {
                return false;
            }
        }
        true
    }
}

/// A producer created from a function
pub struct FnProducer<F, T> {
    pub f: F,
    _phantom: PhantomData<fn() -> T>,
}

/// Helper function to create a producer from a closure.
///
/// The closure receives the sink and must honor the producer contract: stop
/// as soon as the sink returns `false`, and return whether it ran to
/// completion.
///
/// ```rust
/// use seqweld::prelude::*;
///
/// let evens = from_fn(|sink: &mut dyn FnMut(u32) -> bool| {
///     let mut n = 0;
///     loop {
///         if !sink(n) {
///             return false;
///         }
///         n += 2;
///     }
/// });
///
/// assert_eq!(evens.take(3).to_vec(), vec![0, 2, 4]);
/// ```
pub fn from_fn<F, T>(f: F) -> FnProducer<F, T>
where
    F: Fn(&mut dyn FnMut(T) -> bool) -> bool,
{
    FnProducer {
        f,
        _phantom: PhantomData,
    }
}

impl<F, T> Producer for FnProducer<F, T>
where
    F: Fn(&mut dyn FnMut(T) -> bool) -> bool,
{
    type Item = T;

    fn drive<S>(&self, mut sink: S) -> bool
    where
        S: FnMut(Self::Item) -> bool,
    {
        (self.f)(&mut sink)
    }
}

/// A paired producer created from a function
pub struct FnPairedProducer<F, K, V> {
    pub f: F,
    _phantom: PhantomData<fn() -> (K, V)>,
}

/// Helper function to create a paired producer from a closure
pub fn from_fn_pairs<F, K, V>(f: F) -> FnPairedProducer<F, K, V>
where
    F: Fn(&mut dyn FnMut(K, V) -> bool) -> bool,
{
    FnPairedProducer {
        f,
        _phantom: PhantomData,
    }
}

impl<F, K, V> PairedProducer for FnPairedProducer<F, K, V>
where
    F: Fn(&mut dyn FnMut(K, V) -> bool) -> bool,
{
    type Key = K;
    type Value = V;

    fn drive_pairs<S>(&self, mut sink: S) -> bool
    where
        S: FnMut(Self::Key, Self::Value) -> bool,
    {
        (self.f)(&mut sink)
    }
}

/// A producer that never emits anything
pub struct Empty<T> {
    _phantom: PhantomData<fn() -> T>,
}

/// Create an empty producer
pub fn empty<T>() -> Empty<T> {
    Empty {
        _phantom: PhantomData,
    }
}

impl<T> Producer for Empty<T> {
    type Item = T;

    fn drive<F>(&self, _sink: F) -> bool
    where
        F: FnMut(Self::Item) -> bool,
    {
        true
    }
}

/// Point lookup into an eagerly available map.
pub trait Lookup<K> {
    /// The value type returned by a successful lookup
    type Value;

    /// Look `key` up, returning an owned copy of its value if present
    fn lookup(&self, key: &K) -> Option<Self::Value>;
}

impl<K, V, S> Lookup<K> for HashMap<K, V, S>
where
    K: Eq + Hash,
    V: Clone,
    S: BuildHasher,
{
    type Value = V;

    fn lookup(&self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }
}

impl<K, V> Lookup<K> for BTreeMap<K, V>
where
    K: Ord,
    V: Clone,
{
    type Value = V;

    fn lookup(&self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }
}

/// Paired producer returned by [`get_all_by_keys`]
pub struct GetAllByKeys<'a, M: ?Sized, K> {
    map: &'a M,
    keys: Vec<K>,
}

/// Emit `(key, value)` for each requested key found in `map`.
///
/// Keys are visited in the order given, duplicates included. Keys missing
/// from the map are skipped.
pub fn get_all_by_keys<'a, M, K, I>(map: &'a M, keys: I) -> GetAllByKeys<'a, M, K>
where
    M: Lookup<K> + ?Sized,
    I: IntoIterator<Item = K>,
{
    GetAllByKeys {
        map,
        keys: keys.into_iter().collect(),
    }
}

impl<M, K> PairedProducer for GetAllByKeys<'_, M, K>
where
    M: Lookup<K> + ?Sized,
    K: Clone,
{
    type Key = K;
    type Value = M::Value;

    fn drive_pairs<F>(&self, mut sink: F) -> bool
    where
        F: FnMut(Self::Key, Self::Value) -> bool,
    {
        for key in &self.keys {
            if let Some(value) = self.map.lookup(key) {
                if !sink(key.clone(), value) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{PairedProducerExt, ProducerExt};

    fn pairs_of<P: PairedProducer>(producer: &P) -> Vec<(P::Key, P::Value)> {
        let mut results = Vec::new();
        producer.drive_pairs(|k, v| {
            results.push((k, v));
            true
        });
        results
    }

    #[test]
    fn test_iter_producer_replays() {
        let producer = from_iter(vec![1, 2, 3]);
        assert_eq!((&producer).to_vec(), vec![1, 2, 3]);
        assert_eq!((&producer).to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_iter_producer_stops_on_request() {
        let producer = from_iter(0..);
        let mut seen = Vec::new();
        let completed = producer.drive(|n| {
            seen.push(n);
            n < 2
        });
        assert!(!completed);
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_borrowed_slice_producer() {
        let words = ["a", "b"];
        let producer = from_iter(&words);
        assert_eq!(producer.map(|w| w.to_uppercase()).to_vec(), vec!["A", "B"]);
    }

    #[test]
    fn test_fn_pairs() {
        let producer = from_fn_pairs(|sink: &mut dyn FnMut(char, usize) -> bool| {
            for (i, c) in "xyz".chars().enumerate() {
                if !sink(c, i) {
                    return false;
                }
            }
            true
        });
        assert_eq!(pairs_of(&producer), vec![('x', 0), ('y', 1), ('z', 2)]);
    }

    #[test]
    fn test_empty() {
        let nothing = empty::<u8>();
        assert!(nothing.drive(|_| panic!("empty producer emitted")));
    }

    #[test]
    fn test_get_all_by_keys_skips_missing() {
        let map = HashMap::from([("a", 1), ("b", 2), ("c", 3)]);
        let found = get_all_by_keys(&map, ["a", "c", "x"]);
        assert_eq!(pairs_of(&found), vec![("a", 1), ("c", 3)]);
    }

    #[test]
    fn test_get_all_by_keys_repeats_duplicates_in_request_order() {
        let map = BTreeMap::from([(1, "one"), (2, "two")]);
        let found = get_all_by_keys(&map, vec![2, 1, 2]);
        assert_eq!(pairs_of(&found), vec![(2, "two"), (1, "one"), (2, "two")]);
    }

    #[test]
    fn test_get_all_by_keys_early_stop() {
        let map = HashMap::from([("a", 1), ("b", 2)]);
        let found = get_all_by_keys(&map, ["a", "b"]);
        assert_eq!(found.keys().first(), Some("a"));
    }
}
