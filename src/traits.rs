//! Core traits for the producer/sink system.
//!
//! This module defines the two primitives every combinator in this crate is
//! built on: the [`Producer`] and the [`PairedProducer`]. Both use internal
//! iteration: the caller hands a *sink* to [`Producer::drive`] and the producer
//! calls it once per element, in order, until either the sequence is exhausted
//! or the sink returns `false`.
//!
//! Producers are restartable. `drive` takes `&self`, so driving the same value
//! twice replays the same sequence from the start. Any per-pass state (a
//! counter, a seen-set) lives on the stack of one `drive` call and is dropped
//! with it.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::Add;

use crate::impls::consumers;

/// A producer emits a sequence of items to a sink, stopping on request.
///
/// # Contract
///
/// - the sink is called once per element, in order;
/// - once the sink returns `false`, the producer must return immediately
///   without pulling further elements or calling the sink again;
/// - `drive` returns `true` if the sequence ran to completion and `false` if
///   the sink stopped it.
///
/// # Examples
///
/// ```rust
/// use seqweld::traits::Producer;
///
/// struct Countdown(u32);
///
/// impl Producer for Countdown {
///     type Item = u32;
///
///     fn drive<F>(&self, mut sink: F) -> bool
///     where
///         F: FnMut(Self::Item) -> bool,
///     {
///         for n in (1..=self.0).rev() {
///             if !sink(n) {
///                 return false;
///             }
///         }
///         true
///     }
/// }
///
/// let mut seen = Vec::new();
/// Countdown(3).drive(|n| {
///     seen.push(n);
///     true
/// });
/// assert_eq!(seen, vec![3, 2, 1]);
/// ```
pub trait Producer {
    /// The type of items this producer emits
    type Item;

    /// Feed every item to `sink` until exhaustion or until `sink` returns `false`.
    fn drive<F>(&self, sink: F) -> bool
    where
        F: FnMut(Self::Item) -> bool;
}

/// A producer of `(key, value)` pairs.
///
/// Same contract as [`Producer`], with a two-argument sink.
pub trait PairedProducer {
    /// The key half of each pair
    type Key;
    /// The value half of each pair
    type Value;

    /// Feed every pair to `sink` until exhaustion or until `sink` returns `false`.
    fn drive_pairs<F>(&self, sink: F) -> bool
    where
        F: FnMut(Self::Key, Self::Value) -> bool;
}

impl<P: Producer + ?Sized> Producer for &P {
    type Item = P::Item;

    fn drive<F>(&self, sink: F) -> bool
    where
        F: FnMut(Self::Item) -> bool,
    {
        (**self).drive(sink)
    }
}

impl<P: PairedProducer + ?Sized> PairedProducer for &P {
    type Key = P::Key;
    type Value = P::Value;

    fn drive_pairs<F>(&self, sink: F) -> bool
    where
        F: FnMut(Self::Key, Self::Value) -> bool,
    {
        (**self).drive_pairs(sink)
    }
}

/// Extension trait for composing and consuming producers.
pub trait ProducerExt: Producer + Sized {
    /// Map items through a function
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Item) -> U;

    /// Filter items with a predicate
    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: Fn(&Self::Item) -> bool;

    /// Emit each item at most once, keeping the first occurrence
    fn distinct(self) -> Distinct<Self>
    where
        Self::Item: Eq + Hash + Clone;

    /// Emit each item whose key has not been seen earlier in the pass
    fn distinct_by<F, K>(self, key: F) -> DistinctBy<Self, F>
    where
        F: Fn(&Self::Item) -> K,
        K: Eq + Hash;

    /// Take only the first n items
    fn take(self, n: usize) -> Take<Self>;

    /// Keep the items of `self` that also occur in `other`
    fn intersection<P2>(self, other: P2) -> Intersection<Self, P2>
    where
        P2: Producer<Item = Self::Item>,
        Self::Item: Eq + Hash;

    /// Downcast every dynamic item to `T`, panicking on a mismatch
    fn downcast<T>(self) -> Downcast<Self, T>
    where
        Self: Producer<Item = crate::store::AnyValue>,
        T: std::any::Any + Clone;

    /// Left fold over the whole producer
    fn reduce<R, F>(self, init: R, f: F) -> R
    where
        F: FnMut(R, Self::Item) -> R;

    /// Add up every item, starting from `T::default()`
    fn sum(self) -> Self::Item
    where
        Self::Item: Default + Add<Output = Self::Item>;

    /// Bucket items by key, preserving order inside each bucket
    fn group_by<K, F>(self, key: F) -> HashMap<K, Vec<Self::Item>>
    where
        F: FnMut(&Self::Item) -> K,
        K: Eq + Hash;

    /// `true` unless some item fails `predicate`; stops at the first failure
    fn all<F>(self, predicate: F) -> bool
    where
        F: FnMut(Self::Item) -> bool;

    /// `true` if some item satisfies `predicate`; stops at the first match
    fn any<F>(self, predicate: F) -> bool
    where
        F: FnMut(Self::Item) -> bool;

    /// Number of items emitted by one pass
    fn count(self) -> usize;

    /// The first item, stopping the producer right after it
    fn first(self) -> Option<Self::Item>;

    /// Collect one pass into a vector
    fn to_vec(self) -> Vec<Self::Item>;

    /// Collect one pass into a set
    fn to_set(self) -> HashSet<Self::Item>
    where
        Self::Item: Eq + Hash;
}

/// Extension trait for paired producers
pub trait PairedProducerExt: PairedProducer + Sized {
    /// Project each pair onto its key
    fn keys(self) -> Keys<Self>;

    /// Project each pair onto its value
    fn values(self) -> Values<Self>;

    /// Keys of `self` that also occur as keys of `other`
    fn intersection_keys<P2>(self, other: P2) -> IntersectionKeys<Self, P2>
    where
        P2: PairedProducer<Key = Self::Key>,
        Self::Key: Eq + Hash;

    /// Downcast every dynamic value to `V`, panicking on a mismatch
    fn downcast_values<V>(self) -> DowncastValues<Self, V>
    where
        Self: PairedProducer<Value = crate::store::AnyValue>,
        V: std::any::Any + Clone;

    /// Collect one pass into a map; later duplicate keys overwrite earlier ones
    fn to_map(self) -> HashMap<Self::Key, Self::Value>
    where
        Self::Key: Eq + Hash;
}

pub struct Map<P, F> {
    pub producer: P,
    pub f: F,
}

pub struct Filter<P, F> {
    pub producer: P,
    pub predicate: F,
}

pub struct Distinct<P> {
    pub producer: P,
}

pub struct DistinctBy<P, F> {
    pub producer: P,
    pub key: F,
}

pub struct Take<P> {
    pub producer: P,
    pub limit: usize,
}

/// Streams `left`, keeping items present in `right`.
///
/// `right` is driven to exhaustion and collected into a set before the first
/// item of `left` is pulled, on every pass. If `right` is unbounded, the pass
/// never starts emitting.
pub struct Intersection<P1, P2> {
    pub left: P1,
    pub right: P2,
}

/// Like [`Intersection`], over the keys of two paired producers.
pub struct IntersectionKeys<P1, P2> {
    pub left: P1,
    pub right: P2,
}

pub struct Keys<P> {
    pub producer: P,
}

pub struct Values<P> {
    pub producer: P,
}

pub struct Downcast<P, T> {
    pub producer: P,
    pub _phantom: PhantomData<fn() -> T>,
}

pub struct DowncastValues<P, V> {
    pub producer: P,
    pub _phantom: PhantomData<fn() -> V>,
}

// Auto-implement ProducerExt for all Producers
impl<P: Producer> ProducerExt for P {
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Item) -> U,
    {
        Map { producer: self, f }
    }

    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: Fn(&Self::Item) -> bool,
    {
        Filter {
            producer: self,
            predicate,
        }
    }

    fn distinct(self) -> Distinct<Self>
    where
        Self::Item: Eq + Hash + Clone,
    {
        Distinct { producer: self }
    }

    fn distinct_by<F, K>(self, key: F) -> DistinctBy<Self, F>
    where
        F: Fn(&Self::Item) -> K,
        K: Eq + Hash,
    {
        DistinctBy {
            producer: self,
            key,
        }
    }

    fn take(self, n: usize) -> Take<Self> {
        Take {
            producer: self,
            limit: n,
        }
    }

    fn intersection<P2>(self, other: P2) -> Intersection<Self, P2>
    where
        P2: Producer<Item = Self::Item>,
        Self::Item: Eq + Hash,
    {
        Intersection {
            left: self,
            right: other,
        }
    }

    fn downcast<T>(self) -> Downcast<Self, T>
    where
        Self: Producer<Item = crate::store::AnyValue>,
        T: std::any::Any + Clone,
    {
        Downcast {
            producer: self,
            _phantom: PhantomData,
        }
    }

    fn reduce<R, F>(self, init: R, f: F) -> R
    where
        F: FnMut(R, Self::Item) -> R,
    {
        consumers::reduce(&self, init, f)
    }

    fn sum(self) -> Self::Item
    where
        Self::Item: Default + Add<Output = Self::Item>,
    {
        consumers::sum(&self)
    }

    fn group_by<K, F>(self, key: F) -> HashMap<K, Vec<Self::Item>>
    where
        F: FnMut(&Self::Item) -> K,
        K: Eq + Hash,
    {
        consumers::group_by(&self, key)
    }

    fn all<F>(self, predicate: F) -> bool
    where
        F: FnMut(Self::Item) -> bool,
    {
        consumers::all(&self, predicate)
    }

    fn any<F>(self, predicate: F) -> bool
    where
        F: FnMut(Self::Item) -> bool,
    {
        consumers::any(&self, predicate)
    }

    fn count(self) -> usize {
        consumers::count(&self)
    }

    fn first(self) -> Option<Self::Item> {
        consumers::first(&self)
    }

    fn to_vec(self) -> Vec<Self::Item> {
        consumers::to_vec(&self)
    }

    fn to_set(self) -> HashSet<Self::Item>
    where
        Self::Item: Eq + Hash,
    {
        consumers::to_set(&self)
    }
}

impl<P: PairedProducer> PairedProducerExt for P {
    fn keys(self) -> Keys<Self> {
        Keys { producer: self }
    }

    fn values(self) -> Values<Self> {
        Values { producer: self }
    }

    fn intersection_keys<P2>(self, other: P2) -> IntersectionKeys<Self, P2>
    where
        P2: PairedProducer<Key = Self::Key>,
        Self::Key: Eq + Hash,
    {
        IntersectionKeys {
            left: self,
            right: other,
        }
    }

    fn downcast_values<V>(self) -> DowncastValues<Self, V>
    where
        Self: PairedProducer<Value = crate::store::AnyValue>,
        V: std::any::Any + Clone,
    {
        DowncastValues {
            producer: self,
            _phantom: PhantomData,
        }
    }

    fn to_map(self) -> HashMap<Self::Key, Self::Value>
    where
        Self::Key: Eq + Hash,
    {
        consumers::to_map(&self)
    }
}
