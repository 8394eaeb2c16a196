//! Implementations of trait combinators defined in the traits module.

use std::any::Any;
use std::collections::HashSet;
use std::hash::Hash;

use crate::store::{any_as, AnyValue};
use crate::traits::{
    Distinct, DistinctBy, Downcast, DowncastValues, Filter, Intersection, IntersectionKeys, Keys,
    Map, PairedProducer, Producer, Take, Values,
};

// Map combinator implementation
impl<P, F, U> Producer for Map<P, F>
where
    P: Producer,
    F: Fn(P::Item) -> U,
{
    type Item = U;

    fn drive<S>(&self, mut sink: S) -> bool
    where
        S: FnMut(Self::Item) -> bool,
    {
        self.producer.drive(|item| sink((self.f)(item)))
    }
}

// Filter combinator implementation
impl<P, F> Producer for Filter<P, F>
where
    P: Producer,
    F: Fn(&P::Item) -> bool,
{
    type Item = P::Item;

    fn drive<S>(&self, mut sink: S) -> bool
    where
        S: FnMut(Self::Item) -> bool,
    {
        self.producer.drive(|item| {
            if (self.predicate)(&item) {
                return sink(item);
            }
            // Rejected items never reach the sink, so they cannot stop the pass
            true
        })
    }
}

// Distinct combinator implementation
impl<P> Producer for Distinct<P>
where
    P: Producer,
    P::Item: Eq + Hash + Clone,
{
    type Item = P::Item;

    fn drive<S>(&self, mut sink: S) -> bool
    where
        S: FnMut(Self::Item) -> bool,
    {
        let mut seen = HashSet::new();
        self.producer.drive(|item| {
            if !seen.insert(item.clone()) {
                return true;
            }
            sink(item)
        })
    }
}

// DistinctBy combinator implementation
impl<P, F, K> Producer for DistinctBy<P, F>
where
    P: Producer,
    F: Fn(&P::Item) -> K,
    K: Eq + Hash,
{
    type Item = P::Item;

    fn drive<S>(&self, mut sink: S) -> bool
    where
        S: FnMut(Self::Item) -> bool,
    {
        let mut seen = HashSet::new();
        self.producer.drive(|item| {
            if !seen.insert((self.key)(&item)) {
                return true;
            }
            sink(item)
        })
    }
}

// Take combinator implementation
impl<P> Producer for Take<P>
where
    P: Producer,
{
    type Item = P::Item;

    fn drive<S>(&self, mut sink: S) -> bool
    where
        S: FnMut(Self::Item) -> bool,
    {
        if self.limit == 0 {
            return true;
        }

        let mut taken = 0;
        let mut stopped = false;
        self.producer.drive(|item| {
            if !sink(item) {
                stopped = true;
                return false;
            }
            taken += 1;
            taken < self.limit
        });
        !stopped
    }
}

// Intersection combinator implementation
impl<P1, P2> Producer for Intersection<P1, P2>
where
    P1: Producer,
    P2: Producer<Item = P1::Item>,
    P1::Item: Eq + Hash,
{
    type Item = P1::Item;

    fn drive<S>(&self, mut sink: S) -> bool
    where
        S: FnMut(Self::Item) -> bool,
    {
        let mut members = HashSet::new();
        self.right.drive(|item| {
            members.insert(item);
            true
        });
        trace_event!(members = members.len(), "intersection: right side materialized");

        self.left.drive(|item| {
            if members.contains(&item) {
                return sink(item);
            }
            true
        })
    }
}

// IntersectionKeys combinator implementation
impl<P1, P2> Producer for IntersectionKeys<P1, P2>
where
    P1: PairedProducer,
    P2: PairedProducer<Key = P1::Key>,
    P1::Key: Eq + Hash,
{
    type Item = P1::Key;

    fn drive<S>(&self, mut sink: S) -> bool
    where
        S: FnMut(Self::Item) -> bool,
    {
        let mut members = HashSet::new();
        self.right.drive_pairs(|key, _| {
            members.insert(key);
            true
        });
        trace_event!(members = members.len(), "intersection_keys: right side materialized");

        self.left.drive_pairs(|key, _| {
            if members.contains(&key) {
                return sink(key);
            }
            true
        })
    }
}

// Keys projection implementation
impl<P> Producer for Keys<P>
where
    P: PairedProducer,
{
    type Item = P::Key;

    fn drive<S>(&self, mut sink: S) -> bool
    where
        S: FnMut(Self::Item) -> bool,
    {
        self.producer.drive_pairs(|key, _| sink(key))
    }
}

// Values projection implementation
impl<P> Producer for Values<P>
where
    P: PairedProducer,
{
    type Item = P::Value;

    fn drive<S>(&self, mut sink: S) -> bool
    where
        S: FnMut(Self::Item) -> bool,
    {
        self.producer.drive_pairs(|_, value| sink(value))
    }
}

// Downcast combinator implementation
impl<P, T> Producer for Downcast<P, T>
where
    P: Producer<Item = AnyValue>,
    T: Any + Clone,
{
    type Item = T;

    fn drive<S>(&self, mut sink: S) -> bool
    where
        S: FnMut(Self::Item) -> bool,
    {
        self.producer.drive(|value| sink(any_as::<T>(&*value)))
    }
}

// DowncastValues combinator implementation
impl<P, V> PairedProducer for DowncastValues<P, V>
where
    P: PairedProducer<Value = AnyValue>,
    V: Any + Clone,
{
    type Key = P::Key;
    type Value = V;

    fn drive_pairs<S>(&self, mut sink: S) -> bool
    where
        S: FnMut(Self::Key, Self::Value) -> bool,
    {
        self.producer
            .drive_pairs(|key, value| sink(key, any_as::<V>(&*value)))
    }
}
