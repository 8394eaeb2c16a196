//! Terminal operations that drive a producer and compute a result.
//!
//! Reduce, Sum, GroupBy and the materializers consume the whole producer.
//! All, Any and First stop it as soon as the answer is known.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::ops::Add;

use crate::traits::{PairedProducer, Producer};

/// Fold every item into an accumulator, left to right
pub fn reduce<P, R, F>(producer: &P, init: R, mut f: F) -> R
where
    P: Producer + ?Sized,
    F: FnMut(R, P::Item) -> R,
{
    // Always `Some` between items.
    let mut acc = Some(init);
    producer.drive(|item| {
        if let Some(prev) = acc.take() {
            acc = Some(f(prev, item));
        }
        true
    });
    match acc {
        Some(acc) => acc,
        None => unreachable!("accumulator is restored after every item"),
    }
}

/// Add up every item, starting from the type's zero (`Default`)
pub fn sum<P>(producer: &P) -> P::Item
where
    P: Producer + ?Sized,
    P::Item: Default + Add<Output = P::Item>,
{
    reduce(producer, Default::default(), |acc, item| acc + item)
}

/// Bucket items by `key`; each bucket keeps first-seen order
pub fn group_by<P, K, F>(producer: &P, mut key: F) -> HashMap<K, Vec<P::Item>>
where
    P: Producer + ?Sized,
    F: FnMut(&P::Item) -> K,
    K: Eq + Hash,
{
    let mut groups: HashMap<K, Vec<P::Item>> = HashMap::new();
    producer.drive(|item| {
        groups.entry(key(&item)).or_default().push(item);
        true
    });
    groups
}

/// `false` at the first item failing `predicate`, `true` otherwise
pub fn all<P, F>(producer: &P, predicate: F) -> bool
where
    P: Producer + ?Sized,
    F: FnMut(P::Item) -> bool,
{
    producer.drive(predicate)
}

/// `true` at the first item satisfying `predicate`, `false` otherwise
pub fn any<P, F>(producer: &P, mut predicate: F) -> bool
where
    P: Producer + ?Sized,
    F: FnMut(P::Item) -> bool,
{
    !producer.drive(|item| !predicate(item))
}

pub fn count<P>(producer: &P) -> usize
where
    P: Producer + ?Sized,
{
    let mut n = 0;
    producer.drive(|_| {
        n += 1;
        true
    });
    n
}

pub fn first<P>(producer: &P) -> Option<P::Item>
where
    P: Producer + ?Sized,
{
    let mut found = None;
    producer.drive(|item| {
        found = Some(item);
        false
    });
    found
}

pub fn to_vec<P>(producer: &P) -> Vec<P::Item>
where
    P: Producer + ?Sized,
{
    let mut items = Vec::new();
    producer.drive(|item| {
        items.push(item);
        true
    });
    items
}

pub fn to_set<P>(producer: &P) -> HashSet<P::Item>
where
    P: Producer + ?Sized,
    P::Item: Eq + Hash,
{
    let mut items = HashSet::new();
    producer.drive(|item| {
        items.insert(item);
        true
    });
    items
}

/// Collect pairs into a map; a repeated key overwrites the earlier value
pub fn to_map<P>(producer: &P) -> HashMap<P::Key, P::Value>
where
    P: PairedProducer + ?Sized,
    P::Key: Eq + Hash,
{
    let mut map = HashMap::new();
    producer.drive_pairs(|key, value| {
        map.insert(key, value);
        true
    });
    map
}

/// Keys of `set` that also appear as keys of `producer`.
///
/// Eager: the paired producer is always driven to exhaustion.
pub fn intersection_set<K, S, P>(set: &HashSet<K, S>, producer: P) -> HashSet<K>
where
    K: Eq + Hash,
    S: std::hash::BuildHasher,
    P: PairedProducer<Key = K>,
{
    let mut common = HashSet::new();
    producer.drive_pairs(|key, _| {
        if set.contains(&key) {
            common.insert(key);
        }
        true
    });
    common
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::producers::{empty, from_iter, from_pairs};
    use crate::traits::ProducerExt;

    #[test]
    fn test_reduce() {
        let total = from_iter(vec![1, 2, 3, 4]).reduce(0, |acc, x| acc + x);
        assert_eq!(total, 10);
    }

    #[test]
    fn test_reduce_is_left_fold() {
        let joined = from_iter(["a", "b", "c"]).reduce(String::from(">"), |acc, s| acc + s);
        assert_eq!(joined, ">abc");
    }

    #[test]
    fn test_reduce_empty_returns_init() {
        assert_eq!(reduce(&empty::<i32>(), 42, |acc, x| acc + x), 42);
    }

    #[test]
    fn test_sum_floats() {
        let total = from_iter(vec![1.5, 2.5, 3.0]).sum();
        assert_eq!(total, 7.0);
    }

    #[test]
    fn test_sum_empty_is_zero() {
        assert_eq!(sum(&empty::<u64>()), 0);
    }

    #[test]
    fn test_group_by_first_char() {
        let words = from_iter(vec!["apple", "ant", "banana", "bat"]);
        let groups = words.group_by(|w| w.chars().next());

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&Some('a')], vec!["apple", "ant"]);
        assert_eq!(groups[&Some('b')], vec!["banana", "bat"]);
    }

    #[test]
    fn test_group_by_empty() {
        assert!(group_by(&empty::<i32>(), |x| *x).is_empty());
    }

    #[test]
    fn test_all() {
        assert!(from_iter(vec![2, 4, 6]).all(|x| x % 2 == 0));
        assert!(!from_iter(vec![2, 3, 6]).all(|x| x % 2 == 0));
        assert!(all(&empty::<i32>(), |_| false));
    }

    #[test]
    fn test_all_short_circuits() {
        let mut checked = Vec::new();
        let result = all(&from_iter(1..10), |x| {
            checked.push(x);
            x < 3
        });
        assert!(!result);
        assert_eq!(checked, vec![1, 2, 3]);
    }

    #[test]
    fn test_any() {
        assert!(from_iter(vec![1, 3, 5, 6]).any(|x| x % 2 == 0));
        assert!(!from_iter(vec![1, 3, 5]).any(|x| x % 2 == 0));
        assert!(!any(&empty::<i32>(), |_| true));
    }

    #[test]
    fn test_any_short_circuits() {
        let mut checked = 0;
        assert!(any(&from_iter(0..), |x| {
            checked += 1;
            x == 4
        }));
        assert_eq!(checked, 5);
    }

    #[test]
    fn test_count_first_and_to_set() {
        let producer = from_iter(vec![3, 1, 3]);
        assert_eq!(count(&producer), 3);
        assert_eq!(first(&producer), Some(3));
        assert_eq!(to_set(&producer), HashSet::from([1, 3]));
        assert_eq!(first(&empty::<i32>()), None);
    }

    #[test]
    fn test_to_map_last_write_wins() {
        let pairs = from_pairs(vec![("a", 1), ("b", 2), ("a", 3)]);
        let map = to_map(&pairs);
        assert_eq!(map, HashMap::from([("a", 3), ("b", 2)]));
    }

    #[test]
    fn test_intersection_set() {
        let wanted = HashSet::from(["a", "c", "z"]);
        let pairs = from_pairs(vec![("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(intersection_set(&wanted, pairs), HashSet::from(["a", "c"]));
    }
}
