//! Determinism utilities: stable ordering & ordered grouping.
//!
//! This module is **I/O-free**. It provides:
//! - A descending order for `f64` scores (signed zeros equal, NaN last)
//! - Ordered group-by that materializes `key → row indices` (first-seen order
//!   inside each group)
//! - A small sortedness check used by artifact builders

use core::cmp::Ordering;
use std::collections::BTreeMap;

/* -------------------------------------------------------------------------- */
/*                               Stable Ordering                              */
/* -------------------------------------------------------------------------- */

/// Descending order over scores. `-0.0` and `0.0` compare equal; NaN sorts
/// after every number. Pair with a **stable** sort so equal scores keep their
/// input order.
#[inline]
pub fn cmp_score_desc(a: f64, b: f64) -> Ordering {
    match b.partial_cmp(&a) {
        Some(ord) => ord,
        None => a.is_nan().cmp(&b.is_nan()),
    }
}

/* -------------------------------------------------------------------------- */
/*                                Ordered group-by                            */
/* -------------------------------------------------------------------------- */

/// Group `items` by `key`, returning an ordered map of key → indices into `items`.
/// Indices inside each group are ascending (input order).
pub fn group_indices_by<T, K, F>(items: &[T], mut key: F) -> BTreeMap<K, Vec<usize>>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (i, it) in items.iter().enumerate() {
        groups.entry(key(it)).or_default().push(i);
    }
    groups
}

/// True iff `xs` is non-decreasing under `cmp`.
pub fn is_sorted_by<T, F>(xs: &[T], mut cmp: F) -> bool
where
    F: FnMut(&T, &T) -> Ordering,
{
    xs.windows(2).all(|w| cmp(&w[0], &w[1]) != Ordering::Greater)
}
