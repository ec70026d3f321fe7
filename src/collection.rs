//! Indicator collections
//!
//! An [`IndicatorCollection`] is an ordered, de-duplicated, key-addressable set
//! of indicators drawn from one or more runs.
//!
//! ```rust
//! use trueno_analytics::{Indicator, IndicatorCollection, IndicatorKind};
//!
//! let a = IndicatorCollection::new([
//!     Indicator::new("run-a", "train_loss", IndicatorKind::Scalar),
//!     Indicator::new("run-a", "valid_loss", IndicatorKind::Scalar),
//! ]);
//! let b = IndicatorCollection::new([
//!     Indicator::new("run-b", "train_loss", IndicatorKind::Scalar),
//! ]);
//!
//! let both = &a + &b;
//! assert_eq!(both.len(), 3);
//! assert_eq!(both.get("train_loss").len(), 2);
//! assert!(both.get("missing").is_empty());
//! ```

use crate::indicator::{Indicator, IndicatorId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::ops::{Add, AddAssign};

/// Ordered, de-duplicated set of indicators.
///
/// Equality of elements is by `(run id, key)`. Iteration order is first-seen
/// insertion order. Union produces a new collection and never mutates its
/// operands.
#[derive(Debug, Clone, Default)]
pub struct IndicatorCollection {
    items: Vec<Indicator>,
    ids: FxHashSet<IndicatorId>,
    by_key: FxHashMap<String, Vec<usize>>,
}

impl IndicatorCollection {
    /// Create an empty collection (the seed for folding unions).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a collection, dropping duplicates while keeping first-seen order.
    #[must_use]
    pub fn new(indicators: impl IntoIterator<Item = Indicator>) -> Self {
        let mut collection = Self::empty();
        collection.extend(indicators);
        collection
    }

    fn push(&mut self, indicator: Indicator) {
        if self.ids.contains(indicator.id()) {
            return;
        }
        self.ids.insert(indicator.id().clone());
        self.by_key
            .entry(indicator.key().to_string())
            .or_default()
            .push(self.items.len());
        self.items.push(indicator);
    }

    /// Number of indicators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the collection has no indicators.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check membership by `(run id, key)`.
    #[must_use]
    pub fn contains(&self, indicator: &Indicator) -> bool {
        self.ids.contains(indicator.id())
    }

    /// Iterate indicators in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Indicator> {
        self.items.iter()
    }

    /// Indicators as a slice, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Indicator] {
        &self.items
    }

    /// Sub-collection of every indicator whose key equals `key`.
    ///
    /// When several runs log the same key, all of them are returned. An
    /// unknown key yields an empty collection.
    #[must_use]
    pub fn get(&self, key: &str) -> Self {
        self.by_key.get(key).map_or_else(Self::empty, |positions| {
            Self::new(positions.iter().map(|&i| self.items[i].clone()))
        })
    }

    /// Distinct keys in first-seen order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        self.items
            .iter()
            .map(Indicator::key)
            .filter(|key| seen.insert(*key))
            .collect()
    }

    /// Distinct run ids in first-seen order.
    #[must_use]
    pub fn run_ids(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        self.items
            .iter()
            .map(Indicator::run_id)
            .filter(|run_id| seen.insert(*run_id))
            .collect()
    }

    /// Union: `self`'s indicators followed by those of `other` not already present.
    ///
    /// An empty operand returns the other operand unchanged.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        let mut merged = self.clone();
        merged.extend(other.iter().cloned());
        merged
    }
}

impl PartialEq for IndicatorCollection {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for IndicatorCollection {}

impl Extend<Indicator> for IndicatorCollection {
    fn extend<T: IntoIterator<Item = Indicator>>(&mut self, iter: T) {
        for indicator in iter {
            self.push(indicator);
        }
    }
}

impl FromIterator<Indicator> for IndicatorCollection {
    fn from_iter<T: IntoIterator<Item = Indicator>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl IntoIterator for IndicatorCollection {
    type Item = Indicator;
    type IntoIter = std::vec::IntoIter<Indicator>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a IndicatorCollection {
    type Item = &'a Indicator;
    type IntoIter = std::slice::Iter<'a, Indicator>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Add for IndicatorCollection {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        if self.is_empty() {
            return rhs;
        }
        self.extend(rhs);
        self
    }
}

impl Add<&IndicatorCollection> for IndicatorCollection {
    type Output = Self;

    fn add(mut self, rhs: &IndicatorCollection) -> Self {
        if self.is_empty() {
            return rhs.clone();
        }
        self.extend(rhs.iter().cloned());
        self
    }
}

impl Add for &IndicatorCollection {
    type Output = IndicatorCollection;

    fn add(self, rhs: Self) -> IndicatorCollection {
        self.union(rhs)
    }
}

impl AddAssign<&IndicatorCollection> for IndicatorCollection {
    fn add_assign(&mut self, rhs: &IndicatorCollection) {
        self.extend(rhs.iter().cloned());
    }
}
