//! # Directory Store - Equality and Order Indices
//!
//! ## Data Structures
//!
//! - `rows`: O(1) lookup by `RowId`
//! - `index_by_key`: column -> value -> set of rows holding that value
//! - `order_by_key`: integer column -> ascending and descending `BTreeSet`s
//!
//! Order lists are keyed by `(value, RowId)`, so rows with equal values stay
//! distinct entries and ties come out in insertion order.
//!
//! ## Query Strategy
//!
//! 1. Consult the equality bucket of every filter and the order list of every
//!    order key; any column without an index at all means an empty result.
//! 2. Scan the smallest of those, first one wins on ties.
//! 3. Keep rows matching every filter, then sort by the order keys.

use super::query::{Direction, Filters, Orders};
use super::value::{ColumnValue, Row};
use num_bigint::BigInt;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Store-issued identity of a stored row.
///
/// Removal works by identity, never by value: two equal rows are two rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

/// Both sort orders of one integer column.
#[derive(Debug, Default)]
struct OrderIndex {
    ascending: BTreeSet<(BigInt, RowId)>,
    descending: BTreeSet<(Reverse<BigInt>, RowId)>,
}

impl OrderIndex {
    fn insert(&mut self, value: &BigInt, id: RowId) {
        self.ascending.insert((value.clone(), id));
        self.descending.insert((Reverse(value.clone()), id));
    }

    fn remove(&mut self, value: &BigInt, id: RowId) {
        self.ascending.remove(&(value.clone(), id));
        self.descending.remove(&(Reverse(value.clone()), id));
    }

    fn is_empty(&self) -> bool {
        self.ascending.is_empty()
    }
}

/// Scan base chosen by `smallest()`.
enum Candidates<'a> {
    All,
    Bucket(&'a HashSet<RowId>),
    Ascending(&'a BTreeSet<(BigInt, RowId)>),
    Descending(&'a BTreeSet<(Reverse<BigInt>, RowId)>),
}

impl Candidates<'_> {
    fn len(&self) -> Option<usize> {
        match self {
            Candidates::All => None,
            Candidates::Bucket(b) => Some(b.len()),
            Candidates::Ascending(a) => Some(a.len()),
            Candidates::Descending(d) => Some(d.len()),
        }
    }

    fn is_smaller_than(&self, other: &Candidates<'_>) -> bool {
        match (self.len(), other.len()) {
            (Some(mine), Some(theirs)) => mine < theirs,
            (Some(_), None) => true,
            _ => false,
        }
    }

    fn ids(&self, store: &DirectoryStore) -> Vec<RowId> {
        match self {
            Candidates::All => {
                let mut ids: Vec<RowId> = store.rows.keys().copied().collect();
                ids.sort_unstable();
                ids
            }
            Candidates::Bucket(b) => b.iter().copied().collect(),
            Candidates::Ascending(a) => a.iter().map(|(_, id)| *id).collect(),
            Candidates::Descending(d) => d.iter().map(|(_, id)| *id).collect(),
        }
    }
}

/// In-memory multi-column directory.
#[derive(Debug, Default)]
pub struct DirectoryStore {
    rows: HashMap<RowId, Row>,
    next_id: u64,
    index_by_key: HashMap<String, HashMap<ColumnValue, HashSet<RowId>>>,
    order_by_key: HashMap<String, OrderIndex>,
}

impl DirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.rows.get(&id)
    }

    /// Stores a row and indexes every column it holds.
    pub fn append(&mut self, row: Row) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;

        for (key, value) in row.iter() {
            if let ColumnValue::Integer(i) = value {
                self.order_by_key
                    .entry(key.clone())
                    .or_default()
                    .insert(i, id);
            }

            self.index_by_key
                .entry(key.clone())
                .or_default()
                .entry(value.clone())
                .or_default()
                .insert(id);
        }

        self.rows.insert(id, row);
        id
    }

    /// Removes a row from every index it participates in.
    ///
    /// Removing an id that is not stored is a no-op.
    pub fn remove(&mut self, id: RowId) -> Option<Row> {
        let row = self.rows.remove(&id)?;

        for (key, value) in row.iter() {
            if let ColumnValue::Integer(i) = value {
                if let Some(order) = self.order_by_key.get_mut(key) {
                    order.remove(i, id);
                    if order.is_empty() {
                        self.order_by_key.remove(key);
                    }
                }
            }

            if let Some(index) = self.index_by_key.get_mut(key) {
                if let Some(bucket) = index.get_mut(value) {
                    bucket.remove(&id);
                    if bucket.is_empty() {
                        index.remove(value);
                    }
                }
                if index.is_empty() {
                    self.index_by_key.remove(key);
                }
            }
        }

        Some(row)
    }

    /// Finds the smallest set of rows based on the orders and filters.
    ///
    /// Returns `None` when the result is known to be empty.
    fn smallest(&self, orders: &Orders, filters: &Filters) -> Option<Candidates<'_>> {
        let mut smallest = Candidates::All;

        for (key, value) in filters.iter() {
            let bucket = self.index_by_key.get(key)?.get(value)?;
            let candidate = Candidates::Bucket(bucket);
            if candidate.is_smaller_than(&smallest) {
                smallest = candidate;
            }
        }

        for (key, direction) in orders.iter() {
            let order = self.order_by_key.get(key)?;
            let candidate = match direction {
                Direction::Ascending => Candidates::Ascending(&order.ascending),
                Direction::Descending => Candidates::Descending(&order.descending),
            };
            if candidate.is_smaller_than(&smallest) {
                smallest = candidate;
            }
        }

        Some(smallest)
    }

    /// Runs a query: candidate selection, exact-match filter, multi-key sort.
    ///
    /// With no orders and no filters every stored row is returned. Rows that
    /// lack an integer for some ordered column are left out.
    pub fn query(&self, orders: &Orders, filters: &Filters) -> Vec<&Row> {
        let Some(candidates) = self.smallest(orders, filters) else {
            return Vec::new();
        };

        let mut matched: Vec<(&Row, Vec<&BigInt>)> = candidates
            .ids(self)
            .into_iter()
            .filter_map(|id| self.rows.get(&id))
            .filter(|row| filters.iter().all(|(key, value)| row.get(key) == Some(value)))
            .filter_map(|row| {
                let keys = orders
                    .iter()
                    .map(|(key, _)| row.integer(key))
                    .collect::<Option<Vec<_>>>()?;
                Some((row, keys))
            })
            .collect();

        matched.sort_by(|(_, a), (_, b)| compare_keys(orders, a, b));
        matched.into_iter().map(|(row, _)| row).collect()
    }
}

/// First key decides, later keys break ties.
fn compare_keys(orders: &Orders, a: &[&BigInt], b: &[&BigInt]) -> Ordering {
    for ((_, direction), (x, y)) in orders.iter().zip(a.iter().zip(b.iter())) {
        let ordering = match direction {
            Direction::Ascending => x.cmp(y),
            Direction::Descending => y.cmp(x),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
