//! Session-facing directory service.
//!
//! Wraps the [`DirectoryStore`] behind one exclusive lock and tracks which
//! connection announced which record, so a re-announce replaces the old row
//! and a teardown releases everything the connection owned.

use crate::domain::{DirectoryStore, Filters, Orders, Row, RowId};
use parking_lot::RwLock;
use shared_types::ConnectionId;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
struct DirectoryInner {
    store: DirectoryStore,
    owned: HashMap<ConnectionId, HashMap<String, RowId>>,
}

/// Thread-safe directory with per-connection record ownership.
#[derive(Debug, Default)]
pub struct SessionDirectory {
    inner: RwLock<DirectoryInner>,
}

impl SessionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announces `row` under `key` for `owner`.
    ///
    /// A previous row with the same key is fully removed from every index
    /// before the new one is inserted. Returns the replaced row, if any.
    pub fn announce(&self, owner: ConnectionId, key: String, row: Row) -> Option<Row> {
        let mut inner = self.inner.write();
        let DirectoryInner { store, owned } = &mut *inner;

        let records = owned.entry(owner).or_default();
        let previous = records.remove(&key).and_then(|id| store.remove(id));

        debug!(connection = %owner, key = %key, columns = row.len(), "Announcing record");
        let id = store.append(row);
        records.insert(key, id);

        previous
    }

    /// Runs a query and returns owned copies of the matching rows.
    pub fn search(&self, orders: &Orders, filters: &Filters) -> Vec<Row> {
        let inner = self.inner.read();
        inner
            .store
            .query(orders, filters)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Removes every record announced by `owner`. Returns how many were removed.
    pub fn release(&self, owner: &ConnectionId) -> usize {
        let mut inner = self.inner.write();
        let DirectoryInner { store, owned } = &mut *inner;

        let Some(records) = owned.remove(owner) else {
            return 0;
        };

        records
            .into_values()
            .filter_map(|id| store.remove(id))
            .count()
    }

    /// Number of live records across all owners.
    pub fn len(&self) -> usize {
        self.inner.read().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;

    fn record(name: &str, age: i64) -> Row {
        Row::new().with("name", name).with("age", age)
    }

    #[test]
    fn test_reannounce_replaces() {
        let directory = SessionDirectory::new();
        let owner = ConnectionId::new();

        assert!(directory
            .announce(owner, "node".into(), record("old", 1))
            .is_none());
        let replaced = directory.announce(owner, "node".into(), record("new", 2));

        assert_eq!(replaced, Some(record("old", 1)));
        assert_eq!(directory.len(), 1);
        assert!(directory
            .search(&Orders::new(), &Filters::new().with("name", "old"))
            .is_empty());
        assert_eq!(
            directory.search(&Orders::new(), &Filters::new().with("name", "new")),
            vec![record("new", 2)]
        );
    }

    #[test]
    fn test_same_key_different_owners_coexist() {
        let directory = SessionDirectory::new();
        directory.announce(ConnectionId::new(), "node".into(), record("a", 1));
        directory.announce(ConnectionId::new(), "node".into(), record("b", 2));
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn test_release_removes_only_owned_records() {
        let directory = SessionDirectory::new();
        let leaving = ConnectionId::new();
        let staying = ConnectionId::new();

        directory.announce(leaving, "a".into(), record("a", 1));
        directory.announce(leaving, "b".into(), record("b", 2));
        directory.announce(staying, "c".into(), record("c", 3));

        assert_eq!(directory.release(&leaving), 2);
        assert_eq!(directory.release(&leaving), 0);

        let rows = directory.search(
            &Orders::new().then("age", Direction::Ascending),
            &Filters::new(),
        );
        assert_eq!(rows, vec![record("c", 3)]);
    }
}
