//! Row records and the identity-preserving row store.
//!
//! The [`RowStore`] owns the authoritative ordered sequence of [`Row`]
//! records. Reconciling a new item collection against the previous one by
//! identity key creates, relocates or retires rows without discarding the
//! display state of matched items — which is what lets a host renderer
//! recycle visual elements instead of rebuilding them.

use std::collections::HashMap;
use std::sync::Arc;

use trellis_core::logging::targets;

use super::key::{IdentityResolver, RowKey};

/// One row per logical item currently known to the store.
///
/// The display flags (`matched`, `paged`, `selected`, `anchor`) are
/// recomputed by the corresponding pipeline stages; the identity key is
/// derived once and immutable for the row's lifetime.
pub struct Row<T> {
    /// Handle to the caller-owned item. Updated in place when an item with
    /// the same identity key reappears under a new handle.
    pub(crate) item: Arc<T>,
    /// Stable identity key, derived via [`IdentityResolver`].
    key: RowKey,
    /// Position within the last reconciled raw item collection.
    pub(crate) actual_index: usize,
    /// Dense 0-based position among matched rows in current order.
    /// `None` while the row is unmatched.
    pub(crate) display_index: Option<usize>,
    /// Cached searchable/sortable text, supplied by the content provider.
    /// `None` until acquired, and re-invalidated when the item handle
    /// changes.
    pub(crate) content: Option<String>,
    pub(crate) matched: bool,
    pub(crate) paged: bool,
    pub(crate) selected: bool,
    pub(crate) anchor: bool,
}

impl<T> Row<T> {
    fn new(item: Arc<T>, key: RowKey, actual_index: usize) -> Self {
        Self {
            item,
            key,
            actual_index,
            display_index: None,
            content: None,
            matched: false,
            paged: false,
            selected: false,
            anchor: false,
        }
    }

    /// The caller-owned item behind this row.
    pub fn item(&self) -> &Arc<T> {
        &self.item
    }

    /// The row's stable identity key.
    pub fn key(&self) -> &RowKey {
        &self.key
    }

    /// Position within the last reconciled item collection.
    pub fn actual_index(&self) -> usize {
        self.actual_index
    }

    /// Dense position among matched rows in current filtered+sorted order,
    /// or `None` if the row is unmatched.
    pub fn display_index(&self) -> Option<usize> {
        self.display_index
    }

    /// Cached row content, once acquired from the content provider.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Whether the row matches the active filter.
    pub fn matched(&self) -> bool {
        self.matched
    }

    /// Whether the row falls inside the current page window.
    pub fn paged(&self) -> bool {
        self.paged
    }

    /// Whether the row's item is in the selection.
    pub fn selected(&self) -> bool {
        self.selected
    }

    /// Whether this row is the selection anchor (the most recently
    /// selected item still present).
    pub fn anchor(&self) -> bool {
        self.anchor
    }
}

/// The authoritative ordered sequence of rows plus a cached matched count.
pub struct RowStore<T> {
    pub(crate) rows: Vec<Row<T>>,
    pub(crate) matched_count: usize,
}

impl<T> Default for RowStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RowStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            matched_count: 0,
        }
    }

    /// The rows in current order.
    pub fn rows(&self) -> &[Row<T>] {
        &self.rows
    }

    /// Number of rows currently matching the filter.
    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    /// Number of rows in the store.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Send + Sync + 'static> RowStore<T> {
    /// Reconciles the store against a new item collection.
    ///
    /// For each item, an existing row with the same identity key is reused:
    /// its `actual_index` is updated, and if the item handle itself changed
    /// the handle is swapped in and the cached content invalidated for
    /// re-acquisition. Items without an existing row get a fresh one with
    /// default flags. Rows whose key no longer appears are retired.
    ///
    /// The resulting sequence follows `items` order, not prior row order.
    /// Two distinct input items resolving to the same key is a caller
    /// error; the later one wins.
    pub fn reconcile(&mut self, items: &[Arc<T>], resolver: &IdentityResolver<T>) {
        let mut previous: HashMap<RowKey, Row<T>> = self
            .rows
            .drain(..)
            .map(|row| (row.key.clone(), row))
            .collect();

        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let key = resolver.key_of(item);
            let row = match previous.remove(&key) {
                Some(mut row) => {
                    if !Arc::ptr_eq(&row.item, item) {
                        row.item = item.clone();
                        row.content = None;
                    }
                    row.actual_index = index;
                    row
                }
                None => Row::new(item.clone(), key, index),
            };
            rows.push(row);
        }

        if !previous.is_empty() {
            tracing::trace!(
                target: targets::MODEL,
                retired = previous.len(),
                "reconcile retired rows"
            );
        }

        self.rows = rows;
    }

    /// Finds the row holding the given identity key.
    pub fn row_by_key(&self, key: &RowKey) -> Option<&Row<T>> {
        self.rows.iter().find(|row| row.key == *key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(names: &[&str]) -> Vec<Arc<String>> {
        names.iter().map(|n| Arc::new(n.to_string())).collect()
    }

    fn by_value() -> IdentityResolver<String> {
        IdentityResolver::with_key_fn(|s: &String| RowKey::from(s.as_str()))
    }

    #[test]
    fn test_reconcile_creates_rows_in_items_order() {
        let mut store = RowStore::new();
        let resolver = by_value();
        store.reconcile(&items(&["b", "a", "c"]), &resolver);

        let names: Vec<_> = store.rows().iter().map(|r| r.item().as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        let indices: Vec<_> = store.rows().iter().map(|r| r.actual_index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(store.rows().iter().all(|r| !r.matched() && !r.paged()));
    }

    #[test]
    fn test_reconcile_preserves_state_across_reorder() {
        let mut store = RowStore::new();
        let resolver = by_value();
        let first = items(&["a", "b"]);
        store.reconcile(&first, &resolver);

        store.rows[0].matched = true;
        store.rows[0].selected = true;
        store.rows[0].content = Some("a".to_string());

        // Same handles, reversed order: state and content survive.
        let reordered = vec![first[1].clone(), first[0].clone()];
        store.reconcile(&reordered, &resolver);

        let a = store.row_by_key(&RowKey::from("a")).unwrap();
        assert!(a.matched());
        assert!(a.selected());
        assert_eq!(a.content(), Some("a"));
        assert_eq!(a.actual_index(), 1);
    }

    #[test]
    fn test_reconcile_invalidates_content_on_new_handle() {
        let mut store = RowStore::new();
        let resolver = by_value();
        store.reconcile(&items(&["a"]), &resolver);
        store.rows[0].content = Some("a".to_string());
        store.rows[0].matched = true;

        // A freshly allocated item with the same key: the row survives but
        // its content must be re-acquired.
        store.reconcile(&items(&["a"]), &resolver);
        assert_eq!(store.len(), 1);
        assert_eq!(store.rows()[0].content(), None);
        assert!(store.rows()[0].matched());
    }

    #[test]
    fn test_reconcile_retires_missing_keys() {
        let mut store = RowStore::new();
        let resolver = by_value();
        store.reconcile(&items(&["a", "b", "c"]), &resolver);
        store.reconcile(&items(&["a", "c"]), &resolver);

        assert_eq!(store.len(), 2);
        assert!(store.row_by_key(&RowKey::from("b")).is_none());
    }

    #[test]
    fn test_reconcile_pointer_identity() {
        let mut store = RowStore::new();
        let resolver = IdentityResolver::<String>::new();
        let first = items(&["a", "b"]);
        store.reconcile(&first, &resolver);
        store.rows[1].content = Some("b".to_string());

        // Reusing the same handles preserves rows; a fresh allocation is a
        // new identity under pointer resolution.
        let next = vec![first[1].clone(), Arc::new("a".to_string())];
        store.reconcile(&next, &resolver);

        assert_eq!(store.len(), 2);
        assert_eq!(store.rows()[0].content(), Some("b"));
        assert_eq!(store.rows()[1].content(), None);
    }
}
