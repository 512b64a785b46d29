//! Selection tracking for the row view-model.
//!
//! The [`SelectionTracker`] owns the ordered selection list. Order is
//! significant: the last entry is the anchor candidate, the row a sticky
//! page follows across recomputations. Rows never hold selection state of
//! their own beyond the `selected`/`anchor` flags rendered from this list.

use std::sync::Arc;

use trellis_core::logging::targets;

use super::key::{IdentityResolver, RowKey};
use super::row::Row;

/// How many items may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// At most one item.
    Single,
    /// Any number of items (default).
    #[default]
    Multi,
}

/// Owns the ordered selection list and its toggle semantics.
pub struct SelectionTracker<T> {
    items: Vec<Arc<T>>,
    mode: SelectionMode,
    always_one: bool,
}

impl<T> Default for SelectionTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SelectionTracker<T> {
    /// Creates an empty multi-selection tracker.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            mode: SelectionMode::default(),
            always_one: false,
        }
    }

    /// The selected items, in selection order. The last entry is the
    /// anchor candidate.
    pub fn items(&self) -> &[Arc<T>] {
        &self.items
    }

    /// Number of selected items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The current selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    pub(crate) fn set_always_one(&mut self, always_one: bool) {
        self.always_one = always_one;
    }

    /// Replaces the whole list (external selection assignment).
    pub(crate) fn set_items(&mut self, items: Vec<Arc<T>>) {
        self.items = items;
    }
}

impl<T: Send + Sync + 'static> SelectionTracker<T> {
    fn position_of(&self, key: &RowKey, resolver: &IdentityResolver<T>) -> Option<usize> {
        self.items
            .iter()
            .position(|item| resolver.key_of(item) == *key)
    }

    /// Toggles an item in or out of the selection.
    ///
    /// In single mode the list is cleared before the toggle rule applies,
    /// so the clicked item always ends up selected. Removing the sole
    /// remaining entry is refused while `always_one` is set.
    ///
    /// Returns `true` if the list actually changed.
    pub(crate) fn toggle(&mut self, item: &Arc<T>, resolver: &IdentityResolver<T>) -> bool {
        let before: Vec<RowKey> = self.items.iter().map(|it| resolver.key_of(it)).collect();

        if self.mode == SelectionMode::Single {
            self.items.clear();
        }

        let key = resolver.key_of(item);
        match self.position_of(&key, resolver) {
            Some(index) => {
                if !self.always_one || self.items.len() > 1 {
                    self.items.remove(index);
                }
            }
            None => self.items.push(item.clone()),
        }

        let after: Vec<RowKey> = self.items.iter().map(|it| resolver.key_of(it)).collect();
        before != after
    }

    /// Drops selection entries that no longer resolve to a row, and, when
    /// `drop_unmatched` is set, entries whose row no longer matches the
    /// active filter.
    ///
    /// Returns `true` if anything was pruned.
    pub(crate) fn prune(
        &mut self,
        rows: &[Row<T>],
        resolver: &IdentityResolver<T>,
        drop_unmatched: bool,
    ) -> bool {
        let before = self.items.len();
        self.items.retain(|item| {
            let key = resolver.key_of(item);
            match rows.iter().find(|row| *row.key() == key) {
                Some(row) => !drop_unmatched || row.matched(),
                None => false,
            }
        });

        let pruned = self.items.len() != before;
        if pruned {
            tracing::debug!(
                target: targets::MODEL,
                dropped = before - self.items.len(),
                "pruned stale selection entries"
            );
        }
        pruned
    }

    /// Renders `selected` and `anchor` flags onto the rows.
    ///
    /// The anchor is the last element of the selection list that still
    /// resolves to a row; at most one row carries the flag. This is a pure
    /// recompute — the list itself is not mutated.
    pub(crate) fn render(&self, rows: &mut [Row<T>], resolver: &IdentityResolver<T>) {
        let anchor_key = self
            .items
            .iter()
            .rev()
            .map(|item| resolver.key_of(item))
            .find(|key| rows.iter().any(|row| row.key() == key));

        for row in rows {
            row.selected = self.position_of(row.key(), resolver).is_some();
            row.anchor = row.selected && anchor_key.as_ref() == Some(row.key());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::row::RowStore;

    fn resolver() -> IdentityResolver<String> {
        IdentityResolver::with_key_fn(|s: &String| RowKey::from(s.as_str()))
    }

    fn arc(name: &str) -> Arc<String> {
        Arc::new(name.to_string())
    }

    fn store_of(names: &[&str]) -> RowStore<String> {
        let items: Vec<_> = names.iter().map(|n| arc(n)).collect();
        let mut store = RowStore::new();
        store.reconcile(&items, &resolver());
        for row in &mut store.rows {
            row.matched = true;
        }
        store
    }

    fn selected(tracker: &SelectionTracker<String>) -> Vec<&str> {
        tracker.items().iter().map(|it| it.as_str()).collect()
    }

    #[test]
    fn test_toggle_appends_then_removes() {
        let mut tracker = SelectionTracker::new();
        let r = resolver();

        assert!(tracker.toggle(&arc("a"), &r));
        assert!(tracker.toggle(&arc("b"), &r));
        assert_eq!(selected(&tracker), vec!["a", "b"]);

        assert!(tracker.toggle(&arc("a"), &r));
        assert_eq!(selected(&tracker), vec!["b"]);
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let mut tracker = SelectionTracker::new();
        let r = resolver();
        tracker.set_items(vec![arc("a"), arc("b")]);

        assert!(tracker.toggle(&arc("c"), &r));
        assert!(tracker.toggle(&arc("c"), &r));
        assert_eq!(selected(&tracker), vec!["a", "b"]);
    }

    #[test]
    fn test_single_mode_replaces_selection() {
        let mut tracker = SelectionTracker::new();
        tracker.set_mode(SelectionMode::Single);
        let r = resolver();

        assert!(tracker.toggle(&arc("b"), &r));
        assert!(tracker.toggle(&arc("c"), &r));
        assert_eq!(selected(&tracker), vec!["c"]);
    }

    #[test]
    fn test_single_mode_reselects_clicked_item() {
        let mut tracker = SelectionTracker::new();
        tracker.set_mode(SelectionMode::Single);
        let r = resolver();

        tracker.toggle(&arc("b"), &r);
        // Toggling the already-selected item keeps it selected; the list
        // is unchanged, so the toggle reports no change.
        assert!(!tracker.toggle(&arc("b"), &r));
        assert_eq!(selected(&tracker), vec!["b"]);
    }

    #[test]
    fn test_always_one_refuses_to_empty_selection() {
        let mut tracker = SelectionTracker::new();
        tracker.set_always_one(true);
        let r = resolver();

        tracker.toggle(&arc("a"), &r);
        assert!(!tracker.toggle(&arc("a"), &r));
        assert_eq!(selected(&tracker), vec!["a"]);

        // With two entries removal works again.
        tracker.toggle(&arc("b"), &r);
        assert!(tracker.toggle(&arc("a"), &r));
        assert_eq!(selected(&tracker), vec!["b"]);
    }

    #[test]
    fn test_prune_drops_absent_and_unmatched() {
        let mut tracker = SelectionTracker::new();
        let r = resolver();
        tracker.set_items(vec![arc("a"), arc("b"), arc("gone")]);

        let mut store = store_of(&["a", "b"]);
        store.rows[1].matched = false;

        // Absent entries always go; unmatched ones only when asked.
        assert!(tracker.prune(store.rows(), &r, false));
        assert_eq!(selected(&tracker), vec!["a", "b"]);

        assert!(tracker.prune(store.rows(), &r, true));
        assert_eq!(selected(&tracker), vec!["a"]);
    }

    #[test]
    fn test_render_flags_and_anchor() {
        let mut tracker = SelectionTracker::new();
        let r = resolver();
        tracker.set_items(vec![arc("c"), arc("a")]);

        let mut store = store_of(&["a", "b", "c"]);
        tracker.render(&mut store.rows, &r);

        let flags: Vec<_> = store
            .rows()
            .iter()
            .map(|row| (row.selected(), row.anchor()))
            .collect();
        // "a" is the last selection entry, so it is the anchor.
        assert_eq!(flags, vec![(true, true), (false, false), (true, false)]);
    }

    #[test]
    fn test_render_anchor_falls_back_to_last_present_entry() {
        let mut tracker = SelectionTracker::new();
        let r = resolver();
        tracker.set_items(vec![arc("c"), arc("gone")]);

        let mut store = store_of(&["a", "b", "c"]);
        tracker.render(&mut store.rows, &r);

        let anchors: Vec<_> = store.rows().iter().map(|row| row.anchor()).collect();
        assert_eq!(anchors, vec![false, false, true]);
    }
}
