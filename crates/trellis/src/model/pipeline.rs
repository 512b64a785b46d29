//! Filter and sort stages of the row pipeline.
//!
//! Both stages operate on the full row sequence. Filtering marks rows
//! matched or unmatched against a case-insensitive substring predicate;
//! sorting reorders the whole sequence (matched and unmatched alike, so a
//! later filter change never needs a re-sort). After either stage runs,
//! display indices are renumbered densely over the matched rows in the
//! resulting order, since pagination must reflect the currently visible
//! order.

use std::cmp::Ordering;
use std::sync::Arc;

use super::row::{Row, RowStore};

/// Sort order for the row sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Rows stay in reconciliation (insertion) order.
    #[default]
    None,
    /// Ascending by row content.
    Ascending,
    /// Descending by row content.
    Descending,
}

/// Type alias for a row comparator.
///
/// The comparator defines the ascending order; [`SortOrder::Descending`]
/// reverses it.
pub type CompareFn<T> = Arc<dyn Fn(&Row<T>, &Row<T>) -> Ordering + Send + Sync>;

/// The default comparator: case-aware lexicographic comparison on cached
/// row content.
///
/// Content is compared case-insensitively first, with the original casing
/// as a tie-breaker. Rows without content sort before rows with content.
pub fn default_compare<T>() -> CompareFn<T> {
    Arc::new(|a, b| {
        compare_content(a.content().unwrap_or(""), b.content().unwrap_or(""))
    })
}

fn compare_content(a: &str, b: &str) -> Ordering {
    let folded = a.to_lowercase().cmp(&b.to_lowercase());
    if folded == Ordering::Equal { a.cmp(b) } else { folded }
}

impl<T> RowStore<T> {
    /// Filter stage: marks each row matched or unmatched against `term`.
    ///
    /// An empty term matches every row. Must run after content acquisition;
    /// a row whose content has not been acquired only matches the empty
    /// term.
    pub(crate) fn apply_filter(&mut self, term: &str) {
        let term = term.to_lowercase();
        for row in &mut self.rows {
            row.matched = term.is_empty()
                || row
                    .content
                    .as_deref()
                    .is_some_and(|content| content.to_lowercase().contains(&term));
        }
    }

    /// Sort stage: stable-sorts the full row sequence.
    ///
    /// With [`SortOrder::None`] the sequence is restored to reconciliation
    /// order (by `actual_index`), so flipping sort off does not require a
    /// structural rebuild.
    pub(crate) fn apply_sort(&mut self, order: SortOrder, compare: &CompareFn<T>) {
        match order {
            SortOrder::None => self.rows.sort_by_key(|row| row.actual_index),
            SortOrder::Ascending => self.rows.sort_by(|a, b| compare(a, b)),
            SortOrder::Descending => self.rows.sort_by(|a, b| compare(a, b).reverse()),
        }
    }

    /// Renumbers display indices densely over matched rows in current
    /// order and refreshes the cached matched count.
    pub(crate) fn renumber(&mut self) {
        let mut next = 0;
        for row in &mut self.rows {
            row.display_index = if row.matched {
                let index = next;
                next += 1;
                Some(index)
            } else {
                None
            };
        }
        self.matched_count = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::key::{IdentityResolver, RowKey};

    fn store_of(names: &[&str]) -> RowStore<String> {
        let resolver = IdentityResolver::with_key_fn(|s: &String| RowKey::from(s.as_str()));
        let items: Vec<_> = names.iter().map(|n| Arc::new(n.to_string())).collect();
        let mut store = RowStore::new();
        store.reconcile(&items, &resolver);
        for row in &mut store.rows {
            row.content = Some(row.item.as_str().to_string());
        }
        store
    }

    fn contents(store: &RowStore<String>) -> Vec<&str> {
        store.rows().iter().map(|r| r.content().unwrap()).collect()
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let mut store = store_of(&["Alice", "Bob", "Carol"]);
        store.apply_filter("");
        store.renumber();

        assert!(store.rows().iter().all(|r| r.matched()));
        assert_eq!(store.matched_count(), 3);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let mut store = store_of(&["Alice", "Bob", "Carol"]);
        store.apply_filter("AL");
        store.renumber();

        let matched: Vec<_> = store
            .rows()
            .iter()
            .filter(|r| r.matched())
            .map(|r| r.content().unwrap())
            .collect();
        assert_eq!(matched, vec!["Alice"]);
        assert_eq!(store.matched_count(), 1);
    }

    #[test]
    fn test_display_indices_are_dense_over_matched_rows() {
        let mut store = store_of(&["ab", "cd", "ad", "cc"]);
        store.apply_filter("d");
        store.renumber();

        let indices: Vec<_> = store
            .rows()
            .iter()
            .map(|r| r.display_index())
            .collect();
        assert_eq!(indices, vec![None, Some(0), Some(1), None]);
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let mut store = store_of(&["banana", "Apple", "cherry"]);
        store.apply_filter("");
        let compare = default_compare();

        store.apply_sort(SortOrder::Ascending, &compare);
        store.renumber();
        assert_eq!(contents(&store), vec!["Apple", "banana", "cherry"]);

        store.apply_sort(SortOrder::Descending, &compare);
        store.renumber();
        assert_eq!(contents(&store), vec!["cherry", "banana", "Apple"]);
    }

    #[test]
    fn test_sort_none_restores_insertion_order() {
        let mut store = store_of(&["banana", "apple", "cherry"]);
        let compare = default_compare();
        store.apply_sort(SortOrder::Ascending, &compare);
        assert_eq!(contents(&store), vec!["apple", "banana", "cherry"]);

        store.apply_sort(SortOrder::None, &compare);
        assert_eq!(contents(&store), vec!["banana", "apple", "cherry"]);
    }

    #[test]
    fn test_sort_orders_unmatched_rows_too() {
        let mut store = store_of(&["bb", "aa", "ba"]);
        store.apply_filter("a");
        let compare = default_compare();
        store.apply_sort(SortOrder::Ascending, &compare);
        store.renumber();

        // The unmatched row is ordered along with everything else, so a
        // later filter change only needs renumbering.
        assert_eq!(contents(&store), vec!["aa", "ba", "bb"]);
        store.apply_filter("b");
        store.renumber();
        let indices: Vec<_> = store.rows().iter().map(|r| r.display_index()).collect();
        assert_eq!(indices, vec![None, Some(0), Some(1)]);
    }

    #[test]
    fn test_default_compare_breaks_case_ties_deterministically() {
        let mut store = store_of(&["apple", "Apple"]);
        store.apply_filter("");
        let compare = default_compare();
        store.apply_sort(SortOrder::Ascending, &compare);
        assert_eq!(contents(&store), vec!["Apple", "apple"]);
    }
}
