//! The row view-model engine facade.
//!
//! [`RowViewModel`] ties the pipeline together: it accepts parameter
//! changes through [`ChangeSet`]s (the mark phase), and recomputes derived
//! row state in a single fixed-order pass when the host calls
//! [`RowViewModel::commit`] (the commit phase).
//!
//! The two-phase split exists because row content is supplied by the host
//! renderer: filtering or sorting before the host has materialized the
//! current row set would operate on empty or stale text. The host drives
//! the cycle as: `update(...)` → render rows → `commit(provider)`.
//!
//! Re-entrant mutation during a commit (for example a selection toggle
//! fired from a notification slot) only re-marks the affected stage; it is
//! picked up by the *next* commit pass, never executed inside the current
//! one.

use std::sync::Arc;

use trellis_core::Signal;
use trellis_core::logging::targets;

use super::key::{IdentityResolver, RowKey};
use super::page::PageInfo;
use super::pipeline::{CompareFn, SortOrder, default_compare};
use super::row::{Row, RowStore};
use super::scheduler::{Scheduler, Stage};
use super::selection::{SelectionMode, SelectionTracker};

/// Supplies searchable/sortable text for rows.
///
/// After a structural rebuild, once the host renderer has materialized
/// each row, the engine asks the provider for the content of every row
/// whose cache is invalid — one lookup per row per rebuild. Closures of
/// the shape `Fn(&T, usize) -> String` implement this trait directly.
pub trait ContentProvider<T> {
    /// Returns the content for `item`, at `actual_index` in the last
    /// reconciled collection.
    fn content(&self, item: &T, actual_index: usize) -> String;
}

impl<T, F> ContentProvider<T> for F
where
    F: Fn(&T, usize) -> String,
{
    fn content(&self, item: &T, actual_index: usize) -> String {
        self(item, actual_index)
    }
}

/// A batch of parameter changes, carrying only the fields that changed.
///
/// Built fluently and handed to [`RowViewModel::update`]:
///
/// ```ignore
/// vm.update(ChangeSet::new().filter("apple").page(1));
/// ```
pub struct ChangeSet<T> {
    pub(crate) items: Option<Vec<Arc<T>>>,
    pub(crate) filter: Option<String>,
    pub(crate) sort: Option<SortOrder>,
    pub(crate) sortable: Option<bool>,
    pub(crate) page: Option<Option<i64>>,
    pub(crate) page_size: Option<Option<i64>>,
    pub(crate) keep_page: Option<bool>,
    pub(crate) selectable: Option<bool>,
    pub(crate) selection: Option<Vec<Arc<T>>>,
    pub(crate) selection_mode: Option<SelectionMode>,
    pub(crate) sticky_selection: Option<bool>,
    pub(crate) always_one_selection: Option<bool>,
    pub(crate) keep_selection: Option<bool>,
}

impl<T> Default for ChangeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChangeSet<T> {
    /// Creates an empty change set.
    pub fn new() -> Self {
        Self {
            items: None,
            filter: None,
            sort: None,
            sortable: None,
            page: None,
            page_size: None,
            keep_page: None,
            selectable: None,
            selection: None,
            selection_mode: None,
            sticky_selection: None,
            always_one_selection: None,
            keep_selection: None,
        }
    }

    /// Replaces the item collection (a structural rebuild).
    pub fn items(mut self, items: Vec<Arc<T>>) -> Self {
        self.items = Some(items);
        self
    }

    /// Sets the free-text filter term (a structural change).
    pub fn filter(mut self, term: impl Into<String>) -> Self {
        self.filter = Some(term.into());
        self
    }

    /// Sets the sort order.
    pub fn sort(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }

    /// Enables or disables the sort stage altogether.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    /// Sets the 1-based page, or `None` to disable windowing.
    pub fn page(mut self, page: impl Into<Option<i64>>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Sets the page size, or `None` to disable windowing.
    pub fn page_size(mut self, page_size: impl Into<Option<i64>>) -> Self {
        self.page_size = Some(page_size.into());
        self
    }

    /// Sets whether the current page is kept when the sticky target
    /// disappears (instead of jumping back to page 1).
    pub fn keep_page(mut self, keep: bool) -> Self {
        self.keep_page = Some(keep);
        self
    }

    /// Enables or disables selection altogether.
    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = Some(selectable);
        self
    }

    /// Replaces the selection list (external assignment).
    pub fn selection(mut self, selection: Vec<Arc<T>>) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Sets the selection mode.
    pub fn selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = Some(mode);
        self
    }

    /// Enables or disables sticky-anchor capture.
    pub fn sticky_selection(mut self, sticky: bool) -> Self {
        self.sticky_selection = Some(sticky);
        self
    }

    /// Forbids emptying the selection via toggle.
    pub fn always_one_selection(mut self, always_one: bool) -> Self {
        self.always_one_selection = Some(always_one);
        self
    }

    /// Retains selection entries that no longer match the filter.
    pub fn keep_selection(mut self, keep: bool) -> Self {
        self.keep_selection = Some(keep);
        self
    }
}

/// Builder for [`RowViewModel`], mirroring its construction-time knobs.
pub struct RowViewModelBuilder<T> {
    resolver: IdentityResolver<T>,
    compare: CompareFn<T>,
    page: Option<i64>,
    page_size: Option<i64>,
    keep_page: bool,
    sticky_selection: bool,
    keep_selection: bool,
    selection_mode: SelectionMode,
    always_one_selection: bool,
    sortable: bool,
    selectable: bool,
}

impl<T: Send + Sync + 'static> Default for RowViewModelBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> RowViewModelBuilder<T> {
    /// Creates a builder with default parameters: pointer identity,
    /// content comparison, page size 10 with paging disabled until a page
    /// is assigned, multi-selection, sticky anchors on.
    pub fn new() -> Self {
        Self {
            resolver: IdentityResolver::new(),
            compare: default_compare(),
            page: None,
            page_size: Some(10),
            keep_page: false,
            sticky_selection: true,
            keep_selection: false,
            selection_mode: SelectionMode::default(),
            always_one_selection: false,
            sortable: true,
            selectable: true,
        }
    }

    /// Injects an identity key function (the `track_by` analog).
    pub fn key_fn<F>(mut self, key_fn: F) -> Self
    where
        F: Fn(&T) -> RowKey + Send + Sync + 'static,
    {
        self.resolver = IdentityResolver::with_key_fn(key_fn);
        self
    }

    /// Injects a custom row comparator.
    pub fn compare<F>(mut self, compare: F) -> Self
    where
        F: Fn(&Row<T>, &Row<T>) -> std::cmp::Ordering + Send + Sync + 'static,
    {
        self.compare = Arc::new(compare);
        self
    }

    /// Sets the initial 1-based page.
    pub fn page(mut self, page: impl Into<Option<i64>>) -> Self {
        self.page = page.into();
        self
    }

    /// Sets the initial page size.
    pub fn page_size(mut self, page_size: impl Into<Option<i64>>) -> Self {
        self.page_size = page_size.into();
        self
    }

    /// Sets the keep-page fallback policy.
    pub fn keep_page(mut self, keep: bool) -> Self {
        self.keep_page = keep;
        self
    }

    /// Enables or disables sticky-anchor capture.
    pub fn sticky_selection(mut self, sticky: bool) -> Self {
        self.sticky_selection = sticky;
        self
    }

    /// Retains selection entries that no longer match the filter.
    pub fn keep_selection(mut self, keep: bool) -> Self {
        self.keep_selection = keep;
        self
    }

    /// Sets the selection mode.
    pub fn selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Forbids emptying the selection via toggle.
    pub fn always_one_selection(mut self, always_one: bool) -> Self {
        self.always_one_selection = always_one;
        self
    }

    /// Enables or disables the sort stage.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Enables or disables selection.
    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Builds the engine.
    pub fn build(self) -> RowViewModel<T> {
        let mut selection = SelectionTracker::new();
        selection.set_mode(self.selection_mode);
        selection.set_always_one(self.always_one_selection);

        let mut scheduler = Scheduler::new();
        scheduler.set_sortable(self.sortable);
        scheduler.set_selectable(self.selectable);

        RowViewModel {
            store: RowStore::new(),
            resolver: self.resolver,
            selection,
            scheduler,
            compare: self.compare,
            filter: String::new(),
            sort: SortOrder::default(),
            page: self.page,
            page_size: self.page_size,
            keep_page: self.keep_page,
            sticky_selection: self.sticky_selection,
            keep_selection: self.keep_selection,
            page_info: PageInfo::compute(self.page, self.page_size),
            sticky_item: None,
            last_page_count: None,
            pending_page: None,
            page_changed: Signal::new(),
            page_count_changed: Signal::new(),
            selection_changed: Signal::new(),
        }
    }
}

/// The row view-model engine.
///
/// Owns the row store, the selection list and the dirty-stage scheduler,
/// and exposes the derived state (rows, page window, selection) the host
/// renderer binds against.
///
/// # Signals
///
/// - `page_changed`: the engine relocated the page (sticky anchor or
///   fallback policy). Direct external page assignment does not re-notify.
/// - `page_count_changed`: the number of pages changed.
/// - `selection_changed`: the selection list changed, via toggle or
///   pruning.
///
/// Each signal fires at most once per commit pass per changed value.
pub struct RowViewModel<T> {
    store: RowStore<T>,
    resolver: IdentityResolver<T>,
    selection: SelectionTracker<T>,
    scheduler: Scheduler,
    compare: CompareFn<T>,

    filter: String,
    sort: SortOrder,
    page: Option<i64>,
    page_size: Option<i64>,
    keep_page: bool,
    sticky_selection: bool,
    keep_selection: bool,

    page_info: PageInfo,
    /// Anchor item snapshotted before a structural or sort recomputation.
    sticky_item: Option<Arc<T>>,
    last_page_count: Option<usize>,
    /// Page relocation waiting to be notified at the end of the pass.
    pending_page: Option<usize>,

    /// Emitted when the engine relocates the page.
    pub page_changed: Signal<usize>,
    /// Emitted when the page count changes.
    pub page_count_changed: Signal<usize>,
    /// Emitted with the new list when the selection changes.
    pub selection_changed: Signal<Vec<Arc<T>>>,
}

impl<T: Send + Sync + 'static> Default for RowViewModel<T> {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl<T: Send + Sync + 'static> RowViewModel<T> {
    /// Starts building an engine.
    pub fn builder() -> RowViewModelBuilder<T> {
        RowViewModelBuilder::new()
    }

    // =========================================================================
    // Mark phase
    // =========================================================================

    /// Applies a batch of parameter changes.
    ///
    /// Synchronous and cheap: flags the affected pipeline stages dirty and,
    /// for structural changes, reconciles the row store so the host can
    /// re-render the row set before committing. Nothing else is recomputed
    /// until [`commit`](Self::commit).
    pub fn update(&mut self, changes: ChangeSet<T>) {
        // Capability and policy flags first; they gate the marks below.
        if let Some(v) = changes.sortable {
            self.scheduler.set_sortable(v);
        }
        if let Some(v) = changes.selectable {
            self.scheduler.set_selectable(v);
        }
        if let Some(v) = changes.keep_page {
            self.keep_page = v;
        }
        if let Some(v) = changes.sticky_selection {
            self.sticky_selection = v;
        }
        if let Some(v) = changes.keep_selection {
            self.keep_selection = v;
        }
        if let Some(v) = changes.always_one_selection {
            self.selection.set_always_one(v);
        }
        if let Some(v) = changes.selection_mode {
            self.selection.set_mode(v);
        }

        let structural = changes.items.is_some() || changes.filter.is_some();

        // Snapshot the anchor before anything moves.
        if structural || changes.sort.is_some() {
            self.capture_sticky();
        }

        if let Some(order) = changes.sort {
            self.sort = order;
            self.scheduler.mark(Stage::Sort);
            self.scheduler.mark(Stage::Page);
        }

        if structural {
            if let Some(term) = changes.filter {
                self.filter = term;
            }
            if let Some(items) = changes.items.as_ref() {
                self.store.reconcile(items, &self.resolver);
            }
            self.scheduler.mark_structural();
        }

        if changes.page.is_some() || changes.page_size.is_some() {
            if let Some(page) = changes.page {
                self.page = page;
            }
            if let Some(size) = changes.page_size {
                self.page_size = size;
            }
            self.page_info = PageInfo::compute(self.page, self.page_size);
            self.scheduler.mark(Stage::Page);
        }

        if let Some(selection) = changes.selection {
            self.selection.set_items(selection);
            self.scheduler.mark(Stage::Selection);
        }
    }

    /// Toggles the selection state of a row's item.
    ///
    /// No-op while selection is disabled. Emits `selection_changed`
    /// immediately when the list changes; the row flags follow at the next
    /// commit.
    pub fn toggle(&mut self, item: &Arc<T>) {
        if !self.scheduler.selectable() {
            return;
        }
        if self.selection.toggle(item, &self.resolver) {
            self.selection_changed.emit(self.selection.items().to_vec());
            self.scheduler.mark(Stage::Selection);
        }
    }

    // =========================================================================
    // Commit phase
    // =========================================================================

    /// Runs all dirty stages once, in fixed order.
    ///
    /// The host calls this after it has materialized the current row set,
    /// so the content provider can resolve text for every row. Stages that
    /// are not dirty are skipped; the dirty set is cleared afterwards.
    pub fn commit<P: ContentProvider<T>>(&mut self, provider: &P) {
        let pass = self.scheduler.take();
        if pass.is_empty() {
            return;
        }
        tracing::trace!(target: targets::MODEL, stages = ?pass, "commit pass");

        if pass.is_dirty(Stage::Content) {
            self.acquire_content(provider);
        }
        if pass.is_dirty(Stage::Filter) {
            self.store.apply_filter(&self.filter);
            self.store.renumber();
        }
        if pass.is_dirty(Stage::Sort) {
            self.store.apply_sort(self.sort, &self.compare);
            self.store.renumber();
        }

        // Sticky resolution sits between reorder and page flagging: it may
        // move the window before rows are flagged against it.
        if pass.is_dirty(Stage::Filter) || pass.is_dirty(Stage::Sort) {
            self.relocate_page();
        }

        if pass.is_dirty(Stage::Selection) {
            let drop_unmatched = pass.is_dirty(Stage::Filter) && !self.keep_selection;
            let pruned = self
                .selection
                .prune(self.store.rows(), &self.resolver, drop_unmatched);
            self.selection.render(&mut self.store.rows, &self.resolver);
            if pruned {
                self.selection_changed.emit(self.selection.items().to_vec());
            }
        }

        if pass.is_dirty(Stage::Page) {
            let info = self.page_info;
            for row in &mut self.store.rows {
                row.paged = match row.display_index {
                    Some(index) => info.in_range(index),
                    None => false,
                };
            }
        }

        self.notify_page_count();
        if let Some(page) = self.pending_page.take() {
            self.page_changed.emit(page);
        }
    }

    fn acquire_content<P: ContentProvider<T>>(&mut self, provider: &P) {
        for row in &mut self.store.rows {
            if row.content.is_none() {
                row.content = Some(provider.content(row.item.as_ref(), row.actual_index));
            }
        }
    }

    /// Snapshots the anchor item on the current page, if sticky selection
    /// and paging are both active.
    fn capture_sticky(&mut self) {
        if !self.sticky_selection || self.page_info.disabled() {
            return;
        }
        self.sticky_item = self
            .store
            .rows()
            .iter()
            .find(|row| row.paged() && row.anchor())
            .map(|row| row.item().clone());
    }

    /// Resolves page placement after a filter or sort recomputation.
    ///
    /// If the sticky item still resolves to a matched row, the page jumps
    /// to wherever that row landed. Otherwise the keep-page policy decides:
    /// back to page 1, or clamp to the last valid page.
    fn relocate_page(&mut self) {
        if self.page_info.disabled() {
            self.sticky_item = None;
            return;
        }

        if let Some(item) = self.sticky_item.take() {
            let key = self.resolver.key_of(&item);
            let display_index = self
                .store
                .row_by_key(&key)
                .and_then(|row| row.display_index());
            if let Some(index) = display_index {
                if let Some(target) = self.page_info.page_for_index(index) {
                    self.goto_page(target);
                }
                return;
            }
            tracing::debug!(
                target: targets::MODEL,
                "sticky anchor no longer matched, applying page fallback"
            );
        }

        if !self.keep_page {
            self.goto_page(1);
        } else if let (Some(page), Some(count)) = (
            self.page_info.page(),
            self.page_info.page_count(self.store.matched_count()),
        ) {
            if page > count {
                self.goto_page(count);
            }
        }
    }

    /// Moves the window to `target` and queues a page-change notification.
    ///
    /// The only path besides direct external assignment that mutates the
    /// page.
    fn goto_page(&mut self, target: usize) {
        let current = self.page_info.page();
        self.page = Some(target as i64);
        self.page_info = PageInfo::compute(self.page, self.page_size);
        if current != Some(target) {
            self.pending_page = Some(target);
        }
    }

    fn notify_page_count(&mut self) {
        if let Some(count) = self.page_info.page_count(self.store.matched_count()) {
            if self.last_page_count != Some(count) {
                self.last_page_count = Some(count);
                self.page_count_changed.emit(count);
            }
        }
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    /// All rows, in current order.
    pub fn rows(&self) -> &[Row<T>] {
        self.store.rows()
    }

    /// The rows inside the current page window, in display order.
    pub fn paged_rows(&self) -> impl Iterator<Item = &Row<T>> {
        self.store.rows().iter().filter(|row| row.paged())
    }

    /// Number of rows matching the active filter.
    pub fn matched_count(&self) -> usize {
        self.store.matched_count()
    }

    /// The current pagination window.
    pub fn page_info(&self) -> PageInfo {
        self.page_info
    }

    /// The normalized 1-based page, if paging is enabled.
    pub fn page(&self) -> Option<usize> {
        self.page_info.page()
    }

    /// The number of pages, or `None` while paging is disabled.
    pub fn page_count(&self) -> Option<usize> {
        self.page_info.page_count(self.store.matched_count())
    }

    /// The selected items, in selection order.
    pub fn selection(&self) -> &[Arc<T>] {
        self.selection.items()
    }

    /// The active filter term.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The active sort order.
    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }
}
