//! Trellis: a row view-model engine for list and table widgets.
//!
//! Trellis turns a raw collection of items plus four independent view
//! parameters (free-text filter, sort order, pagination, multi-item
//! selection) into a render-ready ordered sequence of annotated rows. It
//! preserves row identity across data updates so a host renderer can
//! recycle visual elements, and it keeps the user's visual focus stable
//! when filtering or sorting would otherwise relocate the focused item to
//! a different page.
//!
//! The engine does not render anything. The host owns templates, elements
//! and styling; Trellis owns the derived row state behind them.
//!
//! # Update Model
//!
//! Every logical update has two phases:
//!
//! 1. **Mark** — the host calls [`RowViewModel::update`] with a
//!    [`ChangeSet`] carrying only the parameters that changed. Parameter
//!    mutations are synchronous and only flip dirty flags (plus the row
//!    reconciliation for structural changes); nothing is recomputed yet.
//! 2. **Commit** — once the host has materialized the current row set (so
//!    row content can be read), it calls [`RowViewModel::commit`] with a
//!    [`ContentProvider`]. The scheduler runs all dirty stages once, in
//!    fixed order: content, filter, sort, selection, page.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis::{ChangeSet, RowViewModel};
//!
//! let mut vm: RowViewModel<String> = RowViewModel::builder()
//!     .page_size(2)
//!     .build();
//!
//! let items: Vec<Arc<String>> = ["Alice", "Bob", "Carol"]
//!     .iter()
//!     .map(|s| Arc::new(s.to_string()))
//!     .collect();
//!
//! vm.update(ChangeSet::new().items(items).page(1));
//! vm.commit(&|item: &String, _idx: usize| item.clone());
//!
//! let names: Vec<_> = vm.paged_rows().map(|r| r.item().as_str()).collect();
//! assert_eq!(names, vec!["Alice", "Bob"]);
//! assert_eq!(vm.page_count(), Some(2));
//! ```

pub mod model;

pub use model::{
    ChangeSet, CompareFn, ContentProvider, DirtyStages, IdentityResolver, KeyFn, PageInfo, Row,
    RowKey, RowStore, RowViewModel, RowViewModelBuilder, Scheduler, SelectionMode,
    SelectionTracker, SortOrder, Stage, default_compare,
};
