//! Row view-model pipeline for Trellis.
//!
//! This module contains the engine that reconciles raw item collections
//! into annotated, render-ready rows. It is organized leaf-first:
//!
//! - [`RowKey`] / [`IdentityResolver`]: stable identity for items
//! - [`Row`] / [`RowStore`]: the authoritative row sequence and its
//!   identity-preserving reconciliation
//! - [`SortOrder`] / filter + sort stages: row matching and ordering
//! - [`PageInfo`]: derived pagination window
//! - [`Stage`] / [`Scheduler`]: dirty-stage coalescing and fixed-order
//!   commit passes
//! - [`SelectionTracker`]: ordered selection list with toggle semantics
//! - [`RowViewModel`]: the engine facade tying the pipeline together
//!
//! # Data Flow
//!
//! ```text
//! parameter changes ──> Scheduler marks stages dirty
//!                          │ (structural changes also reconcile rows)
//!                          v
//! commit: content ─> filter ─> sort ─> selection ─> page
//!                          │
//!                          v
//! page_changed / page_count_changed / selection_changed signals
//! ```
//!
//! Views read the derived state back through [`RowViewModel::rows`] and
//! [`RowViewModel::paged_rows`]; every [`Row`] carries the `matched`,
//! `paged`, `selected` and `anchor` flags the renderer needs.

mod key;
mod page;
mod pipeline;
mod row;
mod scheduler;
mod selection;
mod view;

pub use key::{IdentityResolver, KeyFn, RowKey};
pub use page::PageInfo;
pub use pipeline::{CompareFn, SortOrder, default_compare};
pub use row::{Row, RowStore};
pub use scheduler::{DirtyStages, Scheduler, Stage};
pub use selection::{SelectionMode, SelectionTracker};
pub use view::{ChangeSet, ContentProvider, RowViewModel, RowViewModelBuilder};
