//! Dirty-stage coalescing for the commit pass.
//!
//! Parameter changes never recompute anything directly; they mark pipeline
//! stages dirty on the [`Scheduler`]. Multiple changes within one update
//! cycle merge into the same [`DirtyStages`] set — a stage either runs or
//! doesn't, never "N times" — and execution happens once per commit, in
//! the fixed order content → filter → sort → selection → page.

/// A pipeline stage identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Stage {
    /// Content acquisition from the host renderer.
    Content = 0,
    /// Filter matching and display-index renumbering.
    Filter = 1,
    /// Row reordering.
    Sort = 2,
    /// Selection flag rendering and pruning.
    Selection = 3,
    /// Page window flag rendering.
    Page = 4,
}

impl Stage {
    /// Fixed execution order for a commit pass.
    pub const ORDER: [Stage; 5] = [
        Stage::Content,
        Stage::Filter,
        Stage::Sort,
        Stage::Selection,
        Stage::Page,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A set of dirty stages, drained once per commit pass.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyStages(u8);

impl DirtyStages {
    /// Marks a stage dirty. Idempotent.
    pub fn mark(&mut self, stage: Stage) {
        self.0 |= stage.bit();
    }

    /// Clears a stage's dirty flag.
    pub fn clear(&mut self, stage: Stage) {
        self.0 &= !stage.bit();
    }

    /// Returns whether the stage is marked dirty.
    pub fn is_dirty(&self, stage: Stage) -> bool {
        self.0 & stage.bit() != 0
    }

    /// Returns `true` if no stage is dirty.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The dirty stages in execution order.
    pub fn stages(self) -> impl Iterator<Item = Stage> {
        Stage::ORDER.into_iter().filter(move |s| self.is_dirty(*s))
    }
}

impl std::fmt::Debug for DirtyStages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.stages()).finish()
    }
}

/// Coalesces dirty-stage marks raised by parameter changes.
///
/// The `sortable` and `selectable` capability flags gate scheduling: while
/// disabled, the corresponding stage is never marked, regardless of what
/// raised it.
pub struct Scheduler {
    dirty: DirtyStages,
    sortable: bool,
    selectable: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Creates a scheduler with both capabilities enabled.
    pub fn new() -> Self {
        Self {
            dirty: DirtyStages::default(),
            sortable: true,
            selectable: true,
        }
    }

    /// Marks a stage dirty, subject to capability gating.
    pub fn mark(&mut self, stage: Stage) {
        match stage {
            Stage::Sort if !self.sortable => return,
            Stage::Selection if !self.selectable => return,
            _ => {}
        }
        self.dirty.mark(stage);
    }

    /// Marks every stage dirty (a structural item or filter change).
    pub fn mark_structural(&mut self) {
        for stage in Stage::ORDER {
            self.mark(stage);
        }
    }

    /// Drains the dirty set for one commit pass.
    pub fn take(&mut self) -> DirtyStages {
        std::mem::take(&mut self.dirty)
    }

    /// Returns the pending dirty set without draining it.
    pub fn pending(&self) -> DirtyStages {
        self.dirty
    }

    /// Whether the sort stage may ever be scheduled.
    pub fn sortable(&self) -> bool {
        self.sortable
    }

    /// Enables or disables sort scheduling.
    ///
    /// Disabling also cancels a pending sort mark, so a stage gated off
    /// mid-cycle never runs.
    pub fn set_sortable(&mut self, sortable: bool) {
        self.sortable = sortable;
        if !sortable {
            self.dirty.clear(Stage::Sort);
        }
    }

    /// Whether the selection stage may ever be scheduled.
    pub fn selectable(&self) -> bool {
        self.selectable
    }

    /// Enables or disables selection scheduling.
    ///
    /// Disabling also cancels a pending selection mark.
    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
        if !selectable {
            self.dirty.clear(Stage::Selection);
        }
    }
}
