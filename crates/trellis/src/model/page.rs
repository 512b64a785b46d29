//! Pagination window derivation.
//!
//! [`PageInfo`] is derived state, recomputed whenever the page parameters
//! change. Invalid parameters never raise an error: a missing page, a
//! missing page size or a non-positive page size degrade to *disabled*
//! paging, meaning no windowing at all — every matched row is in range.

use trellis_core::logging::targets;

/// A derived pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Normalized 1-based page, clamped to at least 1.
    page: Option<usize>,
    /// Normalized page size.
    page_size: Option<usize>,
    /// Whether windowing is disabled.
    disabled: bool,
    /// First display index inside the window.
    min_index: usize,
    /// One past the last display index inside the window; `None` when
    /// unbounded.
    max_index: Option<usize>,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self::compute(None, None)
    }
}

impl PageInfo {
    /// Derives the window for the given raw parameters.
    ///
    /// `page` is clamped to at least 1 and `page_size` to at least 0.
    /// Paging is disabled when either parameter is absent or the page size
    /// ends up non-positive.
    pub fn compute(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.map(|p| p.max(1) as usize);
        let page_size = page_size.map(|s| s.max(0) as usize);
        let disabled = page.is_none() || page_size.is_none() || page_size == Some(0);

        let (min_index, max_index) = if disabled {
            (0, None)
        } else {
            let min = (page.unwrap() - 1) * page_size.unwrap();
            (min, Some(min + page_size.unwrap()))
        };

        if disabled && (page.is_some() || page_size.is_some()) {
            tracing::debug!(
                target: targets::MODEL,
                ?page,
                ?page_size,
                "paging configuration degraded, windowing disabled"
            );
        }

        Self {
            page,
            page_size,
            disabled,
            min_index,
            max_index,
        }
    }

    /// The normalized 1-based page, if set.
    pub fn page(&self) -> Option<usize> {
        self.page
    }

    /// The normalized page size, if set.
    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    /// Whether windowing is disabled.
    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// First display index inside the window (0 when disabled).
    pub fn min_index(&self) -> usize {
        self.min_index
    }

    /// Exclusive upper bound of the window, or `None` when unbounded.
    pub fn max_index(&self) -> Option<usize> {
        self.max_index
    }

    /// Whether the given display index falls inside the window.
    ///
    /// Always `true` when paging is disabled.
    pub fn in_range(&self, display_index: usize) -> bool {
        if self.disabled {
            return true;
        }
        display_index >= self.min_index
            && self.max_index.is_none_or(|max| display_index < max)
    }

    /// The 1-based page containing the given display index.
    ///
    /// Defined only while paging is enabled.
    pub fn page_for_index(&self, display_index: usize) -> Option<usize> {
        if self.disabled {
            return None;
        }
        Some(display_index / self.page_size.unwrap_or(1) + 1)
    }

    /// The number of pages needed for `matched_count` rows.
    ///
    /// Defined only while paging is enabled; an empty row set still has
    /// one page.
    pub fn page_count(&self, matched_count: usize) -> Option<usize> {
        if self.disabled {
            return None;
        }
        let page_size = self.page_size.unwrap_or(1);
        Some(if matched_count == 0 {
            1
        } else {
            matched_count.div_ceil(page_size)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_window_bounds() {
        let info = PageInfo::compute(Some(2), Some(10));
        assert!(!info.disabled());
        assert_eq!(info.min_index(), 10);
        assert_eq!(info.max_index(), Some(20));
        assert!(info.in_range(10));
        assert!(info.in_range(19));
        assert!(!info.in_range(9));
        assert!(!info.in_range(20));
    }

    #[test]
    fn test_missing_parameters_disable_paging() {
        for info in [
            PageInfo::compute(None, Some(10)),
            PageInfo::compute(Some(1), None),
            PageInfo::compute(None, None),
        ] {
            assert!(info.disabled());
            assert!(info.in_range(0));
            assert!(info.in_range(usize::MAX));
            assert_eq!(info.page_count(100), None);
            assert_eq!(info.page_for_index(0), None);
        }
    }

    #[test]
    fn test_non_positive_page_size_disables_paging() {
        assert!(PageInfo::compute(Some(1), Some(0)).disabled());
        assert!(PageInfo::compute(Some(1), Some(-5)).disabled());
    }

    #[test]
    fn test_page_is_clamped_to_one() {
        let info = PageInfo::compute(Some(-3), Some(5));
        assert_eq!(info.page(), Some(1));
        assert_eq!(info.min_index(), 0);
    }

    #[test]
    fn test_page_for_index_is_monotonic() {
        let info = PageInfo::compute(Some(1), Some(3));
        let pages: Vec<_> = (0..10)
            .map(|idx| info.page_for_index(idx).unwrap())
            .collect();
        assert_eq!(pages, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4]);
        assert!(pages.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_page_count() {
        let info = PageInfo::compute(Some(1), Some(2));
        assert_eq!(info.page_count(0), Some(1));
        assert_eq!(info.page_count(1), Some(1));
        assert_eq!(info.page_count(2), Some(1));
        assert_eq!(info.page_count(3), Some(2));
        assert_eq!(info.page_count(5), Some(3));
    }
}
