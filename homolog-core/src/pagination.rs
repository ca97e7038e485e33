//! Pagination controller.
//!
//! The grid reports `{page, page_size}` changes; [`QueryState::apply`] turns
//! them into the page/offset the query layer consumes. A page-size change
//! always returns to the first page.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Page sizes offered by the grid.
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [25, 50, 100];

/// Pagination model as reported by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationModel {
    pub page: usize,
    pub page_size: usize,
}

/// Page index, page size, and derived offset.
///
/// `offset == page * page_size` holds after every public operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState {
    page: usize,
    page_size: usize,
    offset: usize,
}

/// Largest page index whose offset fits in `usize`.
fn max_page(page_size: usize) -> usize {
    usize::MAX / page_size
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryState {
    /// First page at the given size. A zero size is raised to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            offset: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn model(&self) -> PaginationModel {
        PaginationModel {
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Adopt a pagination change from the grid. Returns whether anything
    /// changed.
    pub fn apply(&mut self, model: PaginationModel) -> bool {
        let page_size = model.page_size.max(1);
        let page = if page_size != self.page_size {
            0
        } else {
            model.page.min(max_page(page_size))
        };
        let next = Self {
            page,
            page_size,
            offset: page * page_size,
        };
        let changed = next != *self;
        *self = next;
        changed
    }

    pub fn next_page(&mut self, total: usize) -> bool {
        if self.page.saturating_add(1) >= self.page_count(total) {
            return false;
        }
        self.apply(PaginationModel {
            page: self.page + 1,
            page_size: self.page_size,
        })
    }

    pub fn previous_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.apply(PaginationModel {
            page: self.page - 1,
            page_size: self.page_size,
        })
    }

    /// Step to the next entry of [`PAGE_SIZE_OPTIONS`], wrapping around.
    pub fn cycle_page_size(&mut self) -> bool {
        let next = PAGE_SIZE_OPTIONS
            .iter()
            .copied()
            .find(|size| *size > self.page_size)
            .unwrap_or(PAGE_SIZE_OPTIONS[0]);
        self.apply(PaginationModel {
            page: self.page,
            page_size: next,
        })
    }

    /// Number of pages needed for `total` rows; an empty set still has one.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    /// Pull the page back into range after the row count shrank.
    pub fn clamp_to(&mut self, total: usize) -> bool {
        let last = self.page_count(total) - 1;
        if self.page <= last {
            return false;
        }
        self.apply(PaginationModel {
            page: last,
            page_size: self.page_size,
        })
    }

    /// The rows of the current page.
    pub fn page_slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = self.offset.min(rows.len());
        let end = self.offset.saturating_add(self.page_size).min(rows.len());
        &rows[start..end]
    }
}
