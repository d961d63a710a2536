//! Page arithmetic for the user list.

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of a `total`-item result. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            total,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page_size))
    }

    /// 1-based index of the first item on this page, 0 when empty.
    pub fn start_item(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        (u64::from(self.page) - 1) * u64::from(self.page_size) + 1
    }

    pub fn end_item(&self) -> u64 {
        (u64::from(self.page) * u64::from(self.page_size)).min(self.total)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    /// "Showing 21 to 40 of 45 users"
    pub fn summary(&self) -> String {
        format!(
            "Showing {} to {} of {} users",
            self.start_item(),
            self.end_item(),
            self.total
        )
    }
}
