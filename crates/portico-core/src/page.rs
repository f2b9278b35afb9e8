//! Pagination window shared by both resource services.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_NUM: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A 1-indexed pagination window.
///
/// The canonical offset formula is `(page_num - 1) * page_size`;
/// `page_num` values below 1 clamp to the first page so a caller
/// sending `page_num=0` never produces a negative OFFSET.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page_num: i64,
    pub page_size: i64,
}

impl Page {
    pub fn new(page_num: i64, page_size: i64) -> Self {
        Self {
            page_num,
            page_size,
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page_num - 1)
            .max(0)
            .saturating_mul(self.page_size.max(0))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page_num: DEFAULT_PAGE_NUM,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
