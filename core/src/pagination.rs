//! Page/offset arithmetic.

use crate::config::PageLimit;

/// Offset of the first item of `page` (1-indexed).
pub fn offset(page: u32, limit: PageLimit) -> u64 {
    if page <= 1 {
        return 0;
    }
    u64::from(limit.get()) * u64::from(page) - u64::from(limit.get())
}

/// Last valid page for `total` items. An empty list still has page 1.
pub fn last_page(total: u64, limit: PageLimit) -> u32 {
    let limit = u64::from(limit.get());
    let pages = if total % limit == 0 {
        total / limit
    } else {
        total / limit + 1
    };
    pages.clamp(1, u64::from(u32::MAX)) as u32
}
