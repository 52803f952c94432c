//! Pagination utilities for service layer
//!
//! Converts a 1-based page request into the `skip`/`take` window of a
//! multi-record read. Nothing applies it implicitly.

use models::FindManyArgs;

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane bounds and return `(skip, take)`.
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page as u64 - 1) * per_page as u64, per_page as u64)
    }

    /// Set `skip`/`take` on `args`, leaving filter and ordering as they are.
    pub fn apply<W, O>(self, args: FindManyArgs<W, O>) -> FindManyArgs<W, O> {
        let (skip, take) = self.normalize();
        args.skip(skip).take(take)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}
