/// Shared types used across the codebase

use serde::Serialize;

/// Resolved page request. Always within bounds once constructed via [`PageParams::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
}

impl PageParams {
    /// Lenient pagination: unparseable or non-positive values fall back to the
    /// defaults, limits above `max_limit` are capped. Never an error.
    pub fn clamped(page: Option<&str>, limit: Option<&str>, default_limit: u32, max_limit: u32) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map(|p| p.min(u32::MAX as i64) as u32)
            .unwrap_or(1);

        // a zero cap or default would make every page empty and total_pages undefined
        let max_limit = max_limit.max(1);
        let limit = match limit.and_then(|l| l.trim().parse::<i64>().ok()) {
            Some(l) if l >= 1 => l.min(max_limit as i64) as u32,
            _ => default_limit.clamp(1, max_limit),
        };

        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// One page of results plus the total count of matching rows.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, params: PageParams) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + params.limit as u64 - 1) / params.limit as u64
        };
        Self {
            items,
            total,
            page: params.page,
            limit: params.limit,
            total_pages,
        }
    }
}
