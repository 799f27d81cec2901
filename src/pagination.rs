//! Offset/limit pagination shared by the attempt history and lesson
//! listings. Reads are stateless; concurrent writes during pagination can
//! shift rows between pages.

use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: i64,
    pub size: i64,
}

impl PageParams {
    pub fn new(
        page: Option<i64>,
        size: Option<i64>,
        default_size: i64,
    ) -> Result<Self, &'static str> {
        let page = page.unwrap_or(1);
        let size = size.unwrap_or(default_size);

        if page < 1 {
            return Err("Invalid page parameter");
        }
        if size < 1 {
            return Err("Invalid size parameter");
        }

        Ok(Self { page, size })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.size
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub size: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn build(total: i64, params: PageParams) -> Self {
        // size is validated >= 1 by PageParams::new
        let total_pages = if total > 0 {
            (total + params.size - 1) / params.size
        } else {
            1
        };

        Self {
            total,
            page: params.page,
            size: params.size,
            total_pages,
            has_next: params.page < total_pages,
            has_prev: params.page > 1,
        }
    }
}

/// A requested page past the end is an input error, not an empty 200.
pub fn ensure_in_range(total: i64, params: PageParams) -> Result<(), &'static str> {
    let meta = PaginationMeta::build(total, params);
    if params.page > meta.total_pages {
        return Err("Page out of range");
    }
    Ok(())
}
