use serde::Deserialize;

#[derive(Deserialize, Default)]
pub struct PaginationParams {
    pub page: Option<String>,
}

impl PaginationParams {
    /// 1-based page number, anything missing or unparsable is the first page
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|page| page.trim().parse::<i64>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }
}

/// One page of a listing
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Rows to fetch to know if a next page exists
    pub fn limit(per_page: i64) -> i64 {
        per_page + 1
    }

    pub fn offset(page: i64, per_page: i64) -> i64 {
        (page - 1).saturating_mul(per_page)
    }

    /// Build the page from `limit(per_page)` fetched rows
    pub fn from_rows(mut rows: Vec<T>, page: i64, per_page: i64) -> Self {
        let has_next = rows.len() as i64 > per_page;
        rows.truncate(per_page.max(0) as usize);
        Self {
            items: rows,
            page,
            has_next,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}
