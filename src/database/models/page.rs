use serde::{Deserialize, Serialize};

/// Query-string shape shared by every paged listing: 1-indexed `page`,
/// optional `limit`, and a whitelisted `sortField` with `sortOrder`
/// `asc`/`desc` (descending when absent).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
}

/// Normalized form handed to the stores.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub limit: i64,
    pub offset: i64,
    pub sort_field: Option<String>,
    pub ascending: bool,
}

impl PageRequest {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn options(&self, default_limit: i64) -> ListOptions {
        let limit = self.limit.unwrap_or(default_limit).max(1);
        ListOptions {
            limit,
            offset: (self.page() - 1) * limit,
            sort_field: self.sort_field.clone(),
            ascending: self.sort_order.as_deref() == Some("asc"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub total_pages: i64,
    pub page: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        Self {
            items,
            total,
            total_pages: (total + limit - 1) / limit.max(1),
            page,
        }
    }
}
