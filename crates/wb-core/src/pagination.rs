//! Pagination types for API responses

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 500;

/// Pagination parameters (from query string)
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Number of elements to skip
    #[serde(default)]
    pub offset: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

impl PaginationParams {
    pub fn new(offset: i64, page_size: i64) -> Self {
        Self {
            offset: offset.max(0),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Re-apply bounds after deserialization
    pub fn normalized(self) -> Self {
        Self::new(self.offset, self.page_size)
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// Paginated collection response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    #[serde(rename = "_type")]
    pub hal_type: String,

    /// Total count of items
    pub total: i64,

    /// Number of items in this page
    pub count: i64,

    pub page_size: i64,

    pub offset: i64,

    #[serde(rename = "_links")]
    pub links: PaginationLinks,

    #[serde(rename = "_embedded")]
    pub embedded: PaginatedEmbedded<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationLinks {
    #[serde(rename = "self")]
    pub self_link: LinkObject,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "previousByOffset")]
    pub previous: Option<LinkObject>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "nextByOffset")]
    pub next: Option<LinkObject>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LinkObject {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl LinkObject {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: None,
        }
    }

    pub fn titled(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: Some(title.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginatedEmbedded<T> {
    pub elements: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    pub fn new(
        items: Vec<T>,
        total: i64,
        params: &PaginationParams,
        base_url: &str,
        element_type: &str,
    ) -> Self {
        let offset = params.offset();
        let count = items.len() as i64;
        let page_size = params.page_size;

        let href = |offset: i64| format!("{}?offset={}&pageSize={}", base_url, offset, page_size);

        let previous = (offset > 0).then(|| LinkObject::new(href((offset - page_size).max(0))));
        let next = (offset + count < total).then(|| LinkObject::new(href(offset + page_size)));

        Self {
            hal_type: Self::collection_type(element_type),
            total,
            count,
            page_size,
            offset,
            links: PaginationLinks {
                self_link: LinkObject::new(href(offset)),
                previous,
                next,
            },
            embedded: PaginatedEmbedded { elements: items },
        }
    }

    pub fn collection_type(element_type: &str) -> String {
        format!("{}Collection", element_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_are_bounded() {
        let params = PaginationParams::new(-5, 10_000);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_links() {
        let params = PaginationParams::new(20, 20);
        let page = PaginatedResponse::new(vec![1, 2, 3], 43, &params, "/api/projects", "Project");

        assert_eq!(page.hal_type, "ProjectCollection");
        assert_eq!(page.count, 3);
        assert_eq!(
            page.links.previous,
            Some(LinkObject::new("/api/projects?offset=0&pageSize=20"))
        );
        assert_eq!(
            page.links.next,
            Some(LinkObject::new("/api/projects?offset=40&pageSize=20"))
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let params = PaginationParams::new(40, 20);
        let page = PaginatedResponse::new(vec![1, 2, 3], 43, &params, "/api/projects", "Project");
        assert!(page.links.next.is_none());
    }
}
