//! HAL-style JSON envelopes
//!
//! Resources carry a `_type` discriminator and a `_links` object; collections
//! add paging metadata and offset links.

use std::collections::BTreeMap;

use serde::Serialize;

/// A HAL link
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HalLink {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
}

impl HalLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: None,
            method: None,
            templated: None,
        }
    }

    pub fn with_title(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::new(href)
        }
    }

    pub fn templated(href: impl Into<String>) -> Self {
        Self {
            templated: Some(true),
            ..Self::new(href)
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

/// Links keyed by relation name
#[derive(Debug, Clone, Default, Serialize)]
pub struct HalLinks(BTreeMap<String, HalLink>);

impl HalLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rel: impl Into<String>, link: HalLink) {
        self.0.insert(rel.into(), link);
    }

    pub fn with(mut self, rel: impl Into<String>, link: HalLink) -> Self {
        self.add(rel, link);
        self
    }

    pub fn has(&self, rel: &str) -> bool {
        self.0.contains_key(rel)
    }

    pub fn get(&self, rel: &str) -> Option<&HalLink> {
        self.0.get(rel)
    }
}

/// A single resource
#[derive(Debug, Clone, Serialize)]
pub struct HalResource<T> {
    #[serde(rename = "_type")]
    pub resource_type: String,
    #[serde(flatten)]
    pub resource: T,
    #[serde(rename = "_links")]
    pub links: HalLinks,
}

impl<T: Serialize> HalResource<T> {
    pub fn new(resource_type: impl Into<String>, resource: T) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource,
            links: HalLinks::new(),
        }
    }

    pub fn with_self_link(mut self, href: impl Into<String>) -> Self {
        self.links.add(rels::SELF, HalLink::new(href));
        self
    }

    pub fn with_link(mut self, rel: impl Into<String>, link: HalLink) -> Self {
        self.links.add(rel, link);
        self
    }

    pub fn with_links(mut self, links: HalLinks) -> Self {
        self.links = links;
        self
    }
}

/// A paginated collection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HalCollection<T> {
    #[serde(rename = "_type")]
    pub collection_type: String,
    pub count: i64,
    pub total: i64,
    pub page_size: i64,
    pub offset: i64,
    #[serde(rename = "_links")]
    pub links: HalLinks,
    #[serde(rename = "_embedded")]
    pub embedded: HalCollectionEmbedded<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HalCollectionEmbedded<T> {
    pub elements: Vec<T>,
}

impl<T: Serialize> HalCollection<T> {
    pub fn new(
        collection_type: impl Into<String>,
        elements: Vec<T>,
        total: i64,
        page_size: i64,
        offset: i64,
    ) -> Self {
        Self {
            collection_type: collection_type.into(),
            count: elements.len() as i64,
            total,
            page_size,
            offset,
            links: HalLinks::new(),
            embedded: HalCollectionEmbedded { elements },
        }
    }

    /// `self`, `jumpTo` and the neighbouring pages that exist
    pub fn with_pagination_links(mut self, base_url: &str) -> Self {
        let page = |offset: i64| format!("{}?offset={}&pageSize={}", base_url, offset, self.page_size);

        let mut links = HalLinks::new()
            .with(rels::SELF, HalLink::new(page(self.offset)))
            .with("jumpTo", HalLink::templated(format!("{}{{?offset,pageSize}}", base_url)));
        if self.offset > 0 {
            links.add(
                "previousByOffset",
                HalLink::new(page((self.offset - self.page_size).max(0))),
            );
        }
        if self.offset + self.page_size < self.total {
            links.add("nextByOffset", HalLink::new(page(self.offset + self.page_size)));
        }

        self.links = links;
        self
    }

    pub fn with_link(mut self, rel: impl Into<String>, link: HalLink) -> Self {
        self.links.add(rel, link);
        self
    }
}

/// Common link relations
pub mod rels {
    pub const SELF: &str = "self";
    pub const UPDATE: &str = "update";
    pub const DELETE: &str = "delete";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hal_link_with_title() {
        let link = HalLink::with_title("/api/users/u-1", "Ada");
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["href"], "/api/users/u-1");
        assert_eq!(json["title"], "Ada");
        assert!(json.get("method").is_none());
    }

    #[test]
    fn test_hal_resource() {
        #[derive(Serialize)]
        struct TestResource {
            id: i64,
            name: String,
        }

        let resource = HalResource::new(
            "TestResource",
            TestResource {
                id: 1,
                name: "Test".to_string(),
            },
        )
        .with_self_link("/api/test/1");

        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["_type"], "TestResource");
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Test");
        assert_eq!(json["_links"]["self"]["href"], "/api/test/1");
    }

    #[test]
    fn test_collection_links_on_first_page() {
        let collection = HalCollection::new("Items", vec![1, 2], 5, 2, 0)
            .with_pagination_links("/api/items");

        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["total"], 5);
        assert_eq!(json["pageSize"], 2);
        assert_eq!(json["_embedded"]["elements"], serde_json::json!([1, 2]));
        assert_eq!(json["_links"]["self"]["href"], "/api/items?offset=0&pageSize=2");
        assert_eq!(json["_links"]["nextByOffset"]["href"], "/api/items?offset=2&pageSize=2");
        assert!(json["_links"].get("previousByOffset").is_none());
    }

    #[test]
    fn test_collection_links_on_last_page() {
        let collection = HalCollection::new("Items", vec![5], 5, 2, 4)
            .with_pagination_links("/api/items");

        assert!(!collection.links.has("nextByOffset"));
        assert_eq!(
            collection.links.get("previousByOffset").map(|l| l.href.as_str()),
            Some("/api/items?offset=2&pageSize=2")
        );
    }
}
