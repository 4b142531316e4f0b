//! Work item representer
//!
//! Links advertise what the caller may do next: the transition link is always
//! present, update and delete only for users who manage work items.

use wb_auth::CurrentUser;
use wb_contracts::UserContext;
use wb_db::PaginatedResult;
use wb_models::{permissions, WorkItem};

use super::hal::{rels, HalCollection, HalLink, HalLinks, HalResource};

pub const WORK_ITEMS_PATH: &str = "/api/workitems";

pub struct WorkItemRepresenter;

impl WorkItemRepresenter {
    pub fn represent(item: WorkItem, user: &CurrentUser) -> HalResource<WorkItem> {
        let links = Self::build_links(&item, user);
        HalResource::new("WorkItem", item).with_links(links)
    }

    /// `base_url` is the path the page was requested from
    pub fn represent_collection(
        page: PaginatedResult<WorkItem>,
        user: &CurrentUser,
        base_url: &str,
    ) -> HalCollection<HalResource<WorkItem>> {
        let PaginatedResult {
            items,
            total,
            limit,
            offset,
        } = page;
        let elements = items
            .into_iter()
            .map(|item| Self::represent(item, user))
            .collect();

        HalCollection::new("WorkItemCollection", elements, total, limit, offset)
            .with_pagination_links(base_url)
    }

    fn build_links(item: &WorkItem, user: &CurrentUser) -> HalLinks {
        let base = format!("{}/{}", WORK_ITEMS_PATH, item.id.unwrap_or_default());

        let mut links = HalLinks::new()
            .with(rels::SELF, HalLink::with_title(&base, &item.name))
            .with("project", HalLink::new(format!("/api/projects/{}", item.project_id)))
            .with("assignee", HalLink::new(format!("/api/users/{}", item.assigned_to_id)))
            .with("changeStatus", HalLink::new(format!("{}/status", base)).method("PATCH"));
        if user.allowed(permissions::MANAGE_WORK_ITEMS) {
            links.add(rels::UPDATE, HalLink::new(&base).method("PATCH"));
            links.add(rels::DELETE, HalLink::new(&base).method("DELETE"));
        }
        links
    }
}
