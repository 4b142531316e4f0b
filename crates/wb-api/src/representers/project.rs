//! Project representer

use wb_db::PaginatedResult;
use wb_models::Project;

use super::hal::{rels, HalCollection, HalLink, HalLinks, HalResource};

pub const PROJECTS_PATH: &str = "/api/projects";

pub struct ProjectRepresenter;

impl ProjectRepresenter {
    /// `can_manage` adds the update and delete links
    pub fn represent(project: Project, can_manage: bool) -> HalResource<Project> {
        let links = Self::build_links(&project, can_manage);
        HalResource::new("Project", project).with_links(links)
    }

    pub fn represent_collection(
        page: PaginatedResult<Project>,
        can_manage: bool,
    ) -> HalCollection<HalResource<Project>> {
        let PaginatedResult {
            items,
            total,
            limit,
            offset,
        } = page;
        let elements = items
            .into_iter()
            .map(|project| Self::represent(project, can_manage))
            .collect();

        let collection = HalCollection::new("ProjectCollection", elements, total, limit, offset)
            .with_pagination_links(PROJECTS_PATH);
        if can_manage {
            collection.with_link("createProject", HalLink::new(PROJECTS_PATH).method("POST"))
        } else {
            collection
        }
    }

    fn build_links(project: &Project, can_manage: bool) -> HalLinks {
        let base = format!("{}/{}", PROJECTS_PATH, project.id.unwrap_or_default());

        let mut links = HalLinks::new()
            .with(rels::SELF, HalLink::with_title(&base, &project.name))
            .with("workItems", HalLink::new(format!("{}/workitems", base)))
            .with("createdBy", HalLink::new(format!("/api/users/{}", project.created_by_id)));
        if can_manage {
            links.add(rels::UPDATE, HalLink::new(&base).method("PATCH"));
            links.add(rels::DELETE, HalLink::new(&base).method("DELETE"));
        }
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wb_db::Pagination;

    fn project() -> Project {
        let mut project = Project::new(
            "Apollo",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            "m-1",
        );
        project.id = Some(3);
        project
    }

    #[test]
    fn test_project_representation() {
        let json = serde_json::to_value(ProjectRepresenter::represent(project(), false)).unwrap();
        assert_eq!(json["_type"], "Project");
        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "Apollo");
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["status"], "Active");
        assert_eq!(json["_links"]["self"]["href"], "/api/projects/3");
        assert_eq!(json["_links"]["workItems"]["href"], "/api/projects/3/workitems");
        assert!(json["_links"].get("delete").is_none());
    }

    #[test]
    fn test_manage_links() {
        let hal = ProjectRepresenter::represent(project(), true);
        assert_eq!(hal.links.get("delete").and_then(|l| l.method.as_deref()), Some("DELETE"));
        assert!(hal.links.has("update"));
    }

    #[test]
    fn test_collection() {
        let page = PaginatedResult::new(vec![project()], 1, Pagination::new(20, 0));
        let json = serde_json::to_value(ProjectRepresenter::represent_collection(page, true)).unwrap();
        assert_eq!(json["_type"], "ProjectCollection");
        assert_eq!(json["_embedded"]["elements"][0]["_type"], "Project");
        assert_eq!(json["_links"]["createProject"]["method"], "POST");
    }
}
