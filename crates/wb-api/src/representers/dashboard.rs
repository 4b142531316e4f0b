//! Dashboard representers

use wb_services::{EmployeeDashboard, ManagerDashboard};

use super::hal::{HalLink, HalResource};

pub struct DashboardRepresenter;

impl DashboardRepresenter {
    pub fn manager(dashboard: ManagerDashboard) -> HalResource<ManagerDashboard> {
        HalResource::new("ManagerDashboard", dashboard)
            .with_self_link("/api/dashboard/manager")
            .with_link("projects", HalLink::new("/api/projects"))
            .with_link("workItems", HalLink::new("/api/workitems"))
    }

    pub fn employee(dashboard: EmployeeDashboard, user_id: &str) -> HalResource<EmployeeDashboard> {
        HalResource::new("EmployeeDashboard", dashboard)
            .with_self_link("/api/dashboard/employee")
            .with_link("workItems", HalLink::new("/api/workitems"))
            .with_link("profile", HalLink::new(format!("/api/users/{}/profile", user_id)))
    }
}
