//! Coarse role gates per resource and action.
//!
//! These answer "may this role ever do X" and back route-level checks.
//! Row-level visibility is decided by the engine and the access scope.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::role::Role;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Employees,
    Goals,
    Reviews,
    Skills,
    Departments,
    Analytics,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Manage,
    Advanced,
}

const EVERYONE: &[Role] = &[Role::Employee, Role::Manager, Role::HrAdmin];
const MANAGEMENT: &[Role] = &[Role::Manager, Role::HrAdmin];
const HR_ONLY: &[Role] = &[Role::HrAdmin];
const NOBODY: &[Role] = &[];

/// Roles granted `action` on `resource`. Pairs not listed grant nobody.
pub fn allowed_roles(resource: Resource, action: Action) -> &'static [Role] {
    use Action::*;
    use Resource::*;

    match (resource, action) {
        (Employees, View) => EVERYONE,
        (Employees, Edit) => MANAGEMENT,
        (Employees, Create | Delete) => HR_ONLY,

        (Goals, View | Edit) => EVERYONE,
        (Goals, Create) => MANAGEMENT,
        (Goals, Delete) => HR_ONLY,

        (Reviews, View) => EVERYONE,
        (Reviews, Create | Edit) => MANAGEMENT,
        (Reviews, Delete) => HR_ONLY,

        (Skills, View | Edit) => EVERYONE,
        (Skills, Manage) => HR_ONLY,

        (Departments, View) => EVERYONE,
        (Departments, Manage) => HR_ONLY,

        (Analytics, View) => MANAGEMENT,
        (Analytics, Advanced) => HR_ONLY,

        _ => NOBODY,
    }
}

impl Role {
    pub fn permits(self, resource: Resource, action: Action) -> bool {
        allowed_roles(resource, action).contains(&self)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Employees => "employees",
            Resource::Goals => "goals",
            Resource::Reviews => "reviews",
            Resource::Skills => "skills",
            Resource::Departments => "departments",
            Resource::Analytics => "analytics",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Manage => "manage",
            Action::Advanced => "advanced",
        };
        f.write_str(name)
    }
}
