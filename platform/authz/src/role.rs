use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Privilege tier of an authenticated user.
///
/// Roles are a closed set with role-specific rules. There is no numeric
/// ordering: managers and HR admins hold overlapping but distinct powers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Employee")]
    Employee,
    #[serde(rename = "Manager")]
    Manager,
    #[serde(rename = "HR Admin")]
    HrAdmin,
}

#[derive(Debug, Clone, Error, Eq, PartialEq)]
#[error("unrecognized role {0:?}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::Employee, Role::Manager, Role::HrAdmin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Manager => "Manager",
            Role::HrAdmin => "HR Admin",
        }
    }

    /// Lenient parse used at trust boundaries: anything unrecognized is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        value.parse().ok()
    }

    pub fn is_management(self) -> bool {
        matches!(self, Role::Manager | Role::HrAdmin)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Employee" => Ok(Role::Employee),
            "Manager" => Ok(Role::Manager),
            "HR Admin" => Ok(Role::HrAdmin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
