//! Read-only collaborators the engine consults on every decision.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type EmployeeId = i32;
pub type UserId = i32;
pub type ReviewId = i32;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory backend failure: {0}")]
    Backend(String),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub manager_id: Option<EmployeeId>,
    pub department_id: Option<i32>,
}

/// A user account as stored. `role` stays a raw string so that values
/// outside the known set reach the engine and get denied there.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub role: String,
    pub employee_id: EmployeeId,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReviewParticipants {
    pub reviewer_id: Option<EmployeeId>,
    pub reviewee_id: Option<EmployeeId>,
}

impl ReviewParticipants {
    pub fn involves(&self, employee_id: EmployeeId) -> bool {
        self.reviewer_id == Some(employee_id) || self.reviewee_id == Some(employee_id)
    }
}

#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    async fn employee(&self, id: EmployeeId) -> Result<Option<EmployeeRecord>, DirectoryError>;

    async fn employee_ids(&self) -> Result<Vec<EmployeeId>, DirectoryError>;

    /// Employees whose `manager_id` equals `manager_id`. One level only.
    async fn direct_reports(&self, manager_id: EmployeeId)
    -> Result<Vec<EmployeeId>, DirectoryError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn user(&self, id: UserId) -> Result<Option<UserRecord>, DirectoryError>;
}

#[async_trait]
pub trait ReviewLedger: Send + Sync {
    async fn participants(
        &self,
        review_id: ReviewId,
    ) -> Result<Option<ReviewParticipants>, DirectoryError>;
}
