//! HashMap-backed collaborators for tests and fixtures.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::directory::{
    DirectoryError, EmployeeDirectory, EmployeeId, EmployeeRecord, ReviewId, ReviewLedger,
    ReviewParticipants, UserId, UserRecord, UserStore,
};

#[derive(Clone, Debug, Default)]
pub struct InMemoryDirectory {
    employees: HashMap<EmployeeId, EmployeeRecord>,
    users: HashMap<UserId, UserRecord>,
    reviews: HashMap<ReviewId, ReviewParticipants>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employee(mut self, id: EmployeeId, manager_id: Option<EmployeeId>) -> Self {
        self.employees.insert(
            id,
            EmployeeRecord {
                id,
                manager_id,
                department_id: None,
            },
        );
        self
    }

    pub fn with_user(mut self, id: UserId, role: &str, employee_id: EmployeeId) -> Self {
        self.users.insert(
            id,
            UserRecord {
                id,
                role: role.to_string(),
                employee_id,
            },
        );
        self
    }

    pub fn with_review(
        mut self,
        id: ReviewId,
        reviewer_id: Option<EmployeeId>,
        reviewee_id: Option<EmployeeId>,
    ) -> Self {
        self.reviews.insert(
            id,
            ReviewParticipants {
                reviewer_id,
                reviewee_id,
            },
        );
        self
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryDirectory {
    async fn employee(&self, id: EmployeeId) -> Result<Option<EmployeeRecord>, DirectoryError> {
        Ok(self.employees.get(&id).cloned())
    }

    async fn employee_ids(&self) -> Result<Vec<EmployeeId>, DirectoryError> {
        Ok(self.employees.keys().copied().collect())
    }

    async fn direct_reports(
        &self,
        manager_id: EmployeeId,
    ) -> Result<Vec<EmployeeId>, DirectoryError> {
        Ok(self
            .employees
            .values()
            .filter(|e| e.manager_id == Some(manager_id))
            .map(|e| e.id)
            .collect())
    }
}

#[async_trait]
impl UserStore for InMemoryDirectory {
    async fn user(&self, id: UserId) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self.users.get(&id).cloned())
    }
}

#[async_trait]
impl ReviewLedger for InMemoryDirectory {
    async fn participants(
        &self,
        review_id: ReviewId,
    ) -> Result<Option<ReviewParticipants>, DirectoryError> {
        Ok(self.reviews.get(&review_id).copied())
    }
}
