use async_trait::async_trait;
use entity::{employees, reviews, users};
use platform_authz::{
    DirectoryError, EmployeeDirectory, EmployeeId, EmployeeRecord, ReviewId, ReviewLedger,
    ReviewParticipants, UserId, UserRecord, UserStore,
};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect};

/// Reads the org chart straight from the database on every call.
#[derive(Clone, Debug)]
pub struct SeaOrmDirectory {
    db: DatabaseConnection,
}

impl SeaOrmDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn backend(err: DbErr) -> DirectoryError {
    DirectoryError::Backend(err.to_string())
}

#[async_trait]
impl EmployeeDirectory for SeaOrmDirectory {
    async fn employee(&self, id: EmployeeId) -> Result<Option<EmployeeRecord>, DirectoryError> {
        let model = employees::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(model.map(|e| EmployeeRecord {
            id: e.id,
            manager_id: e.manager_id,
            department_id: e.department_id,
        }))
    }

    async fn employee_ids(&self) -> Result<Vec<EmployeeId>, DirectoryError> {
        employees::Entity::find()
            .select_only()
            .column(employees::Column::Id)
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .map_err(backend)
    }

    async fn direct_reports(
        &self,
        manager_id: EmployeeId,
    ) -> Result<Vec<EmployeeId>, DirectoryError> {
        employees::Entity::find()
            .select_only()
            .column(employees::Column::Id)
            .filter(employees::Column::ManagerId.eq(manager_id))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .map_err(backend)
    }
}

#[async_trait]
impl UserStore for SeaOrmDirectory {
    async fn user(&self, id: UserId) -> Result<Option<UserRecord>, DirectoryError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(model.map(|u| UserRecord {
            id: u.id,
            role: u.role,
            employee_id: u.employee_id,
        }))
    }
}

#[async_trait]
impl ReviewLedger for SeaOrmDirectory {
    async fn participants(
        &self,
        review_id: ReviewId,
    ) -> Result<Option<ReviewParticipants>, DirectoryError> {
        let model = reviews::Entity::find_by_id(review_id)
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(model.map(|r| ReviewParticipants {
            reviewer_id: r.reviewer_id,
            reviewee_id: r.reviewee_id,
        }))
    }
}
