//! HR services: every read and write runs through the access engine.
//!
//! [`HrModule`] owns the database handle and an [`AccessEngine`] built over
//! the same connection. Each resource lives in its own module as an
//! `impl HrModule` block taking the caller's [`Principal`] first.

pub mod accounts;
pub mod analytics;
pub mod departments;
pub mod employees;
pub mod goals;
pub mod reviews;
pub mod seed;
pub mod skills;

use platform_api::{ApiError, ApiResult, internal_error};
use platform_authz::{AccessEngine, Principal, PrincipalAccess};
use platform_db::{DbPool, SeaOrmDirectory};
use sea_orm::DbErr;

pub use accounts::{LoginRequest, LoginResponse, RegisterRequest, UserProfile};
pub use analytics::{AnalyticsSummary, DepartmentHeadcount};
pub use departments::DepartmentInput;
pub use employees::{EmployeeInput, EmployeeSkillView};
pub use goals::GoalInput;
pub use reviews::{ReviewFilter, ReviewInput, ReviewView};
pub use seed::{SeededOrg, seed_demo};
pub use skills::SkillInput;

#[derive(Clone)]
pub struct HrModule {
    db: DbPool,
    engine: AccessEngine,
}

impl HrModule {
    pub fn new(db: DbPool) -> Self {
        let engine = AccessEngine::from_store(SeaOrmDirectory::new(db.clone()));
        Self { db, engine }
    }

    pub fn db(&self) -> &DbPool {
        &self.db
    }

    fn access(&self, principal: Principal) -> PrincipalAccess<'_> {
        self.engine.for_principal(principal)
    }
}

pub(crate) fn db_error(err: DbErr) -> ApiError {
    internal_error(err)
}

/// A dangling reference in a request body is the caller's mistake, not a
/// missing resource.
pub(crate) fn must_exist<T>(lookup: ApiResult<T>, field: &str) -> ApiResult<()> {
    match lookup {
        Ok(_) => Ok(()),
        Err(ApiError::NotFound) => Err(ApiError::invalid(format!("{field} does not exist"))),
        Err(err) => Err(err),
    }
}

pub(crate) fn require_text(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use migration::{Migrator, MigratorTrait};
    use platform_authz::{Principal, Role};
    use sea_orm::Database;

    use crate::{HrModule, SeededOrg, seed_demo};

    pub const EMPLOYEE: Principal = Principal {
        user_id: 1,
        employee_id: 1,
        role: Role::Employee,
    };
    pub const MANAGER: Principal = Principal {
        user_id: 2,
        employee_id: 2,
        role: Role::Manager,
    };
    pub const HR_ADMIN: Principal = Principal {
        user_id: 3,
        employee_id: 3,
        role: Role::HrAdmin,
    };

    pub async fn seeded() -> (HrModule, SeededOrg) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let org = seed_demo(&db).await.unwrap().expect("fresh database");
        (HrModule::new(db), org)
    }
}
