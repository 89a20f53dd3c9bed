use entity::{employee_skills, employees, goals, skills};
use platform_api::{ApiError, ApiResult, ensure};
use platform_authz::{AccessScope, Action, EmployeeId, Principal, Resource, Role};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{HrModule, db_error, must_exist, require_text};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub manager_id: Option<i32>,
    #[serde(default)]
    pub department_id: Option<i32>,
}

impl EmployeeInput {
    fn validate(&self) -> ApiResult<()> {
        require_text(&self.first_name, "firstName")?;
        require_text(&self.last_name, "lastName")?;
        require_text(&self.role, "role")?;
        if !self.email.contains('@') {
            return Err(ApiError::invalid("email must be an address"));
        }
        Ok(())
    }
}

/// An employee's skill row joined with the skill itself.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSkillView {
    pub id: i32,
    pub employee_id: i32,
    pub skill_id: i32,
    pub proficiency_level: i32,
    pub skill: Option<skills::Model>,
}

impl HrModule {
    #[instrument(name = "hr.employees.list", skip_all, fields(user_id = principal.user_id))]
    pub async fn list_employees(&self, principal: Principal) -> ApiResult<Vec<employees::Model>> {
        let scope = self.access(principal).scope().await;
        self.employees_in(&scope).await
    }

    pub(crate) async fn employees_in(
        &self,
        scope: &AccessScope,
    ) -> ApiResult<Vec<employees::Model>> {
        let mut query = employees::Entity::find().order_by_asc(employees::Column::Id);
        if let Some(ids) = scope.member_ids() {
            query = query.filter(employees::Column::Id.is_in(ids.iter().copied()));
        }
        query.all(&self.db).await.map_err(db_error)
    }

    pub async fn get_employee(
        &self,
        principal: Principal,
        id: EmployeeId,
    ) -> ApiResult<employees::Model> {
        ensure(self.access(principal).can_access_employee(id).await)?;
        self.find_employee(id).await
    }

    #[instrument(name = "hr.employees.create", skip_all, fields(user_id = principal.user_id))]
    pub async fn create_employee(
        &self,
        principal: Principal,
        input: EmployeeInput,
    ) -> ApiResult<employees::Model> {
        ensure(principal.role.permits(Resource::Employees, Action::Create))?;
        input.validate()?;
        self.check_references(&input).await?;
        let model = employees::ActiveModel {
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            role: Set(input.role),
            manager_id: Set(input.manager_id),
            department_id: Set(input.department_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;
        info!(employee_id = model.id, "employee created");
        Ok(model)
    }

    /// Managers may edit their direct reports but not move them to another
    /// manager; reassignment belongs to HR.
    #[instrument(name = "hr.employees.update", skip_all, fields(user_id = principal.user_id, target = id))]
    pub async fn update_employee(
        &self,
        principal: Principal,
        id: EmployeeId,
        input: EmployeeInput,
    ) -> ApiResult<employees::Model> {
        ensure(self.access(principal).can_manage_employee(id).await)?;
        let existing = self.find_employee(id).await?;
        input.validate()?;
        if input.manager_id == Some(id) {
            return Err(ApiError::invalid("an employee cannot manage themselves"));
        }
        match principal.role {
            Role::HrAdmin => {}
            Role::Manager | Role::Employee => ensure(input.manager_id == existing.manager_id)?,
        }
        self.check_references(&input).await?;

        let mut active: employees::ActiveModel = existing.into();
        active.first_name = Set(input.first_name);
        active.last_name = Set(input.last_name);
        active.email = Set(input.email);
        active.role = Set(input.role);
        active.manager_id = Set(input.manager_id);
        active.department_id = Set(input.department_id);
        active.update(&self.db).await.map_err(db_error)
    }

    #[instrument(name = "hr.employees.delete", skip_all, fields(user_id = principal.user_id, target = id))]
    pub async fn delete_employee(&self, principal: Principal, id: EmployeeId) -> ApiResult<()> {
        ensure(principal.role.permits(Resource::Employees, Action::Delete))?;
        let result = employees::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        if result.rows_affected == 0 {
            return Err(ApiError::NotFound);
        }
        info!("employee deleted");
        Ok(())
    }

    pub async fn employee_goals(
        &self,
        principal: Principal,
        id: EmployeeId,
    ) -> ApiResult<Vec<goals::Model>> {
        ensure(self.access(principal).can_access_employee(id).await)?;
        goals::Entity::find()
            .filter(goals::Column::EmployeeId.eq(id))
            .order_by_asc(goals::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    pub async fn employee_skills(
        &self,
        principal: Principal,
        id: EmployeeId,
    ) -> ApiResult<Vec<EmployeeSkillView>> {
        ensure(self.access(principal).can_access_employee(id).await)?;
        let rows = employee_skills::Entity::find()
            .filter(employee_skills::Column::EmployeeId.eq(id))
            .find_also_related(skills::Entity)
            .order_by_asc(employee_skills::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?;
        Ok(rows
            .into_iter()
            .map(|(row, skill)| EmployeeSkillView {
                id: row.id,
                employee_id: row.employee_id,
                skill_id: row.skill_id,
                proficiency_level: row.proficiency_level,
                skill,
            })
            .collect())
    }

    async fn check_references(&self, input: &EmployeeInput) -> ApiResult<()> {
        if let Some(manager_id) = input.manager_id {
            must_exist(self.find_employee(manager_id).await, "managerId")?;
        }
        if let Some(department_id) = input.department_id {
            must_exist(self.find_department(department_id).await, "departmentId")?;
        }
        Ok(())
    }

    pub(crate) async fn find_employee(&self, id: EmployeeId) -> ApiResult<employees::Model> {
        employees::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(ApiError::NotFound)
    }
}
