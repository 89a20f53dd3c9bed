use entity::{employee_skills, employees, skills};
use platform_api::{ApiError, ApiResult, ensure};
use platform_authz::{Action, Principal, Resource};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{HrModule, db_error, require_text};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl HrModule {
    pub async fn list_skills(&self, _principal: Principal) -> ApiResult<Vec<skills::Model>> {
        skills::Entity::find()
            .order_by_asc(skills::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    pub async fn get_skill(&self, _principal: Principal, id: i32) -> ApiResult<skills::Model> {
        self.find_skill(id).await
    }

    /// Employees holding the skill, limited to the caller's scope.
    #[instrument(name = "hr.skills.employees", skip_all, fields(user_id = principal.user_id, skill_id = id))]
    pub async fn skill_employees(
        &self,
        principal: Principal,
        id: i32,
    ) -> ApiResult<Vec<employees::Model>> {
        self.find_skill(id).await?;
        let scope = self.access(principal).scope().await;
        let holders: Vec<employees::Model> = employee_skills::Entity::find()
            .filter(employee_skills::Column::SkillId.eq(id))
            .find_also_related(employees::Entity)
            .order_by_asc(employee_skills::Column::EmployeeId)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .filter_map(|(_, employee)| employee)
            .collect();
        Ok(scope.retain(holders, |e| Some(e.id)))
    }

    pub async fn create_skill(
        &self,
        principal: Principal,
        input: SkillInput,
    ) -> ApiResult<skills::Model> {
        ensure(principal.role.permits(Resource::Skills, Action::Manage))?;
        require_text(&input.name, "name")?;
        skills::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error)
    }

    pub async fn update_skill(
        &self,
        principal: Principal,
        id: i32,
        input: SkillInput,
    ) -> ApiResult<skills::Model> {
        ensure(principal.role.permits(Resource::Skills, Action::Manage))?;
        require_text(&input.name, "name")?;
        let mut active: skills::ActiveModel = self.find_skill(id).await?.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.update(&self.db).await.map_err(db_error)
    }

    pub async fn delete_skill(&self, principal: Principal, id: i32) -> ApiResult<()> {
        ensure(principal.role.permits(Resource::Skills, Action::Manage))?;
        let result = skills::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        if result.rows_affected == 0 {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn find_skill(&self, id: i32) -> ApiResult<skills::Model> {
        skills::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(ApiError::NotFound)
    }
}
