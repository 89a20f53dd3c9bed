use chrono::NaiveDate;
use entity::goals;
use platform_api::{ApiError, ApiResult, ensure};
use platform_authz::{AccessScope, Action, Principal, Resource};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{HrModule, db_error, must_exist};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_status")]
    pub status: String,
    pub employee_id: i32,
    #[serde(default)]
    pub manager_id: Option<i32>,
    #[serde(default)]
    pub progress: Option<i32>,
    #[serde(default)]
    pub notes: String,
}

fn default_status() -> String {
    "Not Started".to_string()
}

impl GoalInput {
    fn validate(&self) -> ApiResult<()> {
        if self.title.trim().chars().count() < 3 {
            return Err(ApiError::invalid("title needs at least 3 characters"));
        }
        if self.end_date < self.start_date {
            return Err(ApiError::invalid("endDate is before startDate"));
        }
        if self.progress.is_some_and(|p| !(0..=100).contains(&p)) {
            return Err(ApiError::invalid("progress must be between 0 and 100"));
        }
        Ok(())
    }
}

impl HrModule {
    #[instrument(name = "hr.goals.list", skip_all, fields(user_id = principal.user_id))]
    pub async fn list_goals(&self, principal: Principal) -> ApiResult<Vec<goals::Model>> {
        let scope = self.access(principal).scope().await;
        self.goals_in(&scope).await
    }

    /// Goals owned by someone inside `scope`.
    pub(crate) async fn goals_in(&self, scope: &AccessScope) -> ApiResult<Vec<goals::Model>> {
        let mut query = goals::Entity::find().order_by_asc(goals::Column::Id);
        if let Some(ids) = scope.member_ids() {
            query = query.filter(goals::Column::EmployeeId.is_in(ids.iter().copied()));
        }
        query.all(&self.db).await.map_err(db_error)
    }

    pub async fn get_goal(&self, principal: Principal, id: i32) -> ApiResult<goals::Model> {
        let goal = self.find_goal(id).await?;
        ensure(self.access(principal).scope().await.contains(goal.employee_id))?;
        Ok(goal)
    }

    /// Managers assign goals to themselves and their direct reports only.
    #[instrument(name = "hr.goals.create", skip_all, fields(user_id = principal.user_id))]
    pub async fn create_goal(
        &self,
        principal: Principal,
        input: GoalInput,
    ) -> ApiResult<goals::Model> {
        ensure(principal.role.permits(Resource::Goals, Action::Create))?;
        input.validate()?;
        ensure(self.access(principal).scope().await.contains(input.employee_id))?;
        self.check_goal_references(&input).await?;

        let model = goals::ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            status: Set(input.status),
            employee_id: Set(input.employee_id),
            manager_id: Set(input.manager_id),
            progress: Set(input.progress),
            notes: Set(input.notes),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;
        info!(goal_id = model.id, employee_id = model.employee_id, "goal created");
        Ok(model)
    }

    /// Both the current and the requested owner must be in scope, so a goal
    /// cannot be moved into or out of someone else's team.
    #[instrument(name = "hr.goals.update", skip_all, fields(user_id = principal.user_id, goal_id = id))]
    pub async fn update_goal(
        &self,
        principal: Principal,
        id: i32,
        input: GoalInput,
    ) -> ApiResult<goals::Model> {
        let existing = self.find_goal(id).await?;
        let scope = self.access(principal).scope().await;
        ensure(scope.contains(existing.employee_id) && scope.contains(input.employee_id))?;
        input.validate()?;
        self.check_goal_references(&input).await?;

        let mut active: goals::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.description = Set(input.description);
        active.start_date = Set(input.start_date);
        active.end_date = Set(input.end_date);
        active.status = Set(input.status);
        active.employee_id = Set(input.employee_id);
        active.manager_id = Set(input.manager_id);
        active.progress = Set(input.progress);
        active.notes = Set(input.notes);
        active.update(&self.db).await.map_err(db_error)
    }

    #[instrument(name = "hr.goals.delete", skip_all, fields(user_id = principal.user_id, goal_id = id))]
    pub async fn delete_goal(&self, principal: Principal, id: i32) -> ApiResult<()> {
        ensure(principal.role.permits(Resource::Goals, Action::Delete))?;
        let result = goals::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        if result.rows_affected == 0 {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn check_goal_references(&self, input: &GoalInput) -> ApiResult<()> {
        must_exist(self.find_employee(input.employee_id).await, "employeeId")?;
        if let Some(manager_id) = input.manager_id {
            must_exist(self.find_employee(manager_id).await, "managerId")?;
        }
        Ok(())
    }

    async fn find_goal(&self, id: i32) -> ApiResult<goals::Model> {
        goals::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(ApiError::NotFound)
    }
}
