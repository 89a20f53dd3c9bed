use entity::{departments, employees};
use platform_api::{ApiError, ApiResult, ensure};
use platform_authz::Principal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{HrModule, db_error, require_text};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentInput {
    pub name: String,
}

impl HrModule {
    /// Department names are not sensitive; any signed-in role may list them.
    pub async fn list_departments(
        &self,
        _principal: Principal,
    ) -> ApiResult<Vec<departments::Model>> {
        departments::Entity::find()
            .order_by_asc(departments::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    pub async fn get_department(
        &self,
        _principal: Principal,
        id: i32,
    ) -> ApiResult<departments::Model> {
        self.find_department(id).await
    }

    #[instrument(name = "hr.departments.employees", skip_all, fields(user_id = principal.user_id, department_id = id))]
    pub async fn department_employees(
        &self,
        principal: Principal,
        id: i32,
    ) -> ApiResult<Vec<employees::Model>> {
        self.find_department(id).await?;
        let scope = self.access(principal).scope().await;
        let mut query = employees::Entity::find()
            .filter(employees::Column::DepartmentId.eq(id))
            .order_by_asc(employees::Column::Id);
        if let Some(ids) = scope.member_ids() {
            query = query.filter(employees::Column::Id.is_in(ids.iter().copied()));
        }
        query.all(&self.db).await.map_err(db_error)
    }

    pub async fn create_department(
        &self,
        principal: Principal,
        input: DepartmentInput,
    ) -> ApiResult<departments::Model> {
        ensure(self.access(principal).can_manage_departments())?;
        require_text(&input.name, "name")?;
        departments::ActiveModel {
            name: Set(input.name),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error)
    }

    pub async fn update_department(
        &self,
        principal: Principal,
        id: i32,
        input: DepartmentInput,
    ) -> ApiResult<departments::Model> {
        ensure(self.access(principal).can_manage_departments())?;
        require_text(&input.name, "name")?;
        let mut active: departments::ActiveModel = self.find_department(id).await?.into();
        active.name = Set(input.name);
        active.update(&self.db).await.map_err(db_error)
    }

    /// Members of a removed department become unassigned.
    pub async fn delete_department(&self, principal: Principal, id: i32) -> ApiResult<()> {
        ensure(self.access(principal).can_manage_departments())?;
        let result = departments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        if result.rows_affected == 0 {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    pub(crate) async fn find_department(&self, id: i32) -> ApiResult<departments::Model> {
        departments::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(ApiError::NotFound)
    }
}
