use std::collections::HashMap;

use entity::{review_cycles, review_templates, reviews};
use platform_api::{ApiError, ApiResult, ensure};
use platform_authz::{Action, AccessScope, EmployeeId, Principal, Resource, Role};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{HrModule, db_error, must_exist};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub cycle_id: i32,
    pub template_id: i32,
    #[serde(default)]
    pub reviewer_id: Option<EmployeeId>,
    #[serde(default)]
    pub reviewee_id: Option<EmployeeId>,
    pub rating: i32,
    #[serde(default)]
    pub comments: Option<String>,
}

impl ReviewInput {
    fn validate(&self) -> ApiResult<()> {
        if !(0..=5).contains(&self.rating) {
            return Err(ApiError::invalid("rating must be between 0 and 5"));
        }
        Ok(())
    }
}

/// A review as read back by clients, with its cycle and template attached.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: reviews::Model,
    pub cycle: Option<review_cycles::Model>,
    pub template: Option<review_templates::Model>,
}

/// Narrows a review listing before the access scope is applied.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReviewFilter {
    #[default]
    All,
    Cycle(i32),
    Reviewee(EmployeeId),
    Reviewer(EmployeeId),
}

fn scope_condition(scope: &AccessScope) -> Option<Condition> {
    let ids = scope.member_ids()?;
    Some(
        Condition::any()
            .add(reviews::Column::ReviewerId.is_in(ids.iter().copied()))
            .add(reviews::Column::RevieweeId.is_in(ids.iter().copied())),
    )
}

impl HrModule {
    #[instrument(name = "hr.reviews.list", skip_all, fields(user_id = principal.user_id, ?filter))]
    pub async fn list_reviews(
        &self,
        principal: Principal,
        filter: ReviewFilter,
    ) -> ApiResult<Vec<ReviewView>> {
        let access = self.access(principal);
        ensure(access.can_view_review(None).await)?;
        let scope = access.scope().await;
        let rows = self.reviews_in(&scope, filter).await?;
        self.with_catalog(rows).await
    }

    pub async fn get_review(&self, principal: Principal, id: i32) -> ApiResult<ReviewView> {
        let review = self.find_review(id).await?;
        let scope = self.access(principal).scope().await;
        ensure(scope.admits_review(review.reviewer_id, review.reviewee_id))?;
        let mut views = self.with_catalog(vec![review]).await?;
        views.pop().ok_or(ApiError::NotFound)
    }

    pub async fn list_review_cycles(
        &self,
        principal: Principal,
    ) -> ApiResult<Vec<review_cycles::Model>> {
        ensure(principal.role.permits(Resource::Reviews, Action::View))?;
        review_cycles::Entity::find()
            .order_by_asc(review_cycles::Column::StartDate)
            .order_by_asc(review_cycles::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    pub async fn list_review_templates(
        &self,
        principal: Principal,
    ) -> ApiResult<Vec<review_templates::Model>> {
        ensure(principal.role.permits(Resource::Reviews, Action::View))?;
        review_templates::Entity::find()
            .order_by_asc(review_templates::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    #[instrument(name = "hr.reviews.create", skip_all, fields(user_id = principal.user_id))]
    pub async fn create_review(
        &self,
        principal: Principal,
        input: ReviewInput,
    ) -> ApiResult<reviews::Model> {
        let access = self.access(principal);
        ensure(access.can_create_reviews())?;
        input.validate()?;
        ensure(access.scope().await.contains_opt(input.reviewee_id))?;
        self.check_review_references(&input).await?;

        let model = reviews::ActiveModel {
            cycle_id: Set(input.cycle_id),
            template_id: Set(input.template_id),
            reviewer_id: Set(input.reviewer_id),
            reviewee_id: Set(input.reviewee_id),
            rating: Set(input.rating),
            comments: Set(input.comments),
            is_locked: Set(false),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;
        info!(review_id = model.id, "review created");
        Ok(model)
    }

    /// Editing is for managers and HR. Locked reviews are frozen for everyone
    /// but HR admins.
    #[instrument(name = "hr.reviews.update", skip_all, fields(user_id = principal.user_id, review_id = id))]
    pub async fn update_review(
        &self,
        principal: Principal,
        id: i32,
        input: ReviewInput,
    ) -> ApiResult<reviews::Model> {
        ensure(principal.role.permits(Resource::Reviews, Action::Edit))?;
        let existing = self.find_review(id).await?;
        let scope = self.access(principal).scope().await;
        ensure(
            scope.admits_review(existing.reviewer_id, existing.reviewee_id)
                && scope.admits_review(input.reviewer_id, input.reviewee_id),
        )?;
        match principal.role {
            Role::HrAdmin => {}
            Role::Manager | Role::Employee => ensure(!existing.is_locked)?,
        }
        input.validate()?;
        self.check_review_references(&input).await?;

        let mut active: reviews::ActiveModel = existing.into();
        active.cycle_id = Set(input.cycle_id);
        active.template_id = Set(input.template_id);
        active.reviewer_id = Set(input.reviewer_id);
        active.reviewee_id = Set(input.reviewee_id);
        active.rating = Set(input.rating);
        active.comments = Set(input.comments);
        active.update(&self.db).await.map_err(db_error)
    }

    pub async fn lock_review(&self, principal: Principal, id: i32) -> ApiResult<reviews::Model> {
        self.set_review_lock(principal, id, true).await
    }

    pub async fn unlock_review(&self, principal: Principal, id: i32) -> ApiResult<reviews::Model> {
        self.set_review_lock(principal, id, false).await
    }

    #[instrument(name = "hr.reviews.lock", skip(self, principal), fields(user_id = principal.user_id))]
    async fn set_review_lock(
        &self,
        principal: Principal,
        id: i32,
        locked: bool,
    ) -> ApiResult<reviews::Model> {
        let existing = self.find_review(id).await?;
        let access = self.access(principal);
        ensure(access.can_create_reviews())?;
        ensure(
            access
                .scope()
                .await
                .admits_review(existing.reviewer_id, existing.reviewee_id),
        )?;
        let mut active: reviews::ActiveModel = existing.into();
        active.is_locked = Set(locked);
        active.update(&self.db).await.map_err(db_error)
    }

    #[instrument(name = "hr.reviews.delete", skip_all, fields(user_id = principal.user_id, review_id = id))]
    pub async fn delete_review(&self, principal: Principal, id: i32) -> ApiResult<()> {
        ensure(principal.role.permits(Resource::Reviews, Action::Delete))?;
        let result = reviews::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        if result.rows_affected == 0 {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    /// Reviews with either side inside `scope`, narrowed by `filter`.
    pub(crate) async fn reviews_in(
        &self,
        scope: &AccessScope,
        filter: ReviewFilter,
    ) -> ApiResult<Vec<reviews::Model>> {
        let mut query = reviews::Entity::find().order_by_asc(reviews::Column::Id);
        query = match filter {
            ReviewFilter::All => query,
            ReviewFilter::Cycle(id) => query.filter(reviews::Column::CycleId.eq(id)),
            ReviewFilter::Reviewee(id) => query.filter(reviews::Column::RevieweeId.eq(id)),
            ReviewFilter::Reviewer(id) => query.filter(reviews::Column::ReviewerId.eq(id)),
        };
        if let Some(condition) = scope_condition(scope) {
            query = query.filter(condition);
        }
        query.all(&self.db).await.map_err(db_error)
    }

    async fn with_catalog(&self, rows: Vec<reviews::Model>) -> ApiResult<Vec<ReviewView>> {
        let cycles: HashMap<i32, review_cycles::Model> = review_cycles::Entity::find()
            .filter(review_cycles::Column::Id.is_in(rows.iter().map(|r| r.cycle_id)))
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(|cycle| (cycle.id, cycle))
            .collect();
        let templates: HashMap<i32, review_templates::Model> = review_templates::Entity::find()
            .filter(review_templates::Column::Id.is_in(rows.iter().map(|r| r.template_id)))
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(|template| (template.id, template))
            .collect();
        Ok(rows
            .into_iter()
            .map(|review| ReviewView {
                cycle: cycles.get(&review.cycle_id).cloned(),
                template: templates.get(&review.template_id).cloned(),
                review,
            })
            .collect())
    }

    async fn check_review_references(&self, input: &ReviewInput) -> ApiResult<()> {
        let cycle = review_cycles::Entity::find_by_id(input.cycle_id)
            .one(&self.db)
            .await
            .map_err(db_error)?;
        if cycle.is_none() {
            return Err(ApiError::invalid("cycleId does not exist"));
        }
        let template = review_templates::Entity::find_by_id(input.template_id)
            .one(&self.db)
            .await
            .map_err(db_error)?;
        if template.is_none() {
            return Err(ApiError::invalid("templateId does not exist"));
        }
        if let Some(reviewer_id) = input.reviewer_id {
            must_exist(self.find_employee(reviewer_id).await, "reviewerId")?;
        }
        if let Some(reviewee_id) = input.reviewee_id {
            must_exist(self.find_employee(reviewee_id).await, "revieweeId")?;
        }
        Ok(())
    }

    async fn find_review(&self, id: i32) -> ApiResult<reviews::Model> {
        reviews::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(ApiError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{EMPLOYEE, HR_ADMIN, MANAGER, seeded};

    use super::*;

    fn input(reviewer_id: i32, reviewee_id: Option<i32>, rating: i32) -> ReviewInput {
        ReviewInput {
            cycle_id: 2,
            template_id: 1,
            reviewer_id: Some(reviewer_id),
            reviewee_id,
            rating,
            comments: Some("Mid-year check-in".into()),
        }
    }

    fn reviewees(rows: &[ReviewView]) -> Vec<Option<i32>> {
        rows.iter().map(|r| r.review.reviewee_id).collect()
    }

    #[tokio::test]
    async fn reviews_are_visible_when_either_side_is_in_scope() {
        let (hr, _) = seeded().await;
        assert_eq!(
            reviewees(&hr.list_reviews(EMPLOYEE, ReviewFilter::All).await.unwrap()),
            vec![Some(1)]
        );
        // Bob reviews Alice and Dan and is himself reviewed by Carol.
        assert_eq!(
            hr.list_reviews(MANAGER, ReviewFilter::All).await.unwrap().len(),
            3
        );
        assert_eq!(
            reviewees(
                &hr.list_reviews(MANAGER, ReviewFilter::Reviewee(4))
                    .await
                    .unwrap()
            ),
            vec![Some(4)]
        );
        assert!(
            hr.list_reviews(EMPLOYEE, ReviewFilter::Reviewer(3))
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            hr.list_reviews(HR_ADMIN, ReviewFilter::Cycle(1))
                .await
                .unwrap()
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn single_review_checks_scope() {
        let (hr, org) = seeded().await;
        let dan_review = org.review_of(4).unwrap().id;
        assert!(hr.get_review(MANAGER, dan_review).await.is_ok());
        assert!(matches!(
            hr.get_review(EMPLOYEE, dan_review).await,
            Err(ApiError::Forbidden)
        ));
        assert!(matches!(
            hr.get_review(EMPLOYEE, 999).await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn creating_reviews_needs_role_and_reachable_reviewee() {
        let (hr, _) = seeded().await;
        assert!(matches!(
            hr.create_review(EMPLOYEE, input(1, Some(1), 4)).await,
            Err(ApiError::Forbidden)
        ));
        assert!(matches!(
            hr.create_review(MANAGER, input(2, Some(3), 4)).await,
            Err(ApiError::Forbidden)
        ));
        assert!(matches!(
            hr.create_review(MANAGER, input(2, None, 4)).await,
            Err(ApiError::Forbidden)
        ));
        assert!(matches!(
            hr.create_review(MANAGER, input(2, Some(1), 9)).await,
            Err(ApiError::InvalidInput(_))
        ));
        let created = hr.create_review(MANAGER, input(2, Some(1), 5)).await.unwrap();
        assert!(!created.is_locked);
    }

    #[tokio::test]
    async fn locked_reviews_are_frozen_for_managers() {
        let (hr, org) = seeded().await;
        let alice_review = org.review_of(1).unwrap().id;

        assert!(matches!(
            hr.lock_review(EMPLOYEE, alice_review).await,
            Err(ApiError::Forbidden)
        ));
        assert!(hr.lock_review(MANAGER, alice_review).await.unwrap().is_locked);
        assert!(matches!(
            hr.update_review(MANAGER, alice_review, input(2, Some(1), 2)).await,
            Err(ApiError::Forbidden)
        ));
        let edited = hr
            .update_review(HR_ADMIN, alice_review, input(2, Some(1), 2))
            .await
            .unwrap();
        assert_eq!(edited.rating, 2);

        assert!(!hr.unlock_review(MANAGER, alice_review).await.unwrap().is_locked);
        assert!(
            hr.update_review(MANAGER, alice_review, input(2, Some(1), 3))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn updates_cannot_move_reviews_out_of_scope() {
        let (hr, org) = seeded().await;
        let dan_review = org.review_of(4).unwrap().id;
        assert!(matches!(
            hr.update_review(EMPLOYEE, dan_review, input(1, Some(1), 3)).await,
            Err(ApiError::Forbidden)
        ));
        // Moving the review onto Carol on both sides leaves Bob's team.
        assert!(matches!(
            hr.update_review(MANAGER, dan_review, input(3, Some(3), 3)).await,
            Err(ApiError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn only_hr_deletes_reviews() {
        let (hr, org) = seeded().await;
        let bob_review = org.review_of(2).unwrap().id;
        assert!(matches!(
            hr.delete_review(MANAGER, bob_review).await,
            Err(ApiError::Forbidden)
        ));
        hr.delete_review(HR_ADMIN, bob_review).await.unwrap();
        assert!(matches!(
            hr.delete_review(HR_ADMIN, bob_review).await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn employees_cannot_rewrite_their_own_review() {
        let (hr, org) = seeded().await;
        let alice_review = org.review_of(1).unwrap();
        assert!(matches!(
            hr.update_review(EMPLOYEE, alice_review.id, input(2, Some(1), 5)).await,
            Err(ApiError::Forbidden)
        ));
        let unchanged = hr.get_review(EMPLOYEE, alice_review.id).await.unwrap();
        assert_eq!(unchanged.review.rating, alice_review.rating);
    }

    #[tokio::test]
    async fn unknown_cycle_or_template_is_a_bad_request() {
        let (hr, org) = seeded().await;
        let mut bad_cycle = input(2, Some(1), 4);
        bad_cycle.cycle_id = 9999;
        assert!(matches!(
            hr.create_review(MANAGER, bad_cycle.clone()).await,
            Err(ApiError::InvalidInput(_))
        ));
        let mut bad_template = input(2, Some(1), 4);
        bad_template.template_id = 8888;
        assert!(matches!(
            hr.create_review(MANAGER, bad_template).await,
            Err(ApiError::InvalidInput(_))
        ));

        let alice_review = org.review_of(1).unwrap().id;
        assert!(matches!(
            hr.update_review(HR_ADMIN, alice_review, bad_cycle).await,
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn reads_carry_cycle_and_template() {
        let (hr, org) = seeded().await;
        let view = hr
            .get_review(EMPLOYEE, org.review_of(1).unwrap().id)
            .await
            .unwrap();
        assert_eq!(view.cycle.as_ref().map(|c| c.name.as_str()), Some("Q1 2025"));
        assert_eq!(
            view.template.as_ref().map(|t| t.name.as_str()),
            Some("Annual Performance Review")
        );

        let listed = hr.list_reviews(MANAGER, ReviewFilter::All).await.unwrap();
        assert!(listed.iter().all(|r| r.cycle.is_some() && r.template.is_some()));

        let cycles = hr.list_review_cycles(EMPLOYEE).await.unwrap();
        assert_eq!(cycles.len(), 3);
        assert_eq!(hr.list_review_templates(EMPLOYEE).await.unwrap().len(), 3);
    }
}
