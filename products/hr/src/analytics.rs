//! Aggregates over the caller's scope. Managers see their team's numbers;
//! the department breakdown is HR only.

use std::collections::BTreeMap;

use entity::{departments, employees};
use platform_api::{ApiResult, ensure};
use platform_authz::Principal;
use sea_orm::EntityTrait;
use serde::Serialize;
use tracing::instrument;

use crate::{HrModule, db_error, reviews::ReviewFilter};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub employee_count: usize,
    pub goal_count: usize,
    pub goals_by_status: BTreeMap<String, usize>,
    pub average_goal_progress: Option<f64>,
    pub review_count: usize,
    pub average_rating: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentHeadcount {
    /// `None` groups employees without a department.
    pub department_id: Option<i32>,
    pub name: String,
    pub headcount: usize,
}

fn average(values: impl Iterator<Item = i32>) -> Option<f64> {
    let (sum, count) = values.fold((0i64, 0usize), |(sum, count), v| {
        (sum + i64::from(v), count + 1)
    });
    (count > 0).then(|| sum as f64 / count as f64)
}

impl HrModule {
    #[instrument(name = "hr.analytics.summary", skip_all, fields(user_id = principal.user_id))]
    pub async fn analytics_summary(&self, principal: Principal) -> ApiResult<AnalyticsSummary> {
        let access = self.access(principal);
        ensure(access.can_view_analytics())?;
        let scope = access.scope().await;

        let employees = self.employees_in(&scope).await?;
        let goals = self.goals_in(&scope).await?;
        let reviews = self.reviews_in(&scope, ReviewFilter::All).await?;

        let mut goals_by_status = BTreeMap::new();
        for goal in &goals {
            *goals_by_status.entry(goal.status.clone()).or_insert(0) += 1;
        }
        Ok(AnalyticsSummary {
            employee_count: employees.len(),
            goal_count: goals.len(),
            goals_by_status,
            average_goal_progress: average(goals.iter().filter_map(|g| g.progress)),
            review_count: reviews.len(),
            average_rating: average(reviews.iter().map(|r| r.rating)),
        })
    }

    #[instrument(name = "hr.analytics.departments", skip_all, fields(user_id = principal.user_id))]
    pub async fn department_breakdown(
        &self,
        principal: Principal,
    ) -> ApiResult<Vec<DepartmentHeadcount>> {
        ensure(self.access(principal).can_view_advanced_analytics())?;
        let departments = departments::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_error)?;
        let employees = employees::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_error)?;

        let mut counts: BTreeMap<Option<i32>, usize> = BTreeMap::new();
        for employee in &employees {
            *counts.entry(employee.department_id).or_insert(0) += 1;
        }
        let mut breakdown: Vec<DepartmentHeadcount> = departments
            .into_iter()
            .map(|d| DepartmentHeadcount {
                department_id: Some(d.id),
                headcount: counts.get(&Some(d.id)).copied().unwrap_or(0),
                name: d.name,
            })
            .collect();
        if let Some(&unassigned) = counts.get(&None) {
            breakdown.push(DepartmentHeadcount {
                department_id: None,
                name: "Unassigned".to_string(),
                headcount: unassigned,
            });
        }
        breakdown.sort_by(|a, b| b.headcount.cmp(&a.headcount).then(a.name.cmp(&b.name)));
        Ok(breakdown)
    }
}

#[cfg(test)]
mod tests {
    use platform_api::ApiError;

    use crate::testing::{EMPLOYEE, HR_ADMIN, MANAGER, seeded};

    use super::*;

    #[tokio::test]
    async fn summary_is_limited_to_the_team() {
        let (hr, _) = seeded().await;
        let team = hr.analytics_summary(MANAGER).await.unwrap();
        assert_eq!(team.employee_count, 3);
        assert_eq!(team.goal_count, 3);
        assert_eq!(team.review_count, 3);
        assert_eq!(team.goals_by_status.get("In Progress"), Some(&2));

        let everyone = hr.analytics_summary(HR_ADMIN).await.unwrap();
        assert_eq!(everyone.employee_count, 4);
        assert_eq!(everyone.average_rating, Some(4.0));

        assert!(matches!(
            hr.analytics_summary(EMPLOYEE).await,
            Err(ApiError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn summary_counts_agree_with_scoped_listings() {
        let (hr, _) = seeded().await;
        for principal in [MANAGER, HR_ADMIN] {
            let summary = hr.analytics_summary(principal).await.unwrap();
            let scope = hr.access(principal).scope().await;
            assert_eq!(summary.employee_count, hr.employees_in(&scope).await.unwrap().len());
            assert_eq!(summary.goal_count, hr.goals_in(&scope).await.unwrap().len());
            assert_eq!(
                summary.review_count,
                hr.list_reviews(principal, ReviewFilter::All).await.unwrap().len()
            );
        }
    }

    #[tokio::test]
    async fn department_breakdown_is_hr_only() {
        let (hr, _) = seeded().await;
        assert!(matches!(
            hr.department_breakdown(MANAGER).await,
            Err(ApiError::Forbidden)
        ));
        let breakdown = hr.department_breakdown(HR_ADMIN).await.unwrap();
        assert_eq!(breakdown[0].name, "Engineering");
        assert_eq!(breakdown[0].headcount, 3);
        assert_eq!(breakdown[1].headcount, 1);
        assert!(breakdown.iter().all(|d| d.department_id.is_some()));
    }

    #[test]
    fn average_of_nothing_is_none() {
        assert_eq!(average(std::iter::empty()), None);
        assert_eq!(average([1, 2].into_iter()), Some(1.5));
    }
}
