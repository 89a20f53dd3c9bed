use std::{collections::BTreeSet, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    directory::{
        DirectoryError, EmployeeDirectory, EmployeeId, ReviewId, ReviewLedger, UserId, UserStore,
    },
    role::Role,
    scope::AccessScope,
};

/// Identity of the caller for one request, resolved once from the user store
/// or from signed token claims.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: UserId,
    pub employee_id: EmployeeId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: UserId, employee_id: EmployeeId, role: Role) -> Self {
        Self {
            user_id,
            employee_id,
            role,
        }
    }
}

/// Answers access questions from role and hierarchy data.
///
/// The engine holds no state of its own. Every call reads the current
/// org chart from its collaborators, so reassignments apply on the next
/// request. Collaborator failures are logged and treated as "no access".
#[derive(Clone)]
pub struct AccessEngine {
    directory: Arc<dyn EmployeeDirectory>,
    users: Arc<dyn UserStore>,
    reviews: Arc<dyn ReviewLedger>,
}

impl AccessEngine {
    pub fn new(
        directory: Arc<dyn EmployeeDirectory>,
        users: Arc<dyn UserStore>,
        reviews: Arc<dyn ReviewLedger>,
    ) -> Self {
        Self {
            directory,
            users,
            reviews,
        }
    }

    /// Build an engine over a single store serving all three lookups.
    pub fn from_store<S>(store: S) -> Self
    where
        S: EmployeeDirectory + UserStore + ReviewLedger + 'static,
    {
        let store = Arc::new(store);
        Self {
            directory: store.clone(),
            users: store.clone(),
            reviews: store,
        }
    }

    /// Per-request view bound to an already resolved principal.
    pub fn for_principal(&self, principal: Principal) -> PrincipalAccess<'_> {
        PrincipalAccess {
            engine: self,
            principal,
        }
    }

    /// Resolve a user id into a principal. Requires a known user, a
    /// recognized role and an existing linked employee.
    pub async fn resolve(&self, user_id: UserId) -> Option<Principal> {
        or_deny(self.try_resolve(user_id).await, "resolve")
    }

    async fn try_resolve(&self, user_id: UserId) -> Result<Option<Principal>, DirectoryError> {
        let Some(user) = self.users.user(user_id).await? else {
            debug!(user_id, "unknown user");
            return Ok(None);
        };
        let Some(role) = Role::parse(&user.role) else {
            debug!(user_id, role = %user.role, "unrecognized role");
            return Ok(None);
        };
        if self.directory.employee(user.employee_id).await?.is_none() {
            debug!(user_id, employee_id = user.employee_id, "linked employee missing");
            return Ok(None);
        }
        Ok(Some(Principal::new(user.id, user.employee_id, role)))
    }

    async fn resolve_role(&self, user_id: UserId) -> Option<Role> {
        let user = or_deny(self.users.user(user_id).await, "resolve_role")?;
        Role::parse(&user.role)
    }

    pub async fn can_access_employee(&self, user_id: UserId, target: EmployeeId) -> bool {
        match self.resolve(user_id).await {
            Some(p) => self.for_principal(p).can_access_employee(target).await,
            None => false,
        }
    }

    pub async fn can_manage_employee(&self, user_id: UserId, target: EmployeeId) -> bool {
        match self.resolve(user_id).await {
            Some(p) => self.for_principal(p).can_manage_employee(target).await,
            None => false,
        }
    }

    pub async fn accessible_employee_ids(&self, user_id: UserId) -> BTreeSet<EmployeeId> {
        match self.resolve(user_id).await {
            Some(p) => self.for_principal(p).accessible_employee_ids().await,
            None => BTreeSet::new(),
        }
    }

    pub async fn manageable_employee_ids(&self, user_id: UserId) -> BTreeSet<EmployeeId> {
        match self.resolve(user_id).await {
            Some(p) => self.for_principal(p).manageable_employee_ids().await,
            None => BTreeSet::new(),
        }
    }

    pub async fn can_view_review(&self, user_id: UserId, review_id: Option<ReviewId>) -> bool {
        match self.resolve(user_id).await {
            Some(p) => self.for_principal(p).can_view_review(review_id).await,
            None => false,
        }
    }

    pub async fn can_create_reviews(&self, user_id: UserId) -> bool {
        self.resolve_role(user_id)
            .await
            .is_some_and(rules::can_create_reviews)
    }

    pub async fn can_manage_departments(&self, user_id: UserId) -> bool {
        self.resolve_role(user_id)
            .await
            .is_some_and(rules::can_manage_departments)
    }

    pub async fn can_view_analytics(&self, user_id: UserId) -> bool {
        self.resolve_role(user_id)
            .await
            .is_some_and(rules::can_view_analytics)
    }

    pub async fn can_view_advanced_analytics(&self, user_id: UserId) -> bool {
        self.resolve_role(user_id)
            .await
            .is_some_and(rules::can_view_advanced_analytics)
    }

    async fn is_direct_report(
        &self,
        manager_id: EmployeeId,
        target: EmployeeId,
    ) -> Result<bool, DirectoryError> {
        let employee = self.directory.employee(target).await?;
        Ok(employee.is_some_and(|e| e.manager_id == Some(manager_id)))
    }
}

/// Access checks for one principal.
pub struct PrincipalAccess<'a> {
    engine: &'a AccessEngine,
    principal: Principal,
}

impl PrincipalAccess<'_> {
    pub fn principal(&self) -> Principal {
        self.principal
    }

    pub async fn can_access_employee(&self, target: EmployeeId) -> bool {
        let me = self.principal.employee_id;
        let decision = match self.principal.role {
            Role::HrAdmin => Ok(true),
            _ if target == me => Ok(true),
            Role::Manager => self.engine.is_direct_report(me, target).await,
            Role::Employee => Ok(false),
        };
        or_deny(decision, "can_access_employee")
    }

    /// Self is never manageable; a manager is not their own subordinate.
    pub async fn can_manage_employee(&self, target: EmployeeId) -> bool {
        let decision = match self.principal.role {
            Role::HrAdmin => Ok(true),
            Role::Manager => {
                self.engine
                    .is_direct_report(self.principal.employee_id, target)
                    .await
            }
            Role::Employee => Ok(false),
        };
        or_deny(decision, "can_manage_employee")
    }

    pub async fn accessible_employee_ids(&self) -> BTreeSet<EmployeeId> {
        let ids = match self.principal.role {
            Role::HrAdmin => self.all_employee_ids().await,
            Role::Manager => self.team_ids().await,
            Role::Employee => Ok(BTreeSet::from([self.principal.employee_id])),
        };
        or_deny(ids, "accessible_employee_ids")
    }

    pub async fn manageable_employee_ids(&self) -> BTreeSet<EmployeeId> {
        let ids = match self.principal.role {
            Role::HrAdmin => self.all_employee_ids().await,
            Role::Manager => self.report_ids().await,
            Role::Employee => Ok(BTreeSet::new()),
        };
        or_deny(ids, "manageable_employee_ids")
    }

    /// Readable employees as a filter. HR admins get an unrestricted scope
    /// instead of an enumerated id set.
    pub async fn scope(&self) -> AccessScope {
        let scope = match self.principal.role {
            Role::HrAdmin => Ok(AccessScope::Unrestricted),
            Role::Manager => self.team_ids().await.map(AccessScope::Members),
            Role::Employee => Ok(AccessScope::members([self.principal.employee_id])),
        };
        scope.unwrap_or_else(|err| {
            warn!(error = %err, op = "scope", "directory lookup failed, denying");
            AccessScope::none()
        })
    }

    /// Without a review id this is advisory only: list endpoints must still
    /// filter through [`Self::scope`].
    pub async fn can_view_review(&self, review_id: Option<ReviewId>) -> bool {
        if self.principal.role == Role::HrAdmin {
            return true;
        }
        let Some(review_id) = review_id else {
            return true;
        };
        or_deny(self.try_view_review(review_id).await, "can_view_review")
    }

    async fn try_view_review(&self, review_id: ReviewId) -> Result<bool, DirectoryError> {
        let me = self.principal.employee_id;
        let Some(review) = self.engine.reviews.participants(review_id).await? else {
            return Ok(false);
        };
        if review.involves(me) {
            return Ok(true);
        }
        match (self.principal.role, review.reviewee_id) {
            (Role::Manager, Some(reviewee)) => self.engine.is_direct_report(me, reviewee).await,
            (Role::Manager, None) | (Role::Employee, _) | (Role::HrAdmin, _) => Ok(false),
        }
    }

    pub fn can_create_reviews(&self) -> bool {
        rules::can_create_reviews(self.principal.role)
    }

    pub fn can_manage_departments(&self) -> bool {
        rules::can_manage_departments(self.principal.role)
    }

    pub fn can_view_analytics(&self) -> bool {
        rules::can_view_analytics(self.principal.role)
    }

    pub fn can_view_advanced_analytics(&self) -> bool {
        rules::can_view_advanced_analytics(self.principal.role)
    }

    async fn all_employee_ids(&self) -> Result<BTreeSet<EmployeeId>, DirectoryError> {
        Ok(self
            .engine
            .directory
            .employee_ids()
            .await?
            .into_iter()
            .collect())
    }

    async fn report_ids(&self) -> Result<BTreeSet<EmployeeId>, DirectoryError> {
        Ok(self
            .engine
            .directory
            .direct_reports(self.principal.employee_id)
            .await?
            .into_iter()
            .collect())
    }

    async fn team_ids(&self) -> Result<BTreeSet<EmployeeId>, DirectoryError> {
        let mut ids = self.report_ids().await?;
        ids.insert(self.principal.employee_id);
        Ok(ids)
    }
}

mod rules {
    use crate::role::Role;

    pub fn can_create_reviews(role: Role) -> bool {
        role.is_management()
    }

    pub fn can_manage_departments(role: Role) -> bool {
        match role {
            Role::HrAdmin => true,
            Role::Manager | Role::Employee => false,
        }
    }

    pub fn can_view_analytics(role: Role) -> bool {
        role.is_management()
    }

    pub fn can_view_advanced_analytics(role: Role) -> bool {
        match role {
            Role::HrAdmin => true,
            Role::Manager | Role::Employee => false,
        }
    }
}

fn or_deny<T: Default>(result: Result<T, DirectoryError>, op: &'static str) -> T {
    result.unwrap_or_else(|err| {
        warn!(error = %err, op, "directory lookup failed, denying");
        T::default()
    })
}
