use std::collections::BTreeSet;

use crate::directory::EmployeeId;

/// Snapshot of the employees a principal may read, taken once per request
/// and used to filter whole collections by membership.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AccessScope {
    /// Every employee, present or future.
    Unrestricted,
    Members(BTreeSet<EmployeeId>),
}

impl AccessScope {
    pub fn none() -> Self {
        AccessScope::Members(BTreeSet::new())
    }

    pub fn members(ids: impl IntoIterator<Item = EmployeeId>) -> Self {
        AccessScope::Members(ids.into_iter().collect())
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, AccessScope::Unrestricted)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AccessScope::Unrestricted => false,
            AccessScope::Members(ids) => ids.is_empty(),
        }
    }

    pub fn contains(&self, id: EmployeeId) -> bool {
        match self {
            AccessScope::Unrestricted => true,
            AccessScope::Members(ids) => ids.contains(&id),
        }
    }

    /// Null references never match a restricted scope.
    pub fn contains_opt(&self, id: Option<EmployeeId>) -> bool {
        match (self, id) {
            (AccessScope::Unrestricted, _) => true,
            (AccessScope::Members(ids), Some(id)) => ids.contains(&id),
            (AccessScope::Members(_), None) => false,
        }
    }

    /// A review is visible when either side of it is in scope.
    pub fn admits_review(
        &self,
        reviewer_id: Option<EmployeeId>,
        reviewee_id: Option<EmployeeId>,
    ) -> bool {
        self.contains_opt(reviewer_id) || self.contains_opt(reviewee_id)
    }

    /// Explicit member ids, or `None` when unrestricted.
    pub fn member_ids(&self) -> Option<&BTreeSet<EmployeeId>> {
        match self {
            AccessScope::Unrestricted => None,
            AccessScope::Members(ids) => Some(ids),
        }
    }

    pub fn retain<T>(&self, items: Vec<T>, owner: impl Fn(&T) -> Option<EmployeeId>) -> Vec<T> {
        if self.is_unrestricted() {
            return items;
        }
        items
            .into_iter()
            .filter(|item| self.contains_opt(owner(item)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restricted_scope_ignores_null_references() {
        let scope = AccessScope::members([1, 2]);
        assert!(scope.contains_opt(Some(1)));
        assert!(!scope.contains_opt(None));
        assert!(!scope.admits_review(None, None));
        assert!(scope.admits_review(None, Some(2)));
        assert!(scope.admits_review(Some(1), Some(9)));
        assert!(!scope.admits_review(Some(7), Some(9)));
    }

    #[test]
    fn unrestricted_scope_admits_everything() {
        let scope = AccessScope::Unrestricted;
        assert!(scope.contains(42));
        assert!(scope.admits_review(None, None));
        assert!(scope.member_ids().is_none());
        assert!(!scope.is_empty());
    }

    #[test]
    fn retain_filters_by_owner() {
        let scope = AccessScope::members([3]);
        let goals = vec![(10, Some(3)), (11, Some(4)), (12, None)];
        let kept = scope.retain(goals, |(_, owner)| *owner);
        assert_eq!(kept, vec![(10, Some(3))]);
        assert!(AccessScope::none().is_empty());
    }
}
