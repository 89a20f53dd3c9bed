//! Authorization core for the HR suite.
//!
//! Access follows the organizational hierarchy: employees see themselves,
//! managers see themselves and their direct reports, HR admins see everyone.
//! The hierarchy is one level deep; reports of reports are not reachable
//! through their grand-manager.
//!
//! [`AccessEngine`] reads employees, users and reviews through the
//! collaborator traits in [`directory`] and never fails: any identity it
//! cannot resolve gets no access.

pub mod directory;
pub mod engine;
pub mod memory;
pub mod permissions;
pub mod role;
pub mod scope;

pub use directory::{
    DirectoryError, EmployeeDirectory, EmployeeId, EmployeeRecord, ReviewId, ReviewLedger,
    ReviewParticipants, UserId, UserRecord, UserStore,
};
pub use engine::{AccessEngine, Principal, PrincipalAccess};
pub use memory::InMemoryDirectory;
pub use permissions::{Action, Resource, allowed_roles};
pub use role::{Role, UnknownRole};
pub use scope::AccessScope;
