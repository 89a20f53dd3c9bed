use entity::{employees, users};
use platform_api::{ApiError, ApiResult, ensure, internal_error};
use platform_authn::{AuthConfig, hash_password, issue_token, verify_password};
use platform_authz::{EmployeeId, Principal, Role};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{HrModule, db_error, require_text};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub employee_id: EmployeeId,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub employee_id: EmployeeId,
    pub employee: Option<employees::Model>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

impl HrModule {
    /// Exchange credentials for a signed session token. Unknown users and
    /// wrong passwords are indistinguishable to the caller.
    #[instrument(name = "hr.auth.login", skip_all, fields(username = %request.username))]
    pub async fn login(
        &self,
        request: LoginRequest,
        auth: &AuthConfig,
    ) -> ApiResult<LoginResponse> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(request.username.as_str()))
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(ApiError::Unauthorized)?;
        if !verify_password(&request.password, &user.password_hash) {
            return Err(ApiError::Unauthorized);
        }
        let Some(role) = Role::parse(&user.role) else {
            warn!(user_id = user.id, role = %user.role, "login with unrecognized role");
            return Err(ApiError::Forbidden);
        };

        let principal = Principal::new(user.id, user.employee_id, role);
        let token = issue_token(&principal, auth).map_err(internal_error)?;
        info!(user_id = user.id, "login succeeded");
        Ok(LoginResponse {
            token,
            user: self.profile_of(user, role).await?,
        })
    }

    #[instrument(name = "hr.auth.register", skip_all, fields(user_id = principal.user_id))]
    pub async fn register(
        &self,
        principal: Principal,
        request: RegisterRequest,
    ) -> ApiResult<UserProfile> {
        ensure(principal.role == Role::HrAdmin)?;
        require_text(&request.username, "username")?;
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::invalid(format!(
                "password needs at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        self.find_employee(request.employee_id)
            .await
            .map_err(|_| ApiError::invalid("employeeId does not exist"))?;
        let taken = users::Entity::find()
            .filter(users::Column::Username.eq(request.username.as_str()))
            .one(&self.db)
            .await
            .map_err(db_error)?;
        if taken.is_some() {
            return Err(ApiError::invalid("username already taken"));
        }

        let password_hash = hash_password(&request.password).map_err(internal_error)?;
        let user = users::ActiveModel {
            username: Set(request.username),
            password_hash: Set(password_hash),
            role: Set(request.role.as_str().to_string()),
            employee_id: Set(request.employee_id),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;
        info!(new_user = user.id, role = %request.role, "user registered");
        self.profile_of(user, request.role).await
    }

    pub async fn profile(&self, principal: Principal) -> ApiResult<UserProfile> {
        let user = users::Entity::find_by_id(principal.user_id)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(ApiError::Unauthorized)?;
        self.profile_of(user, principal.role).await
    }

    async fn profile_of(&self, user: users::Model, role: Role) -> ApiResult<UserProfile> {
        let employee = employees::Entity::find_by_id(user.employee_id)
            .one(&self.db)
            .await
            .map_err(db_error)?;
        Ok(UserProfile {
            id: user.id,
            username: user.username,
            role,
            employee_id: user.employee_id,
            employee,
        })
    }
}

#[cfg(test)]
mod tests {
    use platform_authn::decode_token;

    use crate::{
        seed::DEMO_PASSWORD,
        testing::{EMPLOYEE, HR_ADMIN, MANAGER, seeded},
    };

    use super::*;

    fn auth() -> AuthConfig {
        AuthConfig {
            jwt_secret: vec![7; 32],
            issuer: "hr-tests".into(),
            session_ttl_minutes: 30,
        }
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn login_issues_a_token_for_the_stored_role() {
        let (hr, _) = seeded().await;
        let auth = auth();
        let response = hr.login(login("manager1", DEMO_PASSWORD), &auth).await.unwrap();
        assert_eq!(response.user.role, Role::Manager);
        assert_eq!(
            response.user.employee.as_ref().map(|e| e.first_name.as_str()),
            Some("Bob")
        );
        let claims = decode_token(&response.token, &auth).unwrap();
        assert_eq!(claims.principal(), Some(MANAGER));
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let (hr, _) = seeded().await;
        let auth = auth();
        assert!(matches!(
            hr.login(login("manager1", "wrong-password"), &auth).await,
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            hr.login(login("ghost", DEMO_PASSWORD), &auth).await,
            Err(ApiError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn only_hr_registers_users() {
        let (hr, _) = seeded().await;
        let request = RegisterRequest {
            username: "dan".into(),
            password: "s3cure-pass".into(),
            role: Role::Employee,
            employee_id: 4,
        };
        assert!(matches!(
            hr.register(MANAGER, request.clone()).await,
            Err(ApiError::Forbidden)
        ));
        let profile = hr.register(HR_ADMIN, request.clone()).await.unwrap();
        assert_eq!(profile.employee_id, 4);
        assert!(matches!(
            hr.register(HR_ADMIN, request).await,
            Err(ApiError::InvalidInput(_))
        ));

        let response = hr.login(login("dan", "s3cure-pass"), &auth()).await.unwrap();
        assert_eq!(response.user.role, Role::Employee);
    }

    #[tokio::test]
    async fn profile_reflects_the_principal() {
        let (hr, _) = seeded().await;
        let profile = hr.profile(EMPLOYEE).await.unwrap();
        assert_eq!(profile.username, "employee1");
        assert_eq!(profile.employee.map(|e| e.id), Some(1));
    }
}
