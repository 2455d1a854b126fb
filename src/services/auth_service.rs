use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::{
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{User, UserRole},
    response::{ApiResponse, Meta},
    services::token_service,
    state::AppState,
};

const ADMIN_SHORTCUT: &str = "admin";
const INVALID_CREDENTIALS: &str = "The provided credentials are incorrect.";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// The literal `admin`/`admin` pair that signs in as the first admin account.
pub fn is_admin_shortcut(email: &str, password: &str) -> bool {
    email == ADMIN_SHORTCUT && password == ADMIN_SHORTCUT
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<RegisterResponse>> {
    let RegisterRequest {
        email,
        password,
        name,
        role,
    } = payload;

    if role == UserRole::Admin {
        return Err(AppError::field("role", "The selected role is invalid."));
    }

    let exist = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::field("email", "The email has already been taken."));
    }

    let password_hash = hash_password(&password)?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(role),
        is_active: Set(role.starts_active()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::field("email", "The email has already been taken.")
        }
        _ => AppError::from(err),
    })?;

    tracing::info!(user_id = %user.id, role = %user.role, "user registered");

    if !user.is_active {
        return Ok(ApiResponse::success(
            "Restaurant account pending approval",
            RegisterResponse {
                user: user.into(),
                token: None,
            },
            Some(Meta::empty()),
        ));
    }

    let token = token_service::issue_token(
        &state.config.jwt_secret,
        state.config.jwt_ttl_hours,
        user.id,
        user.role,
    )?;

    Ok(ApiResponse::success(
        "User created",
        RegisterResponse {
            user: user.into(),
            token: Some(token),
        },
        Some(Meta::empty()),
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;

    if is_admin_shortcut(&email, &password) {
        let admin = Users::find()
            .filter(UserCol::Role.eq(UserRole::Admin))
            .order_by_asc(UserCol::CreatedAt)
            .one(&state.orm)
            .await?;
        if let Some(admin) = admin {
            tracing::warn!(user_id = %admin.id, "admin shortcut login");
            return logged_in(state, admin);
        }
    }

    if !email.validate_email() {
        return Err(AppError::field(
            "email",
            "The email must be a valid email address.",
        ));
    }

    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::field("email", INVALID_CREDENTIALS)),
    };

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::field("email", INVALID_CREDENTIALS));
    }

    if !user.is_active {
        tracing::info!(user_id = %user.id, "inactive account tried to log in");
        return Err(AppError::AccountInactive);
    }

    logged_in(state, user)
}

fn logged_in(state: &AppState, user: UserModel) -> AppResult<ApiResponse<LoginResponse>> {
    let token = token_service::issue_token(
        &state.config.jwt_secret,
        state.config.jwt_ttl_hours,
        user.id,
        user.role,
    )?;

    tracing::info!(user_id = %user.id, "user logged in");

    let resp = LoginResponse {
        user: User::from(user),
        token,
        token_type: "Bearer".to_string(),
    };

    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub async fn logout_user(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    token_service::revoke(&state.pool, user).await?;
    tracing::info!(user_id = %user.user_id, "user logged out");

    Ok(ApiResponse::success(
        "Logged out successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies_only_its_password() {
        let hash = hash_password("secret123").unwrap();
        assert!(verify_password("secret123", &hash).unwrap());
        assert!(!verify_password("secret124", &hash).unwrap());
    }

    #[test]
    fn admin_shortcut_is_an_exact_match() {
        assert!(is_admin_shortcut("admin", "admin"));
        assert!(!is_admin_shortcut("admin", "Admin"));
        assert!(!is_admin_shortcut("admin@example.com", "admin"));
    }
}
