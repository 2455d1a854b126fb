use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::UserRole,
    services::token_service,
    state::AppState,
};

pub const ADMIN: &[UserRole] = &[UserRole::Admin];
pub const RESTAURANT: &[UserRole] = &[UserRole::Restaurant];
pub const CUSTOMER: &[UserRole] = &[UserRole::Customer];
pub const STAFF: &[UserRole] = &[UserRole::Restaurant, UserRole::Admin];

/// Caller identity, placed in request extensions by [`authenticate`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: UserRole,
    pub jti: String,
    pub expires_at: usize,
}

pub fn ensure_role(user: &AuthUser, roles: &[UserRole]) -> Result<(), AppError> {
    if !roles.contains(&user.role) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let auth_str = headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;
    Ok(token)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Validates the bearer token, rejects revoked ones and exposes [`AuthUser`] to handlers.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?;
    let claims = token_service::decode_token(&state.config.jwt_secret, token)?;

    if token_service::is_revoked(&state.pool, &claims.jti).await? {
        tracing::debug!(jti = %claims.jti, "revoked token presented");
        return Err(AppError::Unauthorized);
    }

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;
    let user = AuthUser {
        user_id,
        role: claims.role,
        jti: claims.jti,
        expires_at: claims.exp,
    };
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Route-group guard; the state is the list of roles allowed through.
pub async fn require_roles(
    State(roles): State<&'static [UserRole]>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .ok_or(AppError::Unauthorized)?;

    if let Err(err) = ensure_role(user, roles) {
        tracing::warn!(user_id = %user.user_id, role = %user.role, "role not allowed");
        return Err(err);
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user(role: UserRole) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            role,
            jti: "jti".into(),
            expires_at: 0,
        }
    }

    #[test]
    fn staff_group_admits_owners_and_admins_only() {
        assert!(ensure_role(&user(UserRole::Restaurant), STAFF).is_ok());
        assert!(ensure_role(&user(UserRole::Admin), STAFF).is_ok());
        assert!(matches!(
            ensure_role(&user(UserRole::Customer), STAFF),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");
    }
}
