use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{User, UserRole};

#[derive(Deserialize, Serialize, Debug, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
    #[validate(length(min = 6, message = "The password must be at least 6 characters."))]
    pub password: String,
    #[validate(length(min = 1, message = "The name field is required."))]
    pub name: String,
    pub role: UserRole,
}

/// `email` is not format-checked here: the admin shortcut logs in with the bare word "admin".
#[derive(Deserialize, Serialize, Debug, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "The email field is required."))]
    pub email: String,
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
    pub token_type: String,
}

/// Restaurant owners get `token: null` until an admin activates them.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user: User,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub jti: String,
    pub iat: usize,
    pub exp: usize,
}
