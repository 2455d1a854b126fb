use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::users::UserList,
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_users(state: &AppState) -> AppResult<ApiResponse<UserList>> {
    let items: Vec<User> = Users::find()
        .order_by_desc(UserCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

/// Flips `is_active`. Used both to approve new restaurant owners and to suspend accounts.
pub async fn toggle_user_active(state: &AppState, id: Uuid) -> AppResult<ApiResponse<User>> {
    let existing = Users::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    let is_active = !existing.is_active;
    let mut active: UserActive = existing.into();
    active.is_active = Set(is_active);
    active.updated_at = Set(Utc::now().into());
    let user = active.update(&state.orm).await?;

    tracing::info!(user_id = %user.id, is_active = user.is_active, "user active flag toggled");

    Ok(ApiResponse::success(
        "User updated",
        User::from(user),
        Some(Meta::empty()),
    ))
}
