use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    dto::menu_items::{CreateMenuItemRequest, MenuItemList, UpdateMenuItemRequest},
    entity::{
        menu_items::{ActiveModel as MenuItemActive, Column as MenuCol, Entity as MenuItems},
        restaurants::Entity as Restaurants,
    },
    error::{AppError, AppResult},
    models::MenuItem,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Prices are stored with two decimals; round before writing so the response matches the row.
fn storage_price(price: rust_decimal::Decimal) -> rust_decimal::Decimal {
    price.round_dp(2)
}

/// Every item of the restaurant, available or not. An unknown restaurant yields an empty list.
pub async fn list_menu_items(
    state: &AppState,
    restaurant_id: Uuid,
) -> AppResult<ApiResponse<MenuItemList>> {
    let items: Vec<MenuItem> = MenuItems::find()
        .filter(MenuCol::RestaurantId.eq(restaurant_id))
        .order_by_asc(MenuCol::Category)
        .order_by_asc(MenuCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(MenuItem::from)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Menu items", MenuItemList { items }, Some(meta)))
}

pub async fn create_menu_item(
    state: &AppState,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let restaurant = Restaurants::find_by_id(payload.restaurant_id)
        .one(&state.orm)
        .await?;
    if restaurant.is_none() {
        return Err(AppError::field(
            "restaurant_id",
            "The selected restaurant id is invalid.",
        ));
    }

    let item = MenuItemActive {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(payload.restaurant_id),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(storage_price(payload.price)),
        image: Set(payload.image),
        category: Set(payload.category),
        is_available: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(menu_item_id = %item.id, restaurant_id = %item.restaurant_id, "menu item created");

    Ok(ApiResponse::success(
        "Menu item created",
        MenuItem::from(item),
        Some(Meta::empty()),
    ))
}

/// Past orders keep their own copy of name and price, so edits here never rewrite history.
pub async fn update_menu_item(
    state: &AppState,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItem>> {
    let existing = MenuItems::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(m) => m,
        None => return Err(AppError::NotFound),
    };

    let mut active: MenuItemActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        active.price = Set(storage_price(price));
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    active.updated_at = Set(Utc::now().into());

    let item = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        MenuItem::from(item),
        Some(Meta::empty()),
    ))
}

pub async fn delete_menu_item(state: &AppState, id: Uuid) -> AppResult<()> {
    let result = MenuItems::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(menu_item_id = %id, "menu item deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn prices_are_kept_to_two_decimals() {
        assert_eq!(storage_price(Decimal::new(9_999, 3)), Decimal::new(1_000, 2));
        assert_eq!(storage_price(Decimal::new(999, 2)), Decimal::new(999, 2));
    }
}
