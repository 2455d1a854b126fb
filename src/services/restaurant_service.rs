use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use uuid::Uuid;

use crate::{
    dto::restaurants::{
        CreateRestaurantRequest, RestaurantDetail, RestaurantList, RestaurantWithOwner,
        UpdateRestaurantRequest,
    },
    entity::{
        menu_items::{Column as MenuCol, Entity as MenuItems},
        restaurants::{ActiveModel as RestaurantActive, Column as RestCol, Entity as Restaurants},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{MenuItem, Restaurant},
    response::{ApiResponse, Meta},
    routes::params::RestaurantListQuery,
    state::AppState,
};

/// Makes `value` match literally under LIKE/ILIKE with the default backslash escape.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Active restaurants with their owners; `include_inactive` widens it to every listing.
pub async fn list_restaurants(
    state: &AppState,
    query: RestaurantListQuery,
) -> AppResult<ApiResponse<RestaurantList>> {
    let mut condition = Condition::all();
    if !query.include_inactive.unwrap_or(false) {
        condition = condition.add(RestCol::IsActive.eq(true));
    }
    if let Some(cuisine) = query.cuisine.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(Expr::col(RestCol::Cuisine).ilike(escape_like(cuisine)));
    }

    let items: Vec<RestaurantWithOwner> = Restaurants::find()
        .filter(condition)
        .find_also_related(Users)
        .order_by_desc(RestCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(restaurant, owner)| RestaurantWithOwner {
            restaurant: restaurant.into(),
            owner: owner.map(Into::into),
        })
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Restaurants",
        RestaurantList { items },
        Some(meta),
    ))
}

pub async fn get_restaurant(state: &AppState, id: Uuid) -> AppResult<ApiResponse<RestaurantDetail>> {
    let found = Restaurants::find_by_id(id)
        .find_also_related(Users)
        .one(&state.orm)
        .await?;
    let (restaurant, owner) = match found {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let menu_items = MenuItems::find()
        .filter(MenuCol::RestaurantId.eq(restaurant.id))
        .order_by_asc(MenuCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(MenuItem::from)
        .collect();

    Ok(ApiResponse::success(
        "Restaurant",
        RestaurantDetail {
            restaurant: restaurant.into(),
            owner: owner.map(Into::into),
            menu_items,
        },
        None,
    ))
}

/// New listings go live immediately; only owner accounts wait for approval.
pub async fn create_restaurant(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRestaurantRequest,
) -> AppResult<ApiResponse<Restaurant>> {
    let restaurant = RestaurantActive {
        id: Set(Uuid::new_v4()),
        owner_id: Set(user.user_id),
        name: Set(payload.name),
        description: Set(payload.description),
        address: Set(payload.address),
        phone: Set(payload.phone),
        image: Set(payload.image),
        cuisine: Set(payload.cuisine),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(restaurant_id = %restaurant.id, owner_id = %user.user_id, "restaurant created");

    Ok(ApiResponse::success(
        "Restaurant created",
        Restaurant::from(restaurant),
        Some(Meta::empty()),
    ))
}

pub async fn update_restaurant(
    state: &AppState,
    id: Uuid,
    payload: UpdateRestaurantRequest,
) -> AppResult<ApiResponse<Restaurant>> {
    let existing = Restaurants::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let mut active: RestaurantActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(phone);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(cuisine) = payload.cuisine {
        active.cuisine = Set(cuisine);
    }
    active.updated_at = Set(Utc::now().into());

    let restaurant = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        Restaurant::from(restaurant),
        Some(Meta::empty()),
    ))
}

pub async fn toggle_restaurant_active(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<Restaurant>> {
    let existing = Restaurants::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let is_active = !existing.is_active;
    let mut active: RestaurantActive = existing.into();
    active.is_active = Set(is_active);
    active.updated_at = Set(Utc::now().into());
    let restaurant = active.update(&state.orm).await?;

    tracing::info!(
        restaurant_id = %restaurant.id,
        is_active = restaurant.is_active,
        "restaurant active flag toggled"
    );

    Ok(ApiResponse::success(
        "Restaurant updated",
        Restaurant::from(restaurant),
        Some(Meta::empty()),
    ))
}

/// Lists by the owner id in the path; the caller's identity is not cross-checked.
pub async fn list_restaurants_by_owner(
    state: &AppState,
    owner_id: Uuid,
) -> AppResult<ApiResponse<Vec<Restaurant>>> {
    let items: Vec<Restaurant> = Restaurants::find()
        .filter(RestCol::OwnerId.eq(owner_id))
        .order_by_desc(RestCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Restaurant::from)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Restaurants", items, Some(meta)))
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), r"50\%\_off");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
    }

    #[test]
    fn plain_cuisine_is_unchanged() {
        assert_eq!(escape_like("Italian"), "Italian");
    }
}
