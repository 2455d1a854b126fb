use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};

use crate::{
    middleware::auth::{ADMIN, CUSTOMER, RESTAURANT, STAFF, authenticate, require_roles},
    state::AppState,
};

pub mod auth;
pub mod doc;
pub mod health;
pub mod menu_items;
pub mod orders;
pub mod params;
pub mod restaurants;
pub mod statistics;
pub mod users;

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/restaurants", get(restaurants::list_restaurants))
        .route("/restaurants/{id}", get(restaurants::get_restaurant))
        .route("/restaurants/{id}/menu-items", get(menu_items::list_menu_items))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{id}/toggle-active", post(users::toggle_user_active))
        .route(
            "/restaurants/{id}/toggle-active",
            post(restaurants::toggle_restaurant_active),
        )
        .route("/orders", get(orders::list_orders))
        .route("/admin/statistics", get(statistics::admin_statistics))
        .route_layer(from_fn_with_state(ADMIN, require_roles))
}

fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants", post(restaurants::create_restaurant))
        .route("/restaurants/{id}", put(restaurants::update_restaurant))
        .route("/users/{id}/restaurants", get(restaurants::list_restaurants_by_owner))
        .route("/menu-items", post(menu_items::create_menu_item))
        .route(
            "/menu-items/{id}",
            put(menu_items::update_menu_item).delete(menu_items::delete_menu_item),
        )
        .route("/restaurants/{id}/orders", get(orders::list_orders_by_restaurant))
        .route("/restaurants/{id}/statistics", get(statistics::restaurant_statistics))
        .route_layer(from_fn_with_state(RESTAURANT, require_roles))
}

fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(orders::create_order))
        .route("/users/{id}/orders", get(orders::list_orders_by_customer))
        .route_layer(from_fn_with_state(CUSTOMER, require_roles))
}

fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/orders/{id}/status", post(orders::update_order_status))
        .route_layer(from_fn_with_state(STAFF, require_roles))
}

// Role groups are merged per path; the same path may carry a public GET and a guarded write.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(auth::logout))
        .merge(admin_routes())
        .merge(owner_routes())
        .merge(customer_routes())
        .merge(staff_routes())
        .route_layer(from_fn_with_state(state, authenticate));

    Router::new().merge(public_routes()).merge(protected)
}
