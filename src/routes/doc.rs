use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
        menu_items::{CreateMenuItemRequest, MenuItemList, UpdateMenuItemRequest},
        orders::{
            CreateOrderRequest, OrderDetail, OrderLineRequest, OrderList, UpdateOrderStatusRequest,
        },
        restaurants::{
            CreateRestaurantRequest, RestaurantDetail, RestaurantList, RestaurantWithOwner,
            UpdateRestaurantRequest,
        },
        statistics::{AdminStatistics, MonthlySales, RestaurantPerformance, RestaurantStatistics},
        users::UserList,
    },
    error::ErrorData,
    models::{MenuItem, Order, OrderItem, OrderStatus, Restaurant, User, UserRole},
    response::{ApiResponse, Meta},
    routes::{auth, health, menu_items, orders, params, restaurants, statistics, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        users::list_users,
        users::toggle_user_active,
        restaurants::list_restaurants,
        restaurants::get_restaurant,
        restaurants::create_restaurant,
        restaurants::update_restaurant,
        restaurants::toggle_restaurant_active,
        restaurants::list_restaurants_by_owner,
        menu_items::list_menu_items,
        menu_items::create_menu_item,
        menu_items::update_menu_item,
        menu_items::delete_menu_item,
        orders::list_orders,
        orders::create_order,
        orders::update_order_status,
        orders::list_orders_by_restaurant,
        orders::list_orders_by_customer,
        statistics::admin_statistics,
        statistics::restaurant_statistics
    ),
    components(
        schemas(
            User,
            UserRole,
            Restaurant,
            MenuItem,
            Order,
            OrderStatus,
            OrderItem,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            UserList,
            CreateRestaurantRequest,
            UpdateRestaurantRequest,
            RestaurantWithOwner,
            RestaurantDetail,
            RestaurantList,
            CreateMenuItemRequest,
            UpdateMenuItemRequest,
            MenuItemList,
            CreateOrderRequest,
            OrderLineRequest,
            UpdateOrderStatusRequest,
            OrderDetail,
            OrderList,
            MonthlySales,
            RestaurantPerformance,
            AdminStatistics,
            RestaurantStatistics,
            params::SortOrder,
            params::RestaurantListQuery,
            params::OrderListQuery,
            ErrorData,
            Meta,
            ApiResponse<User>,
            ApiResponse<Restaurant>,
            ApiResponse<RestaurantList>,
            ApiResponse<MenuItem>,
            ApiResponse<OrderDetail>,
            ApiResponse<OrderList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and logout"),
        (name = "Users", description = "Account administration"),
        (name = "Restaurants", description = "Restaurant listings"),
        (name = "Menu", description = "Menu item endpoints"),
        (name = "Orders", description = "Order placement and tracking"),
        (name = "Statistics", description = "Sales figures"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
