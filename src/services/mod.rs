pub mod auth_service;
pub mod menu_item_service;
pub mod order_service;
pub mod restaurant_service;
pub mod statistics_service;
pub mod token_service;
pub mod user_service;
