pub mod auth;
pub mod menu_items;
pub mod orders;
pub mod restaurants;
pub mod statistics;
pub mod users;
