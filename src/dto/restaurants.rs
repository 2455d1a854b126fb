use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{MenuItem, Restaurant, User};

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateRestaurantRequest {
    #[validate(length(min = 1, message = "The name field is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "The description field is required."))]
    pub description: String,
    #[validate(length(min = 1, message = "The address field is required."))]
    pub address: String,
    #[validate(length(min = 1, message = "The phone field is required."))]
    pub phone: String,
    #[validate(length(min = 1, message = "The image field is required."))]
    pub image: String,
    #[validate(length(min = 1, message = "The cuisine field is required."))]
    pub cuisine: String,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateRestaurantRequest {
    #[validate(length(min = 1, message = "The name must not be empty."))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub cuisine: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantWithOwner {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    #[serde(default)]
    pub owner: Option<User>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantDetail {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    #[serde(default)]
    pub owner: Option<User>,
    pub menu_items: Vec<MenuItem>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantList {
    pub items: Vec<RestaurantWithOwner>,
}
