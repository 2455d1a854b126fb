use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{MenuItem, fits_money_column};

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if fits_money_column(*price) {
        return Ok(());
    }
    Err(ValidationError::new("price_range")
        .with_message(Cow::from("The price must be less than 100000000.")))
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateMenuItemRequest {
    pub restaurant_id: Uuid,
    #[validate(length(min = 1, message = "The name field is required."))]
    pub name: String,
    #[validate(length(min = 1, message = "The description field is required."))]
    pub description: String,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(length(min = 1, message = "The image field is required."))]
    pub image: String,
    #[validate(length(min = 1, message = "The category field is required."))]
    pub category: String,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateMenuItemRequest {
    #[validate(length(min = 1, message = "The name must not be empty."))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenuItemList {
    pub items: Vec<MenuItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(price: Decimal) -> CreateMenuItemRequest {
        CreateMenuItemRequest {
            restaurant_id: Uuid::new_v4(),
            name: "Margherita".into(),
            description: "Tomato, mozzarella".into(),
            price,
            image: "pizza.jpg".into(),
            category: "Pizza".into(),
        }
    }

    #[test]
    fn largest_storable_price_is_accepted() {
        assert!(create(Decimal::new(9_999_999_999, 2)).validate().is_ok());
    }

    #[test]
    fn price_beyond_column_range_is_rejected() {
        let errors = create(Decimal::new(100_000_000, 0)).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn update_price_is_bounded_only_when_present() {
        assert!(UpdateMenuItemRequest::default().validate().is_ok());

        let update = UpdateMenuItemRequest {
            price: Some(Decimal::new(-100_000_000, 0)),
            ..Default::default()
        };
        let errors = update.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }
}
