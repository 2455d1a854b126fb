//! Demo data the local store is seeded with.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    dto::orders::OrderDetail,
    models::{MenuItem, Order, OrderItem, OrderStatus, Restaurant, User, UserRole},
};

pub const ADMIN_ID: Uuid = Uuid::from_u128(0x0000_0001);
pub const OWNER_ID: Uuid = Uuid::from_u128(0x0000_0002);
pub const PENDING_OWNER_ID: Uuid = Uuid::from_u128(0x0000_0003);
pub const CUSTOMER_ID: Uuid = Uuid::from_u128(0x0000_0004);

pub const TRATTORIA_ID: Uuid = Uuid::from_u128(0x0001_0001);
pub const SUSHI_ID: Uuid = Uuid::from_u128(0x0001_0002);

pub const MARGHERITA_ID: Uuid = Uuid::from_u128(0x0002_0001);
pub const CARBONARA_ID: Uuid = Uuid::from_u128(0x0002_0002);
pub const SALMON_ROLL_ID: Uuid = Uuid::from_u128(0x0002_0003);

fn seeded_at(days_ago: i64) -> DateTime<Utc> {
    let base = DateTime::<Utc>::from_timestamp(1_717_200_000, 0).unwrap_or_default();
    base - Duration::days(days_ago)
}

fn user(id: Uuid, name: &str, email: &str, role: UserRole, is_active: bool) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        role,
        is_active,
        created_at: seeded_at(90),
        updated_at: seeded_at(90),
    }
}

pub fn users() -> Vec<User> {
    vec![
        user(ADMIN_ID, "Admin", "admin@example.com", UserRole::Admin, true),
        user(OWNER_ID, "Giulia Rossi", "giulia@example.com", UserRole::Restaurant, true),
        user(
            PENDING_OWNER_ID,
            "Kenji Sato",
            "kenji@example.com",
            UserRole::Restaurant,
            false,
        ),
        user(CUSTOMER_ID, "Sam Customer", "sam@example.com", UserRole::Customer, true),
    ]
}

pub fn admin() -> User {
    user(ADMIN_ID, "Admin", "admin@example.com", UserRole::Admin, true)
}

fn restaurant(
    id: Uuid,
    owner_id: Uuid,
    name: &str,
    description: &str,
    address: &str,
    cuisine: &str,
    is_active: bool,
) -> Restaurant {
    Restaurant {
        id,
        owner_id,
        name: name.to_string(),
        description: description.to_string(),
        address: address.to_string(),
        phone: "+1 555 0100".to_string(),
        image: "https://images.example.com/restaurant.jpg".to_string(),
        cuisine: cuisine.to_string(),
        is_active,
        created_at: seeded_at(60),
        updated_at: seeded_at(60),
    }
}

pub fn restaurants() -> Vec<Restaurant> {
    vec![
        restaurant(
            TRATTORIA_ID,
            OWNER_ID,
            "Ferris Trattoria",
            "Wood-fired pizza and fresh pasta",
            "1 Crab Street",
            "Italian",
            true,
        ),
        restaurant(
            SUSHI_ID,
            PENDING_OWNER_ID,
            "Borrow Sushi Bar",
            "Nigiri and hand rolls",
            "8 Lifetime Lane",
            "Japanese",
            false,
        ),
    ]
}

fn menu_item(
    id: Uuid,
    restaurant_id: Uuid,
    name: &str,
    description: &str,
    price: Decimal,
    category: &str,
) -> MenuItem {
    MenuItem {
        id,
        restaurant_id,
        name: name.to_string(),
        description: description.to_string(),
        price,
        image: "https://images.example.com/dish.jpg".to_string(),
        category: category.to_string(),
        is_available: true,
        created_at: seeded_at(30),
        updated_at: seeded_at(30),
    }
}

pub fn menu_items() -> Vec<MenuItem> {
    vec![
        menu_item(
            MARGHERITA_ID,
            TRATTORIA_ID,
            "Margherita",
            "Tomato, mozzarella, basil",
            Decimal::new(999, 2),
            "Pizza",
        ),
        menu_item(
            CARBONARA_ID,
            TRATTORIA_ID,
            "Carbonara",
            "Guanciale, egg, pecorino",
            Decimal::new(1180, 2),
            "Pasta",
        ),
        menu_item(
            SALMON_ROLL_ID,
            SUSHI_ID,
            "Salmon roll",
            "Salmon, rice, nori",
            Decimal::new(850, 2),
            "Rolls",
        ),
    ]
}

pub fn orders() -> Vec<OrderDetail> {
    let order_id = Uuid::from_u128(0x0003_0001);
    let created_at = seeded_at(2);
    let items = vec![OrderItem {
        id: Uuid::from_u128(0x0004_0001),
        order_id,
        menu_item_id: MARGHERITA_ID,
        name: "Margherita".to_string(),
        price: Decimal::new(999, 2),
        quantity: 2,
        created_at,
    }];

    vec![OrderDetail {
        order: Order {
            id: order_id,
            customer_id: CUSTOMER_ID,
            restaurant_id: TRATTORIA_ID,
            status: OrderStatus::Delivered,
            total_amount: Decimal::new(1998, 2),
            created_at,
            updated_at: created_at,
        },
        items,
        restaurant: None,
        customer: None,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_contains_exactly_one_admin() {
        let admins: Vec<_> = users().into_iter().filter(|u| u.role == UserRole::Admin).collect();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0], admin());
    }

    #[test]
    fn seeded_order_total_matches_lines() {
        for detail in orders() {
            let sum: Decimal = detail
                .items
                .iter()
                .map(|i| i.price * Decimal::from(i.quantity))
                .sum();
            assert_eq!(sum, detail.order.total_amount);
        }
    }
}
