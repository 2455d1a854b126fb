use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MonthlySales {
    /// `YYYY-MM`
    pub month: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantPerformance {
    pub restaurant_id: Uuid,
    pub name: String,
    pub orders: i64,
    pub revenue: Decimal,
    pub customers: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminStatistics {
    pub total_restaurants: i64,
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub top_restaurants: Vec<RestaurantPerformance>,
    pub monthly_sales: Vec<MonthlySales>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantStatistics {
    pub restaurant_id: Uuid,
    pub total_orders: i64,
    pub total_revenue: Decimal,
    pub total_customers: i64,
    pub average_order_value: Decimal,
    pub monthly_sales: Vec<MonthlySales>,
}
