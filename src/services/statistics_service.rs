use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::statistics::{AdminStatistics, MonthlySales, RestaurantPerformance, RestaurantStatistics},
    entity::restaurants::Entity as Restaurants,
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

const TOP_RESTAURANTS: i64 = 5;

#[derive(FromRow)]
struct OrderTotalsRow {
    total_orders: i64,
    billable_orders: i64,
    total_revenue: Decimal,
    total_customers: i64,
}

#[derive(FromRow)]
struct PerformanceRow {
    restaurant_id: Uuid,
    name: String,
    orders: i64,
    revenue: Decimal,
    customers: i64,
}

#[derive(FromRow)]
struct MonthlyRow {
    month: String,
    amount: Decimal,
}

pub fn average_order_value(revenue: Decimal, billable_orders: i64) -> Decimal {
    if billable_orders <= 0 {
        return Decimal::ZERO;
    }
    (revenue / Decimal::from(billable_orders)).round_dp(2)
}

/// Revenue per month over the trailing twelve months, cancelled orders excluded.
async fn monthly_sales(pool: &DbPool, restaurant_id: Option<Uuid>) -> AppResult<Vec<MonthlySales>> {
    let rows = sqlx::query_as::<_, MonthlyRow>(
        r#"
        SELECT to_char(date_trunc('month', created_at), 'YYYY-MM') AS month,
               COALESCE(SUM(total_amount), 0) AS amount
        FROM orders
        WHERE status <> 'cancelled'
          AND created_at >= date_trunc('month', now()) - interval '11 months'
          AND ($1::uuid IS NULL OR restaurant_id = $1)
        GROUP BY 1
        ORDER BY 1
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| MonthlySales {
            month: row.month,
            amount: row.amount,
        })
        .collect())
}

async fn order_totals(pool: &DbPool, restaurant_id: Option<Uuid>) -> AppResult<OrderTotalsRow> {
    let row = sqlx::query_as::<_, OrderTotalsRow>(
        r#"
        SELECT COUNT(*) AS total_orders,
               COUNT(*) FILTER (WHERE status <> 'cancelled') AS billable_orders,
               COALESCE(SUM(total_amount) FILTER (WHERE status <> 'cancelled'), 0) AS total_revenue,
               COUNT(DISTINCT customer_id) AS total_customers
        FROM orders
        WHERE ($1::uuid IS NULL OR restaurant_id = $1)
        "#,
    )
    .bind(restaurant_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn admin_statistics(state: &AppState) -> AppResult<ApiResponse<AdminStatistics>> {
    let active: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM restaurants WHERE is_active = TRUE")
        .fetch_one(&state.pool)
        .await?;

    let totals = order_totals(&state.pool, None).await?;

    let top = sqlx::query_as::<_, PerformanceRow>(
        r#"
        SELECT r.id AS restaurant_id, r.name,
               COUNT(o.id) AS orders,
               COALESCE(SUM(o.total_amount) FILTER (WHERE o.status <> 'cancelled'), 0) AS revenue,
               COUNT(DISTINCT o.customer_id) AS customers
        FROM restaurants r
        JOIN orders o ON o.restaurant_id = r.id
        GROUP BY r.id, r.name
        ORDER BY revenue DESC, orders DESC
        LIMIT $1
        "#,
    )
    .bind(TOP_RESTAURANTS)
    .fetch_all(&state.pool)
    .await?;

    let data = AdminStatistics {
        total_restaurants: active.0,
        total_orders: totals.total_orders,
        total_revenue: totals.total_revenue,
        top_restaurants: top
            .into_iter()
            .map(|row| RestaurantPerformance {
                restaurant_id: row.restaurant_id,
                name: row.name,
                orders: row.orders,
                revenue: row.revenue,
                customers: row.customers,
            })
            .collect(),
        monthly_sales: monthly_sales(&state.pool, None).await?,
    };

    Ok(ApiResponse::success("Statistics", data, Some(Meta::empty())))
}

pub async fn restaurant_statistics(
    state: &AppState,
    restaurant_id: Uuid,
) -> AppResult<ApiResponse<RestaurantStatistics>> {
    let restaurant = Restaurants::find_by_id(restaurant_id)
        .one(&state.orm)
        .await?;
    if restaurant.is_none() {
        return Err(AppError::NotFound);
    }

    let totals = order_totals(&state.pool, Some(restaurant_id)).await?;

    let data = RestaurantStatistics {
        restaurant_id,
        total_orders: totals.total_orders,
        total_revenue: totals.total_revenue,
        total_customers: totals.total_customers,
        average_order_value: average_order_value(totals.total_revenue, totals.billable_orders),
        monthly_sales: monthly_sales(&state.pool, Some(restaurant_id)).await?,
    };

    Ok(ApiResponse::success("Statistics", data, Some(Meta::empty())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_is_zero_without_orders() {
        assert_eq!(average_order_value(Decimal::new(1000, 2), 0), Decimal::ZERO);
    }

    #[test]
    fn average_is_rounded_to_cents() {
        // 10.00 / 3
        assert_eq!(
            average_order_value(Decimal::new(1000, 2), 3),
            Decimal::new(333, 2)
        );
    }
}
