use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, LoaderTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderDetail, OrderLineRequest, OrderList, UpdateOrderStatusRequest},
    entity::{
        menu_items::{Column as MenuCol, Entity as MenuItems, Model as MenuItemModel},
        order_items::{ActiveModel as OrderItemActive, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        restaurants::Entity as Restaurants,
        users::Entity as Users,
    },
    error::{AppError, AppResult, FieldErrors},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, OrderStatus, Restaurant, fits_money_column},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

/// One order line priced from the current menu.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub menu_item_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// Prices each requested line from `menu`, ignoring anything the client claims.
/// Errors are keyed like `items.2.quantity` so clients can point at the bad line.
pub fn price_lines(
    lines: &[OrderLineRequest],
    menu: &HashMap<Uuid, MenuItemModel>,
) -> Result<(Vec<PricedLine>, Decimal), FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut priced = Vec::with_capacity(lines.len());
    let mut total = Decimal::ZERO;

    for (idx, line) in lines.iter().enumerate() {
        if line.quantity < 1 {
            errors
                .entry(format!("items.{idx}.quantity"))
                .or_default()
                .push("The quantity must be at least 1.".to_string());
        }
        let Some(item) = menu.get(&line.menu_item_id) else {
            errors
                .entry(format!("items.{idx}.menu_item_id"))
                .or_default()
                .push("The selected menu item is invalid.".to_string());
            continue;
        };

        let line_total = item.price.checked_mul(Decimal::from(line.quantity));
        let running = line_total.and_then(|t| total.checked_add(t));
        match running.filter(|t| fits_money_column(*t)) {
            Some(t) => total = t,
            None => {
                errors
                    .entry(format!("items.{idx}.quantity"))
                    .or_default()
                    .push("The quantity is too large.".to_string());
                continue;
            }
        }

        priced.push(PricedLine {
            menu_item_id: item.id,
            name: item.name.clone(),
            price: item.price,
            quantity: line.quantity,
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok((priced, total))
}

/// Order and lines are written in one transaction; a failed line leaves nothing behind.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderDetail>> {
    let txn = state.orm.begin().await?;

    let restaurant = Restaurants::find_by_id(payload.restaurant_id)
        .one(&txn)
        .await?;
    let restaurant = match restaurant {
        Some(r) => r,
        None => {
            return Err(AppError::field(
                "restaurant_id",
                "The selected restaurant id is invalid.",
            ));
        }
    };

    let ids: Vec<Uuid> = payload.items.iter().map(|l| l.menu_item_id).collect();
    let menu: HashMap<Uuid, MenuItemModel> = MenuItems::find()
        .filter(MenuCol::Id.is_in(ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let (lines, total_amount) =
        price_lines(&payload.items, &menu).map_err(AppError::Validation)?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(user.user_id),
        restaurant_id: Set(restaurant.id),
        status: Set(OrderStatus::Pending),
        total_amount: Set(total_amount),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(lines.len());
    for line in lines {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            menu_item_id: Set(line.menu_item_id),
            name: Set(line.name),
            price: Set(line.price),
            quantity: Set(line.quantity),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(item.into());
    }

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        customer_id = %user.user_id,
        total = %order.total_amount,
        "order placed"
    );

    Ok(ApiResponse::success(
        "Order created",
        OrderDetail {
            order: order.into(),
            items,
            restaurant: Some(restaurant.into()),
            customer: None,
        },
        Some(Meta::empty()),
    ))
}

/// Sets any status from any status. Concurrent updates are last-write-wins.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };
    let previous = existing.status;

    let mut active: OrderActive = existing.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    tracing::info!(
        order_id = %order.id,
        by = %user.user_id,
        from = %previous,
        to = %order.status,
        "order status updated"
    );

    Ok(ApiResponse::success(
        "Order updated",
        Order::from(order),
        Some(Meta::empty()),
    ))
}

/// Which related row to attach to each listed order.
#[derive(Debug, Clone, Copy)]
enum Attach {
    Restaurant,
    Customer,
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let items = load_orders(&state.orm, Condition::all(), query, Attach::Restaurant).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn list_orders_by_restaurant(
    state: &AppState,
    restaurant_id: Uuid,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let condition = Condition::all().add(OrderCol::RestaurantId.eq(restaurant_id));
    let items = load_orders(&state.orm, condition, query, Attach::Customer).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

/// Lists by the customer id in the path; the caller's identity is not cross-checked.
pub async fn list_orders_by_customer(
    state: &AppState,
    customer_id: Uuid,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let condition = Condition::all().add(OrderCol::CustomerId.eq(customer_id));
    let items = load_orders(&state.orm, condition, query, Attach::Restaurant).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

async fn load_orders(
    db: &DatabaseConnection,
    mut condition: Condition,
    query: OrderListQuery,
    attach: Attach,
) -> AppResult<Vec<OrderDetail>> {
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let orders = finder.all(db).await?;
    let items = orders.load_many(OrderItems, db).await?;

    let details = match attach {
        Attach::Restaurant => {
            let restaurants = orders.load_one(Restaurants, db).await?;
            orders
                .into_iter()
                .zip(items)
                .zip(restaurants)
                .map(|((order, items), restaurant)| OrderDetail {
                    order: order.into(),
                    items: items.into_iter().map(OrderItem::from).collect(),
                    restaurant: restaurant.map(Restaurant::from),
                    customer: None,
                })
                .collect()
        }
        Attach::Customer => {
            let customers = orders.load_one(Users, db).await?;
            orders
                .into_iter()
                .zip(items)
                .zip(customers)
                .map(|((order, items), customer)| OrderDetail {
                    order: order.into(),
                    items: items.into_iter().map(OrderItem::from).collect(),
                    restaurant: None,
                    customer: customer.map(Into::into),
                })
                .collect()
        }
    };

    Ok(details)
}
