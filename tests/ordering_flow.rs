use food_marketplace::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        menu_items::{CreateMenuItemRequest, UpdateMenuItemRequest},
        orders::{CreateOrderRequest, OrderLineRequest, UpdateOrderStatusRequest},
        restaurants::CreateRestaurantRequest,
    },
    entity::users::ActiveModel as UserActive,
    error::AppError,
    middleware::auth::AuthUser,
    models::{OrderStatus, UserRole},
    routes::params::{OrderListQuery, RestaurantListQuery},
    services::{
        auth_service, menu_item_service, order_service, restaurant_service,
        statistics_service, token_service, user_service,
    },
    state::AppState,
};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

const SECRET: &str = "flow-test-secret";

// Whole marketplace round trip: accounts, approval, catalog, ordering, statistics, logout.
#[tokio::test]
async fn marketplace_flow() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // Customer registration returns a token and an active account.
    let customer = auth_service::register_user(
        &state,
        register("sam@example.com", "Sam", UserRole::Customer),
    )
    .await?
    .data
    .unwrap();
    assert!(customer.user.is_active);
    let customer_token = customer.token.expect("customer token");

    // Duplicate email leaves storage untouched.
    let before = user_count(&state).await?;
    let duplicate = auth_service::register_user(
        &state,
        register("sam@example.com", "Sam Again", UserRole::Customer),
    )
    .await;
    match duplicate {
        Err(AppError::Validation(errors)) => {
            assert_eq!(errors["email"], vec!["The email has already been taken."]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(user_count(&state).await?, before);

    // Restaurant registration waits for approval.
    let owner_resp = auth_service::register_user(
        &state,
        register("giulia@example.com", "Giulia", UserRole::Restaurant),
    )
    .await?;
    assert_eq!(owner_resp.message, "Restaurant account pending approval");
    let owner = owner_resp.data.unwrap();
    assert!(owner.token.is_none());
    assert!(!owner.user.is_active);

    let inactive = auth_service::login_user(&state, login("giulia@example.com", "secret1")).await;
    assert!(matches!(inactive, Err(AppError::AccountInactive)));

    // No admin row yet: the shortcut has nobody to sign in as.
    let no_admin = auth_service::login_user(&state, login("admin", "admin")).await;
    assert!(matches!(no_admin, Err(AppError::Validation(ref e)) if e.contains_key("email")));

    // Admin shortcut ignores the stored password.
    let admin_id = insert_admin(&state).await?;
    let admin_login = auth_service::login_user(&state, login("admin", "admin"))
        .await?
        .data
        .unwrap();
    assert_eq!(admin_login.user.id, admin_id);
    assert_eq!(admin_login.token_type, "Bearer");

    let wrong = auth_service::login_user(&state, login("sam@example.com", "wrong-password")).await;
    assert!(matches!(wrong, Err(AppError::Validation(ref e)) if e.contains_key("email")));

    // Approve the owner.
    let approved = user_service::toggle_user_active(&state, owner.user.id)
        .await?
        .data
        .unwrap();
    assert!(approved.is_active);
    auth_service::login_user(&state, login("giulia@example.com", "secret1")).await?;

    let owner_auth = auth_user(owner.user.id, UserRole::Restaurant);
    let customer_auth = auth_user(customer.user.id, UserRole::Customer);

    // Restaurants go live on creation; toggling twice restores the flag.
    let restaurant = restaurant_service::create_restaurant(
        &state,
        &owner_auth,
        CreateRestaurantRequest {
            name: "Ferris Trattoria".into(),
            description: "Pizza".into(),
            address: "1 Crab Street".into(),
            phone: "+1 555 0100".into(),
            image: "trattoria.jpg".into(),
            cuisine: "Italian".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(restaurant.is_active);
    assert_eq!(restaurant.owner_id, owner.user.id);

    restaurant_service::toggle_restaurant_active(&state, restaurant.id).await?;
    let hidden = restaurant_service::list_restaurants(&state, RestaurantListQuery::default())
        .await?
        .data
        .unwrap();
    assert!(hidden.items.iter().all(|r| r.restaurant.id != restaurant.id));

    let restored = restaurant_service::toggle_restaurant_active(&state, restaurant.id)
        .await?
        .data
        .unwrap();
    assert!(restored.is_active);

    let italian = restaurant_service::list_restaurants(
        &state,
        RestaurantListQuery {
            include_inactive: None,
            cuisine: Some("italian".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(italian.items.len(), 1);
    assert_eq!(
        italian.items[0].owner.as_ref().map(|o| o.id),
        Some(owner.user.id)
    );

    let wildcard = restaurant_service::list_restaurants(
        &state,
        RestaurantListQuery {
            include_inactive: None,
            cuisine: Some("%".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(wildcard.items.is_empty());

    // Menu item at 9.99.
    let pizza = menu_item_service::create_menu_item(
        &state,
        CreateMenuItemRequest {
            restaurant_id: restaurant.id,
            name: "Margherita".into(),
            description: "Tomato, mozzarella".into(),
            price: Decimal::new(999, 2),
            image: "pizza.jpg".into(),
            category: "Pizza".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(pizza.is_available);

    // Unknown menu item: nothing is written.
    let rejected = order_service::create_order(
        &state,
        &customer_auth,
        CreateOrderRequest {
            restaurant_id: restaurant.id,
            items: vec![
                OrderLineRequest {
                    menu_item_id: pizza.id,
                    quantity: 1,
                },
                OrderLineRequest {
                    menu_item_id: Uuid::new_v4(),
                    quantity: 1,
                },
            ],
        },
    )
    .await;
    assert!(matches!(rejected, Err(AppError::Validation(ref e)) if e.contains_key("items.1.menu_item_id")));
    assert_eq!(order_count(&state).await?, 0);

    // 9.99 x 3 = 29.97, priced on the server.
    let order = order_service::create_order(
        &state,
        &customer_auth,
        CreateOrderRequest {
            restaurant_id: restaurant.id,
            items: vec![OrderLineRequest {
                menu_item_id: pizza.id,
                quantity: 3,
            }],
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(order.order.total_amount, Decimal::new(2997, 2));
    assert_eq!(order.order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].price, Decimal::new(999, 2));

    // A later price change leaves the order untouched.
    menu_item_service::update_menu_item(
        &state,
        pizza.id,
        UpdateMenuItemRequest {
            price: Some(Decimal::new(1250, 2)),
            ..Default::default()
        },
    )
    .await?;

    let history = order_service::list_orders_by_customer(
        &state,
        customer.user.id,
        OrderListQuery::default(),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(history.items.len(), 1);
    assert_eq!(history.items[0].order.total_amount, Decimal::new(2997, 2));
    assert_eq!(history.items[0].items[0].price, Decimal::new(999, 2));
    assert!(history.items[0].restaurant.is_some());

    // Any status can follow any other.
    let delivered = order_service::update_order_status(
        &state,
        &owner_auth,
        order.order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Delivered,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);

    let back_to_pending = order_service::update_order_status(
        &state,
        &owner_auth,
        order.order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Pending,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(back_to_pending.status, OrderStatus::Pending);

    let pending = order_service::list_orders_by_restaurant(
        &state,
        restaurant.id,
        OrderListQuery {
            status: Some(OrderStatus::Pending),
            sort_order: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(pending.items.len(), 1);
    assert_eq!(
        pending.items[0].customer.as_ref().map(|c| c.id),
        Some(customer.user.id)
    );

    let stats = statistics_service::restaurant_statistics(&state, restaurant.id)
        .await?
        .data
        .unwrap();
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.total_revenue, Decimal::new(2997, 2));
    assert_eq!(stats.total_customers, 1);
    assert_eq!(stats.average_order_value, Decimal::new(2997, 2));

    // Deleting a menu item keeps the order line.
    menu_item_service::delete_menu_item(&state, pizza.id).await?;
    assert!(matches!(
        menu_item_service::delete_menu_item(&state, pizza.id).await,
        Err(AppError::NotFound)
    ));
    let all = order_service::list_orders(&state, OrderListQuery::default())
        .await?
        .data
        .unwrap();
    assert_eq!(all.items[0].items[0].name, "Margherita");

    // Logout revokes only the presented token.
    let claims = token_service::decode_token(SECRET, &customer_token)?;
    let session = AuthUser {
        user_id: customer.user.id,
        role: claims.role,
        jti: claims.jti.clone(),
        expires_at: claims.exp,
    };
    auth_service::logout_user(&state, &session).await?;
    assert!(token_service::is_revoked(&state.pool, &claims.jti).await?);

    let other = auth_service::login_user(&state, login("sam@example.com", "secret1"))
        .await?
        .data
        .unwrap();
    let other_claims = token_service::decode_token(SECRET, &other.token)?;
    assert!(!token_service::is_revoked(&state.pool, &other_claims.jti).await?);

    Ok(())
}

fn register(email: &str, name: &str, role: UserRole) -> RegisterRequest {
    RegisterRequest {
        email: email.into(),
        password: "secret1".into(),
        name: name.into(),
        role,
    }
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: password.into(),
    }
}

fn auth_user(user_id: Uuid, role: UserRole) -> AuthUser {
    AuthUser {
        user_id,
        role,
        jti: Uuid::new_v4().to_string(),
        expires_at: 0,
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: SECRET.into(),
        jwt_ttl_hours: 1,
        cors_origin: None,
    };
    let pool = create_pool(database_url).await?;
    let state = AppState::new(pool, config);
    run_migrations(&state.orm).await?;

    state
        .orm
        .execute(Statement::from_string(
            state.orm.get_database_backend(),
            "TRUNCATE order_items, orders, menu_items, restaurants, revoked_tokens, users CASCADE",
        ))
        .await?;

    Ok(state)
}

async fn insert_admin(state: &AppState) -> anyhow::Result<Uuid> {
    let hash = auth_service::hash_password("not-admin")?;
    let admin = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set("Admin".into()),
        email: Set("admin".into()),
        password_hash: Set(hash),
        role: Set(UserRole::Admin),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(admin.id)
}

async fn user_count(state: &AppState) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&state.pool)
        .await?;
    Ok(count)
}

async fn order_count(state: &AppState) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(&state.pool)
        .await?;
    Ok(count)
}
