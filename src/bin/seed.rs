use food_marketplace::{
    config::AppConfig,
    db::create_pool,
    models::UserRole,
    services::auth_service::hash_password,
};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,food_marketplace=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // "admin" is not an email address; only the login shortcut accepts it.
    let admin_id = ensure_user(&pool, "Admin", "admin", "admin", UserRole::Admin).await?;
    let owner_id = ensure_user(
        &pool,
        "Demo Owner",
        "owner@example.com",
        "owner123",
        UserRole::Restaurant,
    )
    .await?;
    let customer_id = ensure_user(
        &pool,
        "Demo Customer",
        "customer@example.com",
        "customer123",
        UserRole::Customer,
    )
    .await?;
    let restaurant_id = ensure_restaurant(&pool, owner_id).await?;
    seed_menu(&pool, restaurant_id).await?;

    tracing::info!(%admin_id, %owner_id, %customer_id, %restaurant_id, "seed completed");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    // Seeded accounts are active regardless of role.
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, role, is_active)
        VALUES ($1, $2, $3, $4, $5, TRUE)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role, is_active = TRUE
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    tracing::info!(email, role = %role, "ensured user");
    Ok(id)
}

async fn ensure_restaurant(pool: &sqlx::PgPool, owner_id: Uuid) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM restaurants WHERE owner_id = $1 AND name = $2")
            .bind(owner_id)
            .bind("Ferris Trattoria")
            .fetch_optional(pool)
            .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO restaurants (id, owner_id, name, description, address, phone, image, cuisine, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind("Ferris Trattoria")
    .bind("Wood-fired pizza and fresh pasta")
    .bind("1 Crab Street")
    .bind("+1 555 0100")
    .bind("https://images.example.com/trattoria.jpg")
    .bind("Italian")
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn seed_menu(pool: &sqlx::PgPool, restaurant_id: Uuid) -> anyhow::Result<()> {
    let items = [
        ("Margherita", "Tomato, mozzarella, basil", Decimal::new(999, 2), "Pizza"),
        ("Diavola", "Spicy salami, chili oil", Decimal::new(1250, 2), "Pizza"),
        ("Carbonara", "Guanciale, egg, pecorino", Decimal::new(1180, 2), "Pasta"),
        ("Tiramisu", "Mascarpone and espresso", Decimal::new(650, 2), "Dessert"),
    ];

    for (name, description, price, category) in items {
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, restaurant_id, name, description, price, image, category)
            SELECT $1, $2, $3, $4, $5, $6, $7
            WHERE NOT EXISTS (
                SELECT 1 FROM menu_items WHERE restaurant_id = $2 AND name = $3
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(restaurant_id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind("https://images.example.com/menu.jpg")
        .bind(category)
        .execute(pool)
        .await?;
    }

    tracing::info!(%restaurant_id, "seeded menu");
    Ok(())
}
