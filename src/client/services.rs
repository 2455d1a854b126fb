use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
        menu_items::{CreateMenuItemRequest, MenuItemList, UpdateMenuItemRequest},
        orders::{CreateOrderRequest, OrderDetail, OrderList, UpdateOrderStatusRequest},
        restaurants::{CreateRestaurantRequest, RestaurantDetail, RestaurantList, UpdateRestaurantRequest},
        users::UserList,
    },
    models::{MenuItem, Order, OrderItem, OrderStatus, Restaurant, User, UserRole},
};

use super::{
    ClientConfig,
    cart::Cart,
    error::{ClientError, ClientResult},
    http::ApiClient,
    mock,
    store::{LocalStore, keys},
};

const ADMIN_SHORTCUT: &str = "admin";

fn fall_back(operation: &str, err: &ClientError) {
    tracing::warn!(operation, error = %err, "api call failed, using local store");
}

fn stored_users(store: &LocalStore) -> Vec<User> {
    store.collection(keys::USERS, mock::users)
}

fn stored_restaurants(store: &LocalStore) -> Vec<Restaurant> {
    store.collection(keys::RESTAURANTS, mock::restaurants)
}

fn stored_menu_items(store: &LocalStore) -> Vec<MenuItem> {
    store.collection(keys::MENU_ITEMS, mock::menu_items)
}

fn stored_orders(store: &LocalStore) -> Vec<OrderDetail> {
    store.collection(keys::ORDERS, mock::orders)
}

/// Every service, sharing one HTTP client and one store.
#[derive(Debug, Clone)]
pub struct ClientServices {
    pub auth: AuthService,
    pub users: UserService,
    pub restaurants: RestaurantService,
    pub menu_items: MenuItemService,
    pub orders: OrderService,
    store: LocalStore,
}

impl ClientServices {
    pub fn connect(config: &ClientConfig) -> ClientResult<Self> {
        let store = LocalStore::open(&config.store_path);
        let api = ApiClient::new(config, store.clone())?;
        Ok(Self::new(api, store))
    }

    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        Self {
            auth: AuthService::new(api.clone(), store.clone()),
            users: UserService::new(api.clone(), store.clone()),
            restaurants: RestaurantService::new(api.clone(), store.clone()),
            menu_items: MenuItemService::new(api.clone(), store.clone()),
            orders: OrderService::new(api, store.clone()),
            store,
        }
    }

    pub fn cart(&self) -> Cart {
        Cart::load(self.store.clone())
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }
}

#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
    store: LocalStore,
}

impl AuthService {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        Self { api, store }
    }

    /// `admin`/`admin` signs in as the seeded admin without asking the API.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        if email == ADMIN_SHORTCUT && password == ADMIN_SHORTCUT {
            let admin = stored_users(&self.store)
                .into_iter()
                .find(|u| u.role == UserRole::Admin)
                .unwrap_or_else(mock::admin);
            self.store.set(keys::AUTH_USER, &admin);
            return Ok(admin);
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.api.post::<LoginResponse, _>("login", &request).await {
            Ok(resp) => {
                self.store.set(keys::AUTH_USER, &resp.user);
                self.store.set(keys::TOKEN, &resp.token);
                Ok(resp.user)
            }
            Err(err) => {
                fall_back("login", &err);
                let user = stored_users(&self.store)
                    .into_iter()
                    .find(|u| u.email == email && u.is_active)
                    .ok_or(ClientError::InvalidCredentials)?;
                self.store.set(keys::AUTH_USER, &user);
                Ok(user)
            }
        }
    }

    /// Restaurant accounts are created inactive. Offline, they come back as
    /// [`ClientError::PendingApproval`] once stored.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> ClientResult<User> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            role,
        };
        match self.api.post::<RegisterResponse, _>("register", &request).await {
            Ok(resp) => {
                if let Some(token) = resp.token {
                    self.store.set(keys::AUTH_USER, &resp.user);
                    self.store.set(keys::TOKEN, &token);
                }
                Ok(resp.user)
            }
            Err(err) => {
                fall_back("register", &err);
                let mut users = stored_users(&self.store);
                if users.iter().any(|u| u.email == email) {
                    return Err(ClientError::DuplicateEmail);
                }

                let now = Utc::now();
                let user = User {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    email: email.to_string(),
                    role,
                    is_active: role == UserRole::Customer,
                    created_at: now,
                    updated_at: now,
                };
                users.push(user.clone());
                self.store.set(keys::USERS, &users);

                if role != UserRole::Customer {
                    return Err(ClientError::PendingApproval);
                }
                self.store.set(keys::AUTH_USER, &user);
                Ok(user)
            }
        }
    }

    /// The session is cleared even when the API call fails.
    pub async fn logout(&self) {
        if self.store.contains(keys::TOKEN) {
            if let Err(err) = self.api.post_empty::<serde_json::Value>("logout").await {
                tracing::warn!(error = %err, "logout request failed");
            }
        }
        self.store.remove(keys::AUTH_USER);
        self.store.remove(keys::TOKEN);
    }

    pub fn current_user(&self) -> Option<User> {
        self.store.get(keys::AUTH_USER)
    }
}

#[derive(Debug, Clone)]
pub struct UserService {
    api: ApiClient,
    store: LocalStore,
}

impl UserService {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        Self { api, store }
    }

    pub async fn list(&self) -> Vec<User> {
        match self.api.get::<UserList>("users").await {
            Ok(list) => list.items,
            Err(err) => {
                fall_back("list users", &err);
                stored_users(&self.store)
            }
        }
    }

    pub async fn toggle_active(&self, id: Uuid) -> ClientResult<User> {
        let path = format!("users/{id}/toggle-active");
        match self.api.post_empty::<User>(&path).await {
            Ok(user) => Ok(user),
            Err(err) => {
                fall_back("toggle user", &err);
                let mut users = stored_users(&self.store);
                let user = users
                    .iter_mut()
                    .find(|u| u.id == id)
                    .ok_or_else(|| ClientError::NotFound("User not found".into()))?;
                user.is_active = !user.is_active;
                user.updated_at = Utc::now();
                let user = user.clone();
                self.store.set(keys::USERS, &users);
                Ok(user)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestaurantService {
    api: ApiClient,
    store: LocalStore,
}

impl RestaurantService {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        Self { api, store }
    }

    pub async fn list(&self) -> Vec<Restaurant> {
        match self.api.get::<RestaurantList>("restaurants").await {
            Ok(list) => list.items.into_iter().map(|r| r.restaurant).collect(),
            Err(err) => {
                fall_back("list restaurants", &err);
                stored_restaurants(&self.store)
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> ClientResult<Restaurant> {
        match self.api.get::<RestaurantDetail>(&format!("restaurants/{id}")).await {
            Ok(detail) => Ok(detail.restaurant),
            Err(err) => {
                fall_back("get restaurant", &err);
                stored_restaurants(&self.store)
                    .into_iter()
                    .find(|r| r.id == id)
                    .ok_or_else(|| ClientError::NotFound("Restaurant not found".into()))
            }
        }
    }

    /// Offline, the signed-in user becomes the owner.
    pub async fn create(&self, request: &CreateRestaurantRequest) -> ClientResult<Restaurant> {
        match self.api.post::<Restaurant, _>("restaurants", request).await {
            Ok(restaurant) => Ok(restaurant),
            Err(err) => {
                fall_back("create restaurant", &err);
                let owner: User = self.store.get(keys::AUTH_USER).ok_or(ClientError::Unauthorized)?;
                let now = Utc::now();
                let restaurant = Restaurant {
                    id: Uuid::new_v4(),
                    owner_id: owner.id,
                    name: request.name.clone(),
                    description: request.description.clone(),
                    address: request.address.clone(),
                    phone: request.phone.clone(),
                    image: request.image.clone(),
                    cuisine: request.cuisine.clone(),
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                };
                let mut restaurants = stored_restaurants(&self.store);
                restaurants.push(restaurant.clone());
                self.store.set(keys::RESTAURANTS, &restaurants);
                Ok(restaurant)
            }
        }
    }

    pub async fn update(&self, id: Uuid, request: &UpdateRestaurantRequest) -> ClientResult<Restaurant> {
        match self.api.put::<Restaurant, _>(&format!("restaurants/{id}"), request).await {
            Ok(restaurant) => Ok(restaurant),
            Err(err) => {
                fall_back("update restaurant", &err);
                let mut restaurants = stored_restaurants(&self.store);
                let restaurant = restaurants
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or_else(|| ClientError::NotFound("Restaurant not found".into()))?;
                if let Some(name) = &request.name {
                    restaurant.name = name.clone();
                }
                if let Some(description) = &request.description {
                    restaurant.description = description.clone();
                }
                if let Some(address) = &request.address {
                    restaurant.address = address.clone();
                }
                if let Some(phone) = &request.phone {
                    restaurant.phone = phone.clone();
                }
                if let Some(image) = &request.image {
                    restaurant.image = image.clone();
                }
                if let Some(cuisine) = &request.cuisine {
                    restaurant.cuisine = cuisine.clone();
                }
                restaurant.updated_at = Utc::now();
                let restaurant = restaurant.clone();
                self.store.set(keys::RESTAURANTS, &restaurants);
                Ok(restaurant)
            }
        }
    }

    pub async fn toggle_active(&self, id: Uuid) -> ClientResult<Restaurant> {
        let path = format!("restaurants/{id}/toggle-active");
        match self.api.post_empty::<Restaurant>(&path).await {
            Ok(restaurant) => Ok(restaurant),
            Err(err) => {
                fall_back("toggle restaurant", &err);
                let mut restaurants = stored_restaurants(&self.store);
                let restaurant = restaurants
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or_else(|| ClientError::NotFound("Restaurant not found".into()))?;
                restaurant.is_active = !restaurant.is_active;
                restaurant.updated_at = Utc::now();
                let restaurant = restaurant.clone();
                self.store.set(keys::RESTAURANTS, &restaurants);
                Ok(restaurant)
            }
        }
    }

    pub async fn by_owner(&self, owner_id: Uuid) -> Vec<Restaurant> {
        match self.api.get::<Vec<Restaurant>>(&format!("users/{owner_id}/restaurants")).await {
            Ok(items) => items,
            Err(err) => {
                fall_back("restaurants by owner", &err);
                stored_restaurants(&self.store)
                    .into_iter()
                    .filter(|r| r.owner_id == owner_id)
                    .collect()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuItemService {
    api: ApiClient,
    store: LocalStore,
}

impl MenuItemService {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        Self { api, store }
    }

    pub async fn list(&self, restaurant_id: Uuid) -> Vec<MenuItem> {
        let path = format!("restaurants/{restaurant_id}/menu-items");
        match self.api.get::<MenuItemList>(&path).await {
            Ok(list) => list.items,
            Err(err) => {
                fall_back("list menu items", &err);
                stored_menu_items(&self.store)
                    .into_iter()
                    .filter(|m| m.restaurant_id == restaurant_id)
                    .collect()
            }
        }
    }

    pub async fn create(&self, request: &CreateMenuItemRequest) -> ClientResult<MenuItem> {
        match self.api.post::<MenuItem, _>("menu-items", request).await {
            Ok(item) => Ok(item),
            Err(err) => {
                fall_back("create menu item", &err);
                let now = Utc::now();
                let item = MenuItem {
                    id: Uuid::new_v4(),
                    restaurant_id: request.restaurant_id,
                    name: request.name.clone(),
                    description: request.description.clone(),
                    price: request.price.round_dp(2),
                    image: request.image.clone(),
                    category: request.category.clone(),
                    is_available: true,
                    created_at: now,
                    updated_at: now,
                };
                let mut items = stored_menu_items(&self.store);
                items.push(item.clone());
                self.store.set(keys::MENU_ITEMS, &items);
                Ok(item)
            }
        }
    }

    pub async fn update(&self, id: Uuid, request: &UpdateMenuItemRequest) -> ClientResult<MenuItem> {
        match self.api.put::<MenuItem, _>(&format!("menu-items/{id}"), request).await {
            Ok(item) => Ok(item),
            Err(err) => {
                fall_back("update menu item", &err);
                let mut items = stored_menu_items(&self.store);
                let item = items
                    .iter_mut()
                    .find(|m| m.id == id)
                    .ok_or_else(|| ClientError::NotFound("Menu item not found".into()))?;
                if let Some(name) = &request.name {
                    item.name = name.clone();
                }
                if let Some(description) = &request.description {
                    item.description = description.clone();
                }
                if let Some(price) = request.price {
                    item.price = price.round_dp(2);
                }
                if let Some(image) = &request.image {
                    item.image = image.clone();
                }
                if let Some(category) = &request.category {
                    item.category = category.clone();
                }
                if let Some(is_available) = request.is_available {
                    item.is_available = is_available;
                }
                item.updated_at = Utc::now();
                let item = item.clone();
                self.store.set(keys::MENU_ITEMS, &items);
                Ok(item)
            }
        }
    }

    pub async fn delete(&self, id: Uuid) -> ClientResult<()> {
        match self.api.delete(&format!("menu-items/{id}")).await {
            Ok(()) => Ok(()),
            Err(err) => {
                fall_back("delete menu item", &err);
                let mut items = stored_menu_items(&self.store);
                let before = items.len();
                items.retain(|m| m.id != id);
                if items.len() == before {
                    return Err(ClientError::NotFound("Menu item not found".into()));
                }
                self.store.set(keys::MENU_ITEMS, &items);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderService {
    api: ApiClient,
    store: LocalStore,
}

impl OrderService {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        Self { api, store }
    }

    async fn list_from<F>(&self, path: &str, operation: &str, keep: F) -> Vec<OrderDetail>
    where
        F: Fn(&OrderDetail) -> bool,
    {
        match self.api.get::<OrderList>(path).await {
            Ok(list) => list.items,
            Err(err) => {
                fall_back(operation, &err);
                stored_orders(&self.store).into_iter().filter(|o| keep(o)).collect()
            }
        }
    }

    pub async fn list(&self) -> Vec<OrderDetail> {
        self.list_from("orders", "list orders", |_| true).await
    }

    pub async fn by_restaurant(&self, restaurant_id: Uuid) -> Vec<OrderDetail> {
        let path = format!("restaurants/{restaurant_id}/orders");
        self.list_from(&path, "orders by restaurant", |o| {
            o.order.restaurant_id == restaurant_id
        })
        .await
    }

    pub async fn by_customer(&self, customer_id: Uuid) -> Vec<OrderDetail> {
        let path = format!("users/{customer_id}/orders");
        self.list_from(&path, "orders by customer", |o| o.order.customer_id == customer_id)
            .await
    }

    /// Places the cart's contents. Offline, lines are priced from the cart snapshot.
    pub async fn create(&self, customer_id: Uuid, cart: &Cart) -> ClientResult<OrderDetail> {
        let restaurant_id = cart
            .restaurant_id()
            .filter(|_| !cart.is_empty())
            .ok_or_else(|| ClientError::Validation("The cart is empty".into()))?;

        let request = CreateOrderRequest {
            restaurant_id,
            items: cart.order_lines(),
        };
        match self.api.post::<OrderDetail, _>("orders", &request).await {
            Ok(detail) => Ok(detail),
            Err(err) => {
                fall_back("create order", &err);
                let now = Utc::now();
                let order_id = Uuid::new_v4();
                let items: Vec<OrderItem> = cart
                    .items()
                    .iter()
                    .map(|line| OrderItem {
                        id: Uuid::new_v4(),
                        order_id,
                        menu_item_id: line.menu_item.id,
                        name: line.menu_item.name.clone(),
                        price: line.menu_item.price,
                        quantity: line.quantity,
                        created_at: now,
                    })
                    .collect();

                let detail = OrderDetail {
                    order: Order {
                        id: order_id,
                        customer_id,
                        restaurant_id,
                        status: OrderStatus::Pending,
                        total_amount: cart.total_amount(),
                        created_at: now,
                        updated_at: now,
                    },
                    items,
                    restaurant: None,
                    customer: None,
                };

                let mut orders = stored_orders(&self.store);
                orders.push(detail.clone());
                self.store.set(keys::ORDERS, &orders);
                Ok(detail)
            }
        }
    }

    pub async fn update_status(&self, id: Uuid, status: OrderStatus) -> ClientResult<Order> {
        let request = UpdateOrderStatusRequest { status };
        match self.api.post::<Order, _>(&format!("orders/{id}/status"), &request).await {
            Ok(order) => Ok(order),
            Err(err) => {
                fall_back("update order status", &err);
                let mut orders = stored_orders(&self.store);
                let detail = orders
                    .iter_mut()
                    .find(|o| o.order.id == id)
                    .ok_or_else(|| ClientError::NotFound("Order not found".into()))?;
                detail.order.status = status;
                detail.order.updated_at = Utc::now();
                let order = detail.order.clone();
                self.store.set(keys::ORDERS, &orders);
                Ok(order)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    // Nothing listens on the discard port, so every API call fails fast.
    fn offline() -> (TempDir, ClientServices) {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::new("http://127.0.0.1:9/api", dir.path().join("store.json"))
            .with_timeout(2);
        let services = ClientServices::connect(&config).unwrap();
        (dir, services)
    }

    #[tokio::test]
    async fn admin_shortcut_skips_the_api() {
        let (_dir, services) = offline();
        let user = services.auth.login("admin", "admin").await.unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(services.auth.current_user(), Some(user));
    }

    #[tokio::test]
    async fn offline_login_requires_active_account() {
        let (_dir, services) = offline();

        let user = services.auth.login("sam@example.com", "anything").await.unwrap();
        assert_eq!(user.id, mock::CUSTOMER_ID);

        let err = services.auth.login("kenji@example.com", "anything").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidCredentials));
    }

    #[tokio::test]
    async fn offline_restaurant_registration_is_pending() {
        let (_dir, services) = offline();

        let err = services
            .auth
            .register("new@example.com", "secret1", "New Owner", UserRole::Restaurant)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::PendingApproval));
        assert!(services.auth.current_user().is_none());

        let stored = services.users.list().await;
        let created = stored.iter().find(|u| u.email == "new@example.com").unwrap();
        assert!(!created.is_active);
    }

    #[tokio::test]
    async fn offline_duplicate_email_is_rejected() {
        let (_dir, services) = offline();
        let before = services.users.list().await.len();

        let err = services
            .auth
            .register("sam@example.com", "secret1", "Sam Again", UserRole::Customer)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::DuplicateEmail));
        assert_eq!(services.users.list().await.len(), before);
    }

    #[tokio::test]
    async fn logout_always_clears_session() {
        let (_dir, services) = offline();
        services.auth.login("admin", "admin").await.unwrap();
        services.store().set(keys::TOKEN, &"stale".to_string());

        services.auth.logout().await;

        assert!(services.auth.current_user().is_none());
        assert!(!services.store().contains(keys::TOKEN));
    }

    #[tokio::test]
    async fn offline_toggle_twice_restores_flag() {
        let (_dir, services) = offline();

        let first = services.restaurants.toggle_active(mock::TRATTORIA_ID).await.unwrap();
        assert!(!first.is_active);
        let second = services.restaurants.toggle_active(mock::TRATTORIA_ID).await.unwrap();
        assert!(second.is_active);
    }

    #[tokio::test]
    async fn offline_missing_ids_are_not_found() {
        let (_dir, services) = offline();
        let missing = Uuid::new_v4();

        assert!(matches!(
            services.users.toggle_active(missing).await,
            Err(ClientError::NotFound(_))
        ));
        assert!(matches!(
            services.menu_items.delete(missing).await,
            Err(ClientError::NotFound(_))
        ));
        assert!(matches!(
            services.orders.update_status(missing, OrderStatus::Ready).await,
            Err(ClientError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn offline_order_is_priced_from_cart() {
        let (_dir, services) = offline();
        let pizza = services
            .menu_items
            .list(mock::TRATTORIA_ID)
            .await
            .into_iter()
            .find(|m| m.id == mock::MARGHERITA_ID)
            .unwrap();

        let mut cart = services.cart();
        cart.add(&pizza, 3, || true);

        let detail = services.orders.create(mock::CUSTOMER_ID, &cart).await.unwrap();
        assert_eq!(detail.order.total_amount, Decimal::new(2997, 2));
        assert_eq!(detail.order.status, OrderStatus::Pending);
        assert_eq!(detail.items.len(), 1);

        let mine = services.orders.by_customer(mock::CUSTOMER_ID).await;
        assert!(mine.iter().any(|o| o.order.id == detail.order.id));
    }

    #[tokio::test]
    async fn empty_cart_cannot_be_ordered() {
        let (_dir, services) = offline();
        let cart = services.cart();
        let err = services.orders.create(mock::CUSTOMER_ID, &cart).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}
