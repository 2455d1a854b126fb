use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{dto::orders::OrderLineRequest, models::MenuItem};

use super::store::{LocalStore, keys};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub menu_item: MenuItem,
    pub quantity: i32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CartSnapshot {
    items: Vec<CartLine>,
    restaurant_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The cart held another restaurant's items and was replaced.
    Replaced,
    /// Switching restaurants was refused; nothing changed.
    Declined,
}

/// Items from a single restaurant, persisted to the store after every change.
#[derive(Debug)]
pub struct Cart {
    items: Vec<CartLine>,
    restaurant_id: Option<Uuid>,
    store: LocalStore,
}

impl Cart {
    pub fn load(store: LocalStore) -> Self {
        let snapshot = store.get::<CartSnapshot>(keys::CART).unwrap_or_default();
        Self {
            items: snapshot.items,
            restaurant_id: snapshot.restaurant_id,
            store,
        }
    }

    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    pub fn restaurant_id(&self) -> Option<Uuid> {
        self.restaurant_id
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `confirm` is only asked when the item belongs to another restaurant
    /// than the one already in the cart.
    pub fn add<F>(&mut self, menu_item: &MenuItem, quantity: i32, confirm: F) -> AddOutcome
    where
        F: FnOnce() -> bool,
    {
        let other_restaurant = self
            .restaurant_id
            .is_some_and(|id| id != menu_item.restaurant_id);

        if other_restaurant && !self.items.is_empty() {
            if !confirm() {
                return AddOutcome::Declined;
            }
            self.items = vec![CartLine {
                menu_item: menu_item.clone(),
                quantity,
            }];
            self.restaurant_id = Some(menu_item.restaurant_id);
            self.persist();
            return AddOutcome::Replaced;
        }

        if self.items.is_empty() {
            self.restaurant_id = Some(menu_item.restaurant_id);
        }

        match self.items.iter_mut().find(|l| l.menu_item.id == menu_item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(CartLine {
                menu_item: menu_item.clone(),
                quantity,
            }),
        }
        self.persist();
        AddOutcome::Added
    }

    pub fn remove(&mut self, menu_item_id: Uuid) {
        self.items.retain(|l| l.menu_item.id != menu_item_id);
        if self.items.is_empty() {
            self.restaurant_id = None;
        }
        self.persist();
    }

    /// A quantity of zero or less removes the line.
    pub fn update_quantity(&mut self, menu_item_id: Uuid, quantity: i32) {
        if quantity <= 0 {
            self.remove(menu_item_id);
            return;
        }
        if let Some(line) = self.items.iter_mut().find(|l| l.menu_item.id == menu_item_id) {
            line.quantity = quantity;
        }
        self.persist();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.restaurant_id = None;
        self.persist();
    }

    pub fn total_items(&self) -> i32 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Client-side estimate; the server reprices every line when the order is placed.
    pub fn total_amount(&self) -> Decimal {
        self.items
            .iter()
            .map(|l| l.menu_item.price * Decimal::from(l.quantity))
            .sum()
    }

    pub fn order_lines(&self) -> Vec<OrderLineRequest> {
        self.items
            .iter()
            .map(|l| OrderLineRequest {
                menu_item_id: l.menu_item.id,
                quantity: l.quantity,
            })
            .collect()
    }

    fn persist(&self) {
        let snapshot = CartSnapshot {
            items: self.items.clone(),
            restaurant_id: self.restaurant_id,
        };
        self.store.set(keys::CART, &snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock;
    use tempfile::TempDir;

    fn cart() -> (TempDir, Cart) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("store.json"));
        (dir, Cart::load(store))
    }

    fn item(id: Uuid) -> MenuItem {
        mock::menu_items()
            .into_iter()
            .find(|m| m.id == id)
            .unwrap()
    }

    #[test]
    fn first_item_sets_restaurant() {
        let (_dir, mut cart) = cart();
        let pizza = item(mock::MARGHERITA_ID);

        assert_eq!(cart.add(&pizza, 1, || false), AddOutcome::Added);
        assert_eq!(cart.restaurant_id(), Some(mock::TRATTORIA_ID));
    }

    #[test]
    fn same_item_accumulates_quantity() {
        let (_dir, mut cart) = cart();
        let pizza = item(mock::MARGHERITA_ID);

        cart.add(&pizza, 1, || true);
        cart.add(&pizza, 2, || true);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_amount(), Decimal::new(2997, 2));
    }

    #[test]
    fn accumulated_quantity_saturates() {
        let (_dir, mut cart) = cart();
        let pizza = item(mock::MARGHERITA_ID);

        cart.add(&pizza, i32::MAX, || true);
        cart.add(&pizza, 1, || true);

        assert_eq!(cart.items()[0].quantity, i32::MAX);
    }

    #[test]
    fn declining_another_restaurant_keeps_cart() {
        let (_dir, mut cart) = cart();
        cart.add(&item(mock::MARGHERITA_ID), 2, || true);

        let outcome = cart.add(&item(mock::SALMON_ROLL_ID), 1, || false);

        assert_eq!(outcome, AddOutcome::Declined);
        assert_eq!(cart.restaurant_id(), Some(mock::TRATTORIA_ID));
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn accepting_another_restaurant_replaces_cart() {
        let (_dir, mut cart) = cart();
        cart.add(&item(mock::MARGHERITA_ID), 2, || true);
        cart.add(&item(mock::CARBONARA_ID), 1, || true);

        let outcome = cart.add(&item(mock::SALMON_ROLL_ID), 1, || true);

        assert_eq!(outcome, AddOutcome::Replaced);
        assert_eq!(cart.restaurant_id(), Some(mock::SUSHI_ID));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].menu_item.id, mock::SALMON_ROLL_ID);
    }

    #[test]
    fn removing_last_line_clears_restaurant() {
        let (_dir, mut cart) = cart();
        cart.add(&item(mock::MARGHERITA_ID), 1, || true);
        cart.add(&item(mock::CARBONARA_ID), 1, || true);

        cart.remove(mock::MARGHERITA_ID);
        assert_eq!(cart.restaurant_id(), Some(mock::TRATTORIA_ID));

        cart.remove(mock::CARBONARA_ID);
        assert!(cart.is_empty());
        assert_eq!(cart.restaurant_id(), None);
    }

    #[test]
    fn zero_quantity_removes_line() {
        let (_dir, mut cart) = cart();
        cart.add(&item(mock::MARGHERITA_ID), 3, || true);

        cart.update_quantity(mock::MARGHERITA_ID, 0);

        assert!(cart.is_empty());
        assert_eq!(cart.restaurant_id(), None);
    }

    #[test]
    fn cart_is_rehydrated_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut cart = Cart::load(LocalStore::open(&path));
        cart.add(&item(mock::CARBONARA_ID), 2, || true);
        cart.update_quantity(mock::CARBONARA_ID, 5);

        let reloaded = Cart::load(LocalStore::open(&path));
        assert_eq!(reloaded.total_items(), 5);
        assert_eq!(reloaded.restaurant_id(), Some(mock::TRATTORIA_ID));
    }

    #[test]
    fn clear_empties_everything() {
        let (_dir, mut cart) = cart();
        cart.add(&item(mock::MARGHERITA_ID), 1, || true);
        cart.clear();

        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_amount(), Decimal::ZERO);
        assert_eq!(cart.restaurant_id(), None);
    }
}
