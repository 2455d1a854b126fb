pub mod menu_items;
pub mod order_items;
pub mod orders;
pub mod restaurants;
pub mod users;

pub use menu_items::Entity as MenuItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use restaurants::Entity as Restaurants;
pub use users::Entity as Users;
