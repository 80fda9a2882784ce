pub mod auth;
pub mod categories;
pub mod health;
pub mod ingredients;
pub mod meta;
pub mod order_items;
pub mod order_statuses;
pub mod orders;
pub mod products;
pub mod users;
