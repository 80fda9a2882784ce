pub mod category_repository;
pub mod ingredient_repository;
pub mod order_item_repository;
pub mod order_repository;
pub mod order_status_repository;
pub mod product_repository;
pub mod user_repository;

pub use category_repository::{CategoryRepository, PostgresCategoryRepository};
pub use ingredient_repository::{IngredientRepository, PostgresIngredientRepository};
pub use order_item_repository::{OrderItemRepository, PostgresOrderItemRepository};
pub use order_repository::{OrderRepository, PostgresOrderRepository};
pub use order_status_repository::{OrderStatusRepository, PostgresOrderStatusRepository};
pub use product_repository::{PostgresProductRepository, ProductRepository};
pub use user_repository::{PostgresUserRepository, UserRepository};
