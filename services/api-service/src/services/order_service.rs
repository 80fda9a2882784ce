use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use domain::orders::{price_order, PricedLine};
use domain::requests::{CreateOrderRequest, UpdateOrderRequest};
use domain::{AppError, Order, OrderItem};
use storage::{OrderItemRepository, OrderRepository, OrderStatusRepository, ProductRepository};

use super::normalize_opt;

/// An order together with its line items, as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Order workflow: line items are validated against live product records
/// and the total is computed server-side before anything is written.
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    order_items: Arc<dyn OrderItemRepository>,
    products: Arc<dyn ProductRepository>,
    statuses: Arc<dyn OrderStatusRepository>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        order_items: Arc<dyn OrderItemRepository>,
        products: Arc<dyn ProductRepository>,
        statuses: Arc<dyn OrderStatusRepository>,
    ) -> Self {
        Self {
            orders,
            order_items,
            products,
            statuses,
        }
    }

    /// Create an order for `user_id`.
    ///
    /// Validation order: empty item list (before any repository call),
    /// status existence, then per-item product existence and availability in
    /// input order. Any rejection aborts before a single row is written.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateOrderRequest,
    ) -> Result<OrderWithItems, AppError> {
        let result = self.create_inner(user_id, request).await;
        common::metrics::record_order_created(result.is_ok());
        result
    }

    async fn create_inner(
        &self,
        user_id: Uuid,
        request: CreateOrderRequest,
    ) -> Result<OrderWithItems, AppError> {
        if request.items.is_empty() {
            return Err(AppError::Validation(
                "Order must have at least one item".to_string(),
            ));
        }
        request.validate()?;

        if self.statuses.find_by_id(request.status_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "Order status {} does not exist",
                request.status_id
            )));
        }

        let mut lines = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let product = self
                .products
                .find_by_id(item.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::Validation(format!("Product {} does not exist", item.product_id))
                })?;

            if !product.is_available {
                return Err(AppError::Validation(format!(
                    "Product '{}' is not available",
                    product.name
                )));
            }

            // The unit price comes from the product record, never the client.
            lines.push(PricedLine {
                product_id: product.id,
                quantity: item.quantity,
                unit_price: product.price,
            });
        }

        let total_amount = price_order(&lines)?;

        let order_id = Uuid::new_v4();
        let order = Order {
            id: order_id,
            user_id,
            status_id: request.status_id,
            order_date: Utc::now(),
            total_amount,
            special_instructions: normalize_opt(request.special_instructions),
            completed_at: None,
        };
        let items: Vec<OrderItem> = lines
            .iter()
            .map(|line| OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: line.product_id,
                quantity: line.quantity as i32,
                unit_price: line.unit_price,
            })
            .collect();

        let created = self.orders.create_with_items(&order, &items).await?;
        Ok(OrderWithItems {
            order: created,
            items,
        })
    }

    pub async fn list(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.orders.find_all().await?)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, AppError> {
        Ok(self.orders.find_by_user(user_id).await?)
    }

    pub async fn list_by_status(&self, status_id: Uuid) -> Result<Vec<Order>, AppError> {
        Ok(self.orders.find_by_status(status_id).await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<OrderWithItems, AppError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order", id))?;
        let items = self.order_items.find_by_order(id).await?;
        Ok(OrderWithItems { order, items })
    }

    pub async fn update(&self, id: Uuid, request: UpdateOrderRequest) -> Result<Order, AppError> {
        request.validate()?;

        let existing = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order", id))?;

        let status_id = request.status_id.unwrap_or(existing.status_id);
        if status_id != existing.status_id && self.statuses.find_by_id(status_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "Order status {} does not exist",
                status_id
            )));
        }

        let merged = Order {
            status_id,
            special_instructions: normalize_opt(request.special_instructions)
                .or(existing.special_instructions.clone()),
            ..existing
        };
        self.orders
            .update(&merged)
            .await?
            .ok_or_else(|| AppError::not_found("Order", id))
    }

    /// Mark an order completed. Completion happens at most once.
    pub async fn complete(&self, id: Uuid) -> Result<Order, AppError> {
        match self.orders.complete(id).await? {
            Some(order) => Ok(order),
            None => match self.orders.find_by_id(id).await? {
                Some(_) => Err(AppError::Conflict(format!("Order {} already completed", id))),
                None => Err(AppError::not_found("Order", id)),
            },
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if self.orders.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Order", id))
        }
    }

    pub async fn get_item(&self, id: Uuid) -> Result<OrderItem, AppError> {
        self.order_items
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order item", id))
    }

    pub async fn list_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, AppError> {
        if self.orders.find_by_id(order_id).await?.is_none() {
            return Err(AppError::not_found("Order", order_id));
        }
        Ok(self.order_items.find_by_order(order_id).await?)
    }

    pub async fn update_item_quantity(
        &self,
        id: Uuid,
        quantity: u32,
    ) -> Result<OrderItem, AppError> {
        if quantity == 0 {
            return Err(AppError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }
        self.order_items
            .update_quantity(id, quantity as i32)
            .await?
            .ok_or_else(|| AppError::not_found("Order item", id))
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<(), AppError> {
        if self.order_items.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::not_found("Order item", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::requests::CreateOrderItemRequest;
    use domain::{OrderStatus, Product};
    use mockall::mock;
    use mockall::predicate::eq;
    use storage::StorageError;

    mock! {
        Orders {}

        #[async_trait]
        impl OrderRepository for Orders {
            async fn find_all(&self) -> Result<Vec<Order>, StorageError>;
            async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StorageError>;
            async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, StorageError>;
            async fn find_by_status(&self, status_id: Uuid) -> Result<Vec<Order>, StorageError>;
            async fn create_with_items(
                &self,
                order: &Order,
                items: &[OrderItem],
            ) -> Result<Order, StorageError>;
            async fn update(&self, order: &Order) -> Result<Option<Order>, StorageError>;
            async fn complete(&self, id: Uuid) -> Result<Option<Order>, StorageError>;
            async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
        }
    }

    mock! {
        OrderItems {}

        #[async_trait]
        impl OrderItemRepository for OrderItems {
            async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderItem>, StorageError>;
            async fn find_by_order(&self, order_id: Uuid) -> Result<Vec<OrderItem>, StorageError>;
            async fn update_quantity(
                &self,
                id: Uuid,
                quantity: i32,
            ) -> Result<Option<OrderItem>, StorageError>;
            async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
        }
    }

    mock! {
        Products {}

        #[async_trait]
        impl ProductRepository for Products {
            async fn find_all(&self) -> Result<Vec<Product>, StorageError>;
            async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StorageError>;
            async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<Product>, StorageError>;
            async fn create(&self, product: &Product) -> Result<Product, StorageError>;
            async fn update(&self, product: &Product) -> Result<Option<Product>, StorageError>;
            async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
        }
    }

    mock! {
        Statuses {}

        #[async_trait]
        impl OrderStatusRepository for Statuses {
            async fn find_all(&self) -> Result<Vec<OrderStatus>, StorageError>;
            async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderStatus>, StorageError>;
            async fn find_by_name_ci(&self, name: &str) -> Result<Option<OrderStatus>, StorageError>;
            async fn create(&self, status: &OrderStatus) -> Result<OrderStatus, StorageError>;
            async fn update(&self, status: &OrderStatus) -> Result<Option<OrderStatus>, StorageError>;
            async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
        }
    }

    fn product(id: Uuid, name: &str, price: f64, available: bool) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: None,
            sku: None,
            price,
            is_available: available,
            cost_price: 0.0,
            stock_quantity: 100,
            category_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn pending_status(id: Uuid) -> OrderStatus {
        OrderStatus {
            id,
            name: "pending".to_string(),
            description: None,
        }
    }

    fn service(
        orders: MockOrders,
        products: MockProducts,
        statuses: MockStatuses,
    ) -> OrderService {
        OrderService::new(
            Arc::new(orders),
            Arc::new(MockOrderItems::new()),
            Arc::new(products),
            Arc::new(statuses),
        )
    }

    #[tokio::test]
    async fn test_create_computes_total_from_product_prices() {
        let status_id = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let mut statuses = MockStatuses::new();
        statuses
            .expect_find_by_id()
            .with(eq(status_id))
            .returning(move |id| Ok(Some(pending_status(id))));

        let mut products = MockProducts::new();
        products
            .expect_find_by_id()
            .with(eq(first))
            .returning(move |id| Ok(Some(product(id, "Concha", 10.00, true))));
        products
            .expect_find_by_id()
            .with(eq(second))
            .returning(move |id| Ok(Some(product(id, "Bolillo", 3.50, true))));

        let mut orders = MockOrders::new();
        orders
            .expect_create_with_items()
            .withf(|order: &Order, items: &[OrderItem]| {
                order.total_amount == 23.50 && items.len() == 2
            })
            .returning(|order, _| Ok(order.clone()));

        let service = service(orders, products, statuses);
        let created = service
            .create(
                Uuid::new_v4(),
                CreateOrderRequest {
                    status_id,
                    items: vec![
                        CreateOrderItemRequest {
                            product_id: first,
                            quantity: 2,
                        },
                        CreateOrderItemRequest {
                            product_id: second,
                            quantity: 1,
                        },
                    ],
                    special_instructions: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(created.order.total_amount, 23.50);
        assert_eq!(created.items.len(), 2);
        // Captured prices come from the product records.
        assert_eq!(created.items[0].unit_price, 10.00);
        assert_eq!(created.items[1].unit_price, 3.50);
    }

    #[tokio::test]
    async fn test_create_empty_items_rejected_before_any_repository_call() {
        let mut statuses = MockStatuses::new();
        statuses.expect_find_by_id().never();
        let mut products = MockProducts::new();
        products.expect_find_by_id().never();
        let mut orders = MockOrders::new();
        orders.expect_create_with_items().never();

        let service = service(orders, products, statuses);
        let result = service
            .create(
                Uuid::new_v4(),
                CreateOrderRequest {
                    status_id: Uuid::new_v4(),
                    items: vec![],
                    special_instructions: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_unknown_status_rejected() {
        let mut statuses = MockStatuses::new();
        statuses.expect_find_by_id().returning(|_| Ok(None));
        let mut products = MockProducts::new();
        products.expect_find_by_id().never();
        let mut orders = MockOrders::new();
        orders.expect_create_with_items().never();

        let service = service(orders, products, statuses);
        let result = service
            .create(
                Uuid::new_v4(),
                CreateOrderRequest {
                    status_id: Uuid::new_v4(),
                    items: vec![CreateOrderItemRequest {
                        product_id: Uuid::new_v4(),
                        quantity: 1,
                    }],
                    special_instructions: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_unavailable_product_names_product_and_persists_nothing() {
        let status_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();

        let mut statuses = MockStatuses::new();
        statuses
            .expect_find_by_id()
            .returning(move |id| Ok(Some(pending_status(id))));
        let mut products = MockProducts::new();
        products
            .expect_find_by_id()
            .returning(move |id| Ok(Some(product(id, "Rosca de Reyes", 250.0, false))));
        let mut orders = MockOrders::new();
        orders.expect_create_with_items().never();

        let service = service(orders, products, statuses);
        let result = service
            .create(
                Uuid::new_v4(),
                CreateOrderRequest {
                    status_id,
                    items: vec![CreateOrderItemRequest {
                        product_id,
                        quantity: 1,
                    }],
                    special_instructions: None,
                },
            )
            .await;

        match result {
            Err(AppError::Validation(message)) => {
                assert!(message.contains("Rosca de Reyes"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_create_missing_product_rejected() {
        let status_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();

        let mut statuses = MockStatuses::new();
        statuses
            .expect_find_by_id()
            .returning(move |id| Ok(Some(pending_status(id))));
        let mut products = MockProducts::new();
        products.expect_find_by_id().returning(|_| Ok(None));
        let mut orders = MockOrders::new();
        orders.expect_create_with_items().never();

        let service = service(orders, products, statuses);
        let result = service
            .create(
                Uuid::new_v4(),
                CreateOrderRequest {
                    status_id,
                    items: vec![CreateOrderItemRequest {
                        product_id,
                        quantity: 2,
                    }],
                    special_instructions: None,
                },
            )
            .await;

        match result {
            Err(AppError::Validation(message)) => {
                assert!(message.contains(&product_id.to_string()));
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_complete_twice_is_conflict() {
        let id = Uuid::new_v4();
        let mut orders = MockOrders::new();
        orders.expect_complete().with(eq(id)).returning(|_| Ok(None));
        orders.expect_find_by_id().with(eq(id)).returning(move |id| {
            Ok(Some(Order {
                id,
                user_id: Uuid::new_v4(),
                status_id: Uuid::new_v4(),
                order_date: Utc::now(),
                total_amount: 10.0,
                special_instructions: None,
                completed_at: Some(Utc::now()),
            }))
        });

        let service = service(orders, MockProducts::new(), MockStatuses::new());
        let result = service.complete(id).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_complete_missing_order_is_not_found() {
        let id = Uuid::new_v4();
        let mut orders = MockOrders::new();
        orders.expect_complete().with(eq(id)).returning(|_| Ok(None));
        orders.expect_find_by_id().with(eq(id)).returning(|_| Ok(None));

        let service = service(orders, MockProducts::new(), MockStatuses::new());
        let result = service.complete(id).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
