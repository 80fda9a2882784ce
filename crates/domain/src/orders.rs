use thiserror::Error;
use uuid::Uuid;

/// An order line after its product has been resolved: quantity from the
/// request, unit price from the product record.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_price: f64,
}

impl PricedLine {
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

#[derive(Debug, Error)]
pub enum OrderPricingError {
    #[error("Order must have at least one item")]
    NoItems,

    #[error("Invalid quantity for product {0}")]
    InvalidQuantity(Uuid),

    #[error("Invalid unit price for product {0}")]
    InvalidPrice(Uuid),
}

/// Compute the order total from resolved lines.
///
/// Rejects empty orders, zero quantities, and negative prices. The returned
/// total is the only value ever written to an order row; client-supplied
/// totals do not exist in this flow.
pub fn price_order(lines: &[PricedLine]) -> Result<f64, OrderPricingError> {
    if lines.is_empty() {
        return Err(OrderPricingError::NoItems);
    }

    let mut total = 0.0;
    for line in lines {
        if line.quantity == 0 {
            return Err(OrderPricingError::InvalidQuantity(line.product_id));
        }
        if line.unit_price < 0.0 {
            return Err(OrderPricingError::InvalidPrice(line.product_id));
        }
        total += line.line_total();
    }

    Ok(total)
}
