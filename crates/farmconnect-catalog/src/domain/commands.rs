//! Commands for the Catalog context.

use chrono::{DateTime, Utc};
use farmconnect_core::command::Command;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::product::ProductDraft;

/// Command to list a new product.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Listing details.
    pub draft: ProductDraft,
}

impl Command for CreateProduct {
    fn command_type(&self) -> &'static str {
        "catalog.create_product"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to change the price of a product.
#[derive(Debug, Clone)]
pub struct ChangePrice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The product identifier.
    pub product_id: Uuid,
    /// The new unit price.
    pub price: Decimal,
}

impl Command for ChangePrice {
    fn command_type(&self) -> &'static str {
        "catalog.change_price"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to create a discount coupon.
#[derive(Debug, Clone)]
pub struct CreateCoupon {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Redemption code.
    pub code: String,
    /// Start of validity.
    pub valid_from: DateTime<Utc>,
    /// End of validity.
    pub valid_to: DateTime<Utc>,
    /// Discount percentage.
    pub discount: i32,
    /// Whether the coupon can be redeemed.
    pub active: bool,
}

impl Command for CreateCoupon {
    fn command_type(&self) -> &'static str {
        "catalog.create_coupon"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
