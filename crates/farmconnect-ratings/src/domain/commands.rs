//! Commands for the Ratings context.

use farmconnect_core::command::Command;
use uuid::Uuid;

/// Command to rate a product bought through an order.
#[derive(Debug, Clone)]
pub struct RecordRating {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The order the product was bought through.
    pub order_id: Uuid,
    /// The rated product.
    pub product_id: Uuid,
    /// Star value in `[1, 5]`.
    pub stars: i32,
    /// Optional free text.
    pub feedback: Option<String>,
}

impl Command for RecordRating {
    fn command_type(&self) -> &'static str {
        "ratings.record_rating"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
