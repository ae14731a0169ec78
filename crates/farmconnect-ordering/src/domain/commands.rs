//! Commands for the Ordering context.

use farmconnect_core::command::Command;
use farmconnect_core::records::OrderStatus;
use uuid::Uuid;

/// Command to turn the caller's cart into orders.
#[derive(Debug, Clone)]
pub struct Checkout {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Delivery address copied onto every order; empty when omitted.
    pub delivery_address: Option<String>,
}

impl Command for Checkout {
    fn command_type(&self) -> &'static str {
        "ordering.checkout"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to move an order to another status.
#[derive(Debug, Clone)]
pub struct TransitionOrder {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The order identifier.
    pub order_id: Uuid,
    /// Requested status.
    pub target: OrderStatus,
}

impl Command for TransitionOrder {
    fn command_type(&self) -> &'static str {
        "ordering.transition_order"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
