//! Commands for the Cart context.

use farmconnect_core::command::Command;
use uuid::Uuid;

/// Command to add a product to the caller's cart.
#[derive(Debug, Clone)]
pub struct AddCartItem {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Product to add.
    pub product_id: Uuid,
    /// Quantity to add; must be at least 1.
    pub quantity: i32,
}

impl Command for AddCartItem {
    fn command_type(&self) -> &'static str {
        "cart.add_item"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to overwrite the quantity of a cart item.
#[derive(Debug, Clone)]
pub struct UpdateCartItem {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Item to update.
    pub item_id: Uuid,
    /// New quantity; zero or less removes the item.
    pub quantity: i32,
}

impl Command for UpdateCartItem {
    fn command_type(&self) -> &'static str {
        "cart.update_item"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to remove an item from the caller's cart.
#[derive(Debug, Clone)]
pub struct RemoveCartItem {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Item to remove.
    pub item_id: Uuid,
}

impl Command for RemoveCartItem {
    fn command_type(&self) -> &'static str {
        "cart.remove_item"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to empty the caller's cart.
#[derive(Debug, Clone)]
pub struct ClearCart {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for ClearCart {
    fn command_type(&self) -> &'static str {
        "cart.clear"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
