//! Persisted record types shared by the bounded contexts and the stores.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Declares a string-backed enum with `as_str`, `Display` and `FromStr`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the stored string form.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(DomainError::Validation(format!(
                        concat!("unknown ", $label, ": {}"),
                        other
                    ))),
                }
            }
        }
    };
}

string_enum! {
    /// Role of a marketplace account.
    AccountRole, "account role" {
        /// Creates carts and orders and submits ratings.
        Buyer => "buyer",
        /// Owns products and receives orders.
        Seller => "seller",
        /// Reviews accounts and manages coupons.
        Admin => "admin",
    }
}

string_enum! {
    /// Product category.
    Category, "category" {
        /// Spices.
        Spices => "spices",
        /// Oils.
        Oils => "oils",
        /// Flours.
        Flours => "flours",
        /// Vegetables.
        Vegetables => "vegetables",
        /// Grains.
        Grains => "grains",
    }
}

string_enum! {
    /// Freshness grade advertised by the seller.
    Freshness, "freshness" {
        /// Very fresh.
        VeryFresh => "Very Fresh",
        /// Fresh (default).
        Fresh => "Fresh",
        /// Good.
        Good => "Good",
    }
}

string_enum! {
    /// Order lifecycle status.
    OrderStatus, "order status" {
        /// Initial state of every order.
        Pending => "pending",
        /// Seller accepted the order.
        Accepted => "accepted",
        /// Order handed over to the buyer.
        Delivered => "delivered",
        /// Order cancelled before delivery.
        Cancelled => "cancelled",
    }
}

impl Category {
    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Spices => "Spices",
            Self::Oils => "Oils",
            Self::Flours => "Flours",
            Self::Vegetables => "Vegetables",
            Self::Grains => "Grains",
        }
    }
}

/// A marketplace account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// Account identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Role of the account.
    pub role: AccountRole,
    /// Unique phone number.
    pub phone: String,
    /// Free-form location.
    pub location: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Whether an admin approved the account.
    pub is_verified: bool,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Fails with `Forbidden` unless the account has `role`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Forbidden` when the role does not match.
    pub fn ensure_role(&self, role: AccountRole) -> Result<(), DomainError> {
        if self.role == role {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "account {} is a {}, expected a {role}",
                self.id, self.role
            )))
        }
    }
}

/// Outcome of an admin reviewing an account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminVerification {
    /// Verification identifier.
    pub id: Uuid,
    /// Reviewed account.
    pub account_id: Uuid,
    /// Whether the account was approved.
    pub approved: bool,
    /// Reason given when rejecting; empty on approval.
    pub rejection_reason: String,
    /// Admin who performed the review.
    pub reviewed_by: Uuid,
    /// Review time.
    pub reviewed_at: DateTime<Utc>,
}

/// A product listed by a seller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    /// Product identifier.
    pub id: Uuid,
    /// Owning seller account.
    pub seller_id: Uuid,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Category.
    pub category: Category,
    /// Current unit price.
    pub price: Decimal,
    /// Pricing unit, e.g. `per kg`.
    pub unit: String,
    /// Quantity the seller has on hand.
    pub available_quantity: f64,
    /// Stock flag.
    pub in_stock: bool,
    /// Freshness grade.
    pub freshness: Freshness,
    /// Image URL.
    pub image: Option<String>,
    /// Mean star rating rounded to two decimals. Written only by the rating aggregator.
    pub rating: Decimal,
    /// Number of ratings. Written only by the rating aggregator.
    pub total_ratings: i32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A buyer's cart with its items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cart {
    /// Cart identifier.
    pub id: Uuid,
    /// Owning buyer account.
    pub buyer_id: Uuid,
    /// Bumped by every mutation; used to detect concurrent writers at checkout.
    pub version: i64,
    /// Items in insertion order.
    pub items: Vec<CartItem>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: i32 = 10_000;

/// Largest order total the store can hold (`NUMERIC(12, 2)`).
// 999_999_999_999 × 10^-2 (`Decimal::new` is not const).
pub const MAX_ORDER_TOTAL: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// A product line inside a cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    /// Item identifier.
    pub id: Uuid,
    /// Referenced product.
    pub product_id: Uuid,
    /// Between 1 and [`MAX_LINE_QUANTITY`].
    pub quantity: i32,
    /// Time the product was first added.
    pub added_at: DateTime<Utc>,
    /// The product as currently stored; `None` if it has been deleted.
    pub product: Option<Product>,
}

/// A seller-scoped order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    /// Order identifier.
    pub id: Uuid,
    /// Buyer who placed the order.
    pub buyer_id: Uuid,
    /// Seller who receives the order.
    pub seller_id: Uuid,
    /// Sum of quantity times price over the items.
    pub total_amount: Decimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Creation time.
    pub order_date: DateTime<Utc>,
    /// Expected delivery time, if the seller set one.
    pub delivery_eta: Option<DateTime<Utc>>,
    /// Delivery address; empty when omitted.
    pub delivery_address: String,
    /// Line items.
    pub items: Vec<OrderItem>,
}

/// A line item of an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    /// Item identifier.
    pub id: Uuid,
    /// Parent order.
    pub order_id: Uuid,
    /// Ordered product; `None` once the product is deleted.
    pub product_id: Option<Uuid>,
    /// Ordered quantity.
    pub quantity: i32,
    /// Product price frozen at checkout.
    pub price_at_order_time: Decimal,
}

impl OrderItem {
    /// Line total.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.price_at_order_time * Decimal::from(self.quantity)
    }
}

/// Orders produced from a cart snapshot, committed as one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPlacement {
    /// Cart the orders were built from.
    pub cart_id: Uuid,
    /// Cart version observed when the snapshot was taken.
    pub expected_cart_version: i64,
    /// Orders to create, one per seller.
    pub orders: Vec<Order>,
}

/// A buyer's rating of a product bought through an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rating {
    /// Rating identifier.
    pub id: Uuid,
    /// Buyer who submitted the rating.
    pub buyer_id: Uuid,
    /// Seller of the rated order.
    pub seller_id: Uuid,
    /// Rated product.
    pub product_id: Uuid,
    /// Rated order; an order is rated at most once.
    pub order_id: Uuid,
    /// Star value in `[1, 5]`.
    pub stars: i32,
    /// Optional free text; empty when omitted.
    pub feedback: String,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

/// Aggregate rating written onto a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingSummary {
    /// Mean stars rounded to two decimals.
    pub rating: Decimal,
    /// Number of ratings.
    pub total_ratings: i32,
}

/// Computes a [`RatingSummary`] from every star value of a product.
pub type StarsSummarizer = fn(&[i32]) -> RatingSummary;

/// A discount coupon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coupon {
    /// Coupon identifier.
    pub id: Uuid,
    /// Unique redemption code.
    pub code: String,
    /// Start of validity.
    pub valid_from: DateTime<Utc>,
    /// End of validity.
    pub valid_to: DateTime<Utc>,
    /// Discount percentage in `[0, 100]`.
    pub discount: i32,
    /// Manual on/off switch.
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness_round_trips_through_its_label() {
        for freshness in Freshness::ALL {
            assert_eq!(freshness.as_str().parse::<Freshness>().unwrap(), *freshness);
        }
        assert_eq!(Freshness::VeryFresh.as_str(), "Very Fresh");
    }

    #[test]
    fn test_unknown_order_status_is_a_validation_error() {
        match "shipped".parse::<OrderStatus>() {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("shipped")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_order_status_serializes_lowercase() {
        let json = serde_json::to_value(OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "cancelled");
    }

    #[test]
    fn test_ensure_role_rejects_other_roles() {
        let account = Account {
            id: Uuid::new_v4(),
            username: "ravi".to_owned(),
            role: AccountRole::Seller,
            phone: "9000000001".to_owned(),
            location: None,
            address: None,
            is_verified: false,
            created_at: Utc::now(),
        };
        assert!(account.ensure_role(AccountRole::Seller).is_ok());
        assert!(matches!(
            account.ensure_role(AccountRole::Buyer),
            Err(DomainError::Forbidden(_))
        ));
    }

    #[test]
    fn test_order_item_total_is_exact() {
        let item = OrderItem {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            product_id: Some(Uuid::new_v4()),
            quantity: 3,
            price_at_order_time: Decimal::new(1999, 2),
        };
        assert_eq!(item.total(), Decimal::new(5997, 2));
    }
}
