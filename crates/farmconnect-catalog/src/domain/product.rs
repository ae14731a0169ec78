//! Product listing rules.

use chrono::{DateTime, Utc};
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Account, AccountRole, Category, Freshness, Product};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Longest accepted product name.
pub const MAX_NAME_LEN: usize = 100;

/// Longest accepted pricing unit.
pub const MAX_UNIT_LEN: usize = 20;

/// Prices are stored as NUMERIC(10, 2).
const MAX_PRICE_SCALE: u32 = 2;

/// Seller-supplied listing details.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Category.
    pub category: Category,
    /// Unit price.
    pub price: Decimal,
    /// Pricing unit.
    pub unit: String,
    /// Quantity on hand.
    pub available_quantity: f64,
    /// Stock flag.
    pub in_stock: bool,
    /// Freshness grade.
    pub freshness: Freshness,
    /// Image URL.
    pub image: Option<String>,
}

/// Checks that `price` is positive, has at most two decimals and fits the
/// stored precision.
///
/// # Errors
///
/// Returns `DomainError::Validation` describing the first violated rule.
pub fn validate_price(price: Decimal) -> Result<(), DomainError> {
    if price <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "price must be positive, got {price}"
        )));
    }
    if price.normalize().scale() > MAX_PRICE_SCALE {
        return Err(DomainError::Validation(format!(
            "price {price} has more than {MAX_PRICE_SCALE} decimal places"
        )));
    }
    if price >= Decimal::new(100_000_000, 0) {
        return Err(DomainError::Validation(format!(
            "price {price} exceeds the maximum of 99999999.99"
        )));
    }
    Ok(())
}

/// Builds a new product for `seller` from `draft`. Rating fields start at zero.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` if `seller` is not a seller account and
/// `DomainError::Validation` if the draft breaks a listing rule.
pub fn new_listing(
    seller: &Account,
    draft: ProductDraft,
    now: DateTime<Utc>,
) -> Result<Product, DomainError> {
    seller.ensure_role(AccountRole::Seller)?;

    let name = draft.name.trim().to_owned();
    if name.is_empty() {
        return Err(DomainError::Validation("product name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::Validation(format!(
            "product name exceeds {MAX_NAME_LEN} characters"
        )));
    }
    validate_price(draft.price)?;
    if !draft.available_quantity.is_finite() || draft.available_quantity < 0.0 {
        return Err(DomainError::Validation(
            "available quantity must be a non-negative number".into(),
        ));
    }
    let unit = draft.unit.trim();
    if unit.is_empty() || unit.chars().count() > MAX_UNIT_LEN {
        return Err(DomainError::Validation(format!(
            "unit must be 1 to {MAX_UNIT_LEN} characters"
        )));
    }

    Ok(Product {
        id: Uuid::new_v4(),
        seller_id: seller.id,
        name,
        description: draft.description,
        category: draft.category,
        price: draft.price,
        unit: unit.to_owned(),
        available_quantity: draft.available_quantity,
        in_stock: draft.in_stock,
        freshness: draft.freshness,
        image: draft.image.filter(|url| !url.trim().is_empty()),
        rating: Decimal::new(0, 2),
        total_ratings: 0,
        created_at: now,
        updated_at: now,
    })
}

/// Fails unless `actor` is the seller who owns `product`.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` for any other account.
pub fn ensure_owner(actor: &Account, product: &Product) -> Result<(), DomainError> {
    if actor.role == AccountRole::Seller && actor.id == product.seller_id {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "account {} does not own product {}",
            actor.id, product.id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmconnect_test_support::fixtures;
    use farmconnect_test_support::fixtures::money;

    fn draft(price: &str) -> ProductDraft {
        ProductDraft {
            name: "  Turmeric  ".to_owned(),
            description: "Sun dried".to_owned(),
            category: Category::Spices,
            price: money(price),
            unit: "per kg".to_owned(),
            available_quantity: 12.5,
            in_stock: true,
            freshness: Freshness::VeryFresh,
            image: Some(String::new()),
        }
    }

    #[test]
    fn test_new_listing_trims_name_and_zeroes_rating() {
        let seller = fixtures::seller();
        let now = Utc::now();

        let product = new_listing(&seller, draft("120.50"), now).unwrap();

        assert_eq!(product.name, "Turmeric");
        assert_eq!(product.seller_id, seller.id);
        assert_eq!(product.rating, Decimal::ZERO);
        assert_eq!(product.total_ratings, 0);
        assert_eq!(product.image, None);
        assert_eq!(product.created_at, now);
    }

    #[test]
    fn test_new_listing_rejects_buyer() {
        let buyer = fixtures::buyer();

        let result = new_listing(&buyer, draft("10.00"), Utc::now());

        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[test]
    fn test_validate_price_rejects_zero_and_fractions_of_a_cent() {
        assert!(validate_price(money("0")).is_err());
        assert!(validate_price(money("-1.00")).is_err());
        assert!(validate_price(money("1.005")).is_err());
        assert!(validate_price(money("1.500")).is_ok());
        assert!(validate_price(money("99999999.99")).is_ok());
        assert!(validate_price(money("100000000")).is_err());
    }

    #[test]
    fn test_new_listing_rejects_negative_quantity() {
        let seller = fixtures::seller();
        let mut bad = draft("10.00");
        bad.available_quantity = -1.0;

        let result = new_listing(&seller, bad, Utc::now());

        match result {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("quantity")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_ensure_owner_rejects_other_seller() {
        let owner = fixtures::seller();
        let other = fixtures::seller();
        let product = fixtures::product(owner.id, money("5.00"));

        assert!(ensure_owner(&owner, &product).is_ok());
        assert!(matches!(
            ensure_owner(&other, &product),
            Err(DomainError::Forbidden(_))
        ));
    }
}
