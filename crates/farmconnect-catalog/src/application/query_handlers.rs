//! Query handlers for the Catalog context.

use farmconnect_core::clock::Clock;
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Category, Product};
use farmconnect_core::repository::{CouponRepository, ProductRepository};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::coupon;

/// A selectable product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    /// Stored value.
    pub value: &'static str,
    /// Display label.
    pub label: &'static str,
}

/// Result of checking a coupon code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CouponView {
    /// Coupon code.
    pub code: String,
    /// Discount percentage.
    pub discount: i32,
}

/// Retrieves a product by ID.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the product does not exist.
pub async fn get_product(
    product_id: Uuid,
    repo: &dyn ProductRepository,
) -> Result<Product, DomainError> {
    repo.find_product(product_id)
        .await?
        .ok_or_else(|| DomainError::not_found("product", product_id))
}

/// Lists the whole catalog ordered by name.
///
/// # Errors
///
/// Returns the repository error.
pub async fn list_products(repo: &dyn ProductRepository) -> Result<Vec<Product>, DomainError> {
    repo.list_products().await
}

/// Every product category in display order.
#[must_use]
pub fn categories() -> Vec<CategoryView> {
    Category::ALL
        .iter()
        .map(|category| CategoryView {
            value: category.as_str(),
            label: category.label(),
        })
        .collect()
}

/// Looks up a coupon and checks it can be redeemed now.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown code and
/// `DomainError::Validation` for an inactive or expired coupon.
pub async fn validate_coupon(
    code: &str,
    clock: &dyn Clock,
    repo: &dyn CouponRepository,
) -> Result<CouponView, DomainError> {
    let code = code.trim();
    let found = repo
        .find_coupon(code)
        .await?
        .ok_or_else(|| DomainError::not_found("coupon", code))?;
    coupon::ensure_redeemable(&found, clock.now())?;
    Ok(CouponView {
        code: found.code,
        discount: found.discount,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use farmconnect_core::records::Coupon;
    use farmconnect_core::repository::CouponRepository;
    use farmconnect_test_support::fixtures::{self, money};
    use farmconnect_test_support::{FailingStore, FixedClock, InMemoryStore};

    use super::*;

    fn coupon(clock: &FixedClock, active: bool) -> Coupon {
        Coupon {
            id: Uuid::new_v4(),
            code: "MONSOON15".to_owned(),
            valid_from: clock.0 - Duration::days(1),
            valid_to: clock.0 + Duration::days(1),
            discount: 15,
            active,
        }
    }

    #[tokio::test]
    async fn test_get_product_returns_stored_product() {
        let store = InMemoryStore::new();
        let product = fixtures::product(Uuid::new_v4(), money("42.00"));
        store.seed_product(&product);

        let found = get_product(product.id, &store).await.unwrap();

        assert_eq!(found, product);
    }

    #[tokio::test]
    async fn test_get_product_returns_not_found() {
        let store = InMemoryStore::new();

        let result = get_product(Uuid::new_v4(), &store).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_products_orders_by_name() {
        // Arrange
        let store = InMemoryStore::new();
        let seller_id = Uuid::new_v4();
        let mut rice = fixtures::product(seller_id, money("60.00"));
        rice.name = "Rice".to_owned();
        let mut atta = fixtures::product(seller_id, money("45.00"));
        atta.name = "Atta".to_owned();
        store.seed_product(&rice);
        store.seed_product(&atta);

        // Act
        let names: Vec<String> = list_products(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();

        // Assert
        assert_eq!(names, vec!["Atta".to_owned(), "Rice".to_owned()]);
    }

    #[tokio::test]
    async fn test_list_products_propagates_failure() {
        let result = list_products(&FailingStore).await;
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[test]
    fn test_categories_lists_every_category() {
        let all = categories();

        assert_eq!(all.len(), 5);
        assert_eq!(
            all[0],
            CategoryView {
                value: "spices",
                label: "Spices"
            }
        );
    }

    #[tokio::test]
    async fn test_validate_coupon_accepts_active_coupon_in_window() {
        let store = InMemoryStore::new();
        let clock = FixedClock::standard();
        store.insert_coupon(&coupon(&clock, true)).await.unwrap();

        let view = validate_coupon(" MONSOON15 ", &clock, &store).await.unwrap();

        assert_eq!(
            view,
            CouponView {
                code: "MONSOON15".to_owned(),
                discount: 15
            }
        );
    }

    #[tokio::test]
    async fn test_validate_coupon_rejects_inactive_coupon() {
        let store = InMemoryStore::new();
        let clock = FixedClock::standard();
        store.insert_coupon(&coupon(&clock, false)).await.unwrap();

        let result = validate_coupon("MONSOON15", &clock, &store).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_validate_coupon_returns_not_found_for_unknown_code() {
        let store = InMemoryStore::new();

        let result = validate_coupon("NOPE", &FixedClock::standard(), &store).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
