//! Command handlers for the Catalog context.
//!
//! Each handler validates the command against the domain rules and persists
//! the result through a repository.

use farmconnect_core::clock::Clock;
use farmconnect_core::command::Command;
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Account, Coupon, Product};
use farmconnect_core::repository::{CouponRepository, ProductRepository};
use tracing::info;

use crate::domain::commands::{ChangePrice, CreateCoupon, CreateProduct};
use crate::domain::{coupon, product};

/// Handles the `CreateProduct` command: validates the listing and stores it.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` if `actor` is not a seller,
/// `DomainError::Validation` for an invalid listing, or the repository error.
pub async fn handle_create_product(
    command: &CreateProduct,
    actor: &Account,
    clock: &dyn Clock,
    repo: &dyn ProductRepository,
) -> Result<Product, DomainError> {
    let listing = product::new_listing(actor, command.draft.clone(), clock.now())?;
    repo.insert_product(&listing).await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        product_id = %listing.id,
        "product listed"
    );
    Ok(listing)
}

/// Handles the `ChangePrice` command. Orders already placed keep the price
/// they were placed at.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown product,
/// `DomainError::Forbidden` if `actor` does not own it,
/// `DomainError::Validation` for an invalid price, or the repository error.
pub async fn handle_change_price(
    command: &ChangePrice,
    actor: &Account,
    clock: &dyn Clock,
    repo: &dyn ProductRepository,
) -> Result<Product, DomainError> {
    let mut current = repo
        .find_product(command.product_id)
        .await?
        .ok_or_else(|| DomainError::not_found("product", command.product_id))?;
    product::ensure_owner(actor, &current)?;
    product::validate_price(command.price)?;

    let now = clock.now();
    repo.update_price(current.id, command.price, now).await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        product_id = %current.id,
        old_price = %current.price,
        new_price = %command.price,
        "product price changed"
    );
    current.price = command.price;
    current.updated_at = now;
    Ok(current)
}

/// Handles the `CreateCoupon` command.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` for non-admin actors,
/// `DomainError::Validation` for invalid coupon data or a taken code, or the
/// repository error.
pub async fn handle_create_coupon(
    command: &CreateCoupon,
    actor: &Account,
    repo: &dyn CouponRepository,
) -> Result<Coupon, DomainError> {
    let new = coupon::new_coupon(actor, command)?;
    repo.insert_coupon(&new).await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        code = %new.code,
        "coupon created"
    );
    Ok(new)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use farmconnect_core::error::DomainError;
    use farmconnect_core::records::{Category, Freshness};
    use farmconnect_core::repository::ProductRepository;
    use farmconnect_test_support::fixtures::{self, money};
    use farmconnect_test_support::{FailingStore, FixedClock, InMemoryStore};
    use uuid::Uuid;

    use super::*;
    use crate::domain::product::ProductDraft;

    fn create_command(price: &str) -> CreateProduct {
        CreateProduct {
            correlation_id: Uuid::new_v4(),
            draft: ProductDraft {
                name: "Mustard Oil".to_owned(),
                description: "Cold pressed".to_owned(),
                category: Category::Oils,
                price: money(price),
                unit: "per liter".to_owned(),
                available_quantity: 40.0,
                in_stock: true,
                freshness: Freshness::Fresh,
                image: None,
            },
        }
    }

    #[tokio::test]
    async fn test_handle_create_product_persists_listing() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::standard();
        let seller = fixtures::seller();

        // Act
        let product = handle_create_product(&create_command("180.00"), &seller, &clock, &store)
            .await
            .unwrap();

        // Assert
        let stored = store.find_product(product.id).await.unwrap().unwrap();
        assert_eq!(stored, product);
        assert_eq!(stored.created_at, clock.0);
    }

    #[tokio::test]
    async fn test_handle_create_product_propagates_repository_failure() {
        let clock = FixedClock::standard();
        let seller = fixtures::seller();

        let result =
            handle_create_product(&create_command("1.00"), &seller, &clock, &FailingStore).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_handle_change_price_leaves_rating_untouched() {
        // Arrange
        let store = InMemoryStore::new();
        let clock = FixedClock::standard();
        let seller = fixtures::seller();
        let mut listed = fixtures::product(seller.id, money("50.00"));
        listed.rating = money("4.50");
        listed.total_ratings = 2;
        store.seed_product(&listed);
        let command = ChangePrice {
            correlation_id: Uuid::new_v4(),
            product_id: listed.id,
            price: money("55.00"),
        };

        // Act
        let updated = handle_change_price(&command, &seller, &clock, &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(updated.price, money("55.00"));
        let stored = store.product(listed.id).unwrap();
        assert_eq!(stored.price, money("55.00"));
        assert_eq!(stored.rating, money("4.50"));
        assert_eq!(stored.total_ratings, 2);
    }

    #[tokio::test]
    async fn test_handle_change_price_rejects_non_owner() {
        let store = InMemoryStore::new();
        let clock = FixedClock::standard();
        let owner = fixtures::seller();
        let listed = fixtures::product(owner.id, money("50.00"));
        store.seed_product(&listed);
        let command = ChangePrice {
            correlation_id: Uuid::new_v4(),
            product_id: listed.id,
            price: money("1.00"),
        };

        let result = handle_change_price(&command, &fixtures::seller(), &clock, &store).await;

        assert!(matches!(result, Err(DomainError::Forbidden(_))));
        assert_eq!(store.product(listed.id).unwrap().price, money("50.00"));
    }

    #[tokio::test]
    async fn test_handle_change_price_returns_not_found_for_unknown_product() {
        let store = InMemoryStore::new();
        let command = ChangePrice {
            correlation_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            price: money("1.00"),
        };

        let result = handle_change_price(
            &command,
            &fixtures::seller(),
            &FixedClock::standard(),
            &store,
        )
        .await;

        match result {
            Err(DomainError::NotFound { entity, .. }) => assert_eq!(entity, "product"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_create_coupon_rejects_duplicate_code() {
        // Arrange
        let store = InMemoryStore::new();
        let admin = fixtures::admin();
        let now = Utc::now();
        let command = CreateCoupon {
            correlation_id: Uuid::new_v4(),
            code: "FRESH5".to_owned(),
            valid_from: now,
            valid_to: now + Duration::days(7),
            discount: 5,
            active: true,
        };
        handle_create_coupon(&command, &admin, &store).await.unwrap();

        // Act
        let result = handle_create_coupon(&command, &admin, &store).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
