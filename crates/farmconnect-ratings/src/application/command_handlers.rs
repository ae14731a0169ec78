//! Command handlers for the Ratings context.
//!
//! Recording a rating and recomputing the product score are separate steps:
//! `handle_record_rating` stores the rating and then calls
//! `handle_recompute_product_rating` for the rated product.

use farmconnect_core::clock::Clock;
use farmconnect_core::command::Command;
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Account, Rating, RatingSummary};
use farmconnect_core::repository::{OrderRepository, RatingRepository};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::commands::RecordRating;
use crate::domain::{aggregate, rating};

/// Result of recording a rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingRecorded {
    /// The stored rating.
    pub rating: Rating,
    /// The product score after the rating was counted.
    pub product_rating: RatingSummary,
}

/// Recomputes the mean rating and rating count of a product from every
/// rating stored for it and writes both onto the product.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown product or the repository
/// error.
pub async fn handle_recompute_product_rating(
    product_id: Uuid,
    repo: &dyn RatingRepository,
) -> Result<RatingSummary, DomainError> {
    let summary = repo
        .recompute_product_rating(product_id, aggregate::summarize)
        .await?;

    info!(
        product_id = %product_id,
        rating = %summary.rating,
        total_ratings = summary.total_ratings,
        "product rating recomputed"
    );
    Ok(summary)
}

/// Handles the `RecordRating` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown order,
/// `DomainError::Forbidden` when `buyer` did not place the order,
/// `DomainError::Validation` for invalid stars, a product outside the order or
/// an order that was already rated, or the repository error.
pub async fn handle_record_rating(
    command: &RecordRating,
    buyer: &Account,
    clock: &dyn Clock,
    orders: &dyn OrderRepository,
    ratings: &dyn RatingRepository,
) -> Result<RatingRecorded, DomainError> {
    let order = orders
        .find_order(command.order_id)
        .await?
        .ok_or_else(|| DomainError::not_found("order", command.order_id))?;
    let new = rating::new_rating(buyer, &order, command, clock.now())?;
    if ratings.find_rating_for_order(order.id).await?.is_some() {
        return Err(DomainError::Validation(format!(
            "order {} has already been rated",
            order.id
        )));
    }
    ratings.insert_rating(&new).await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        rating_id = %new.id,
        order_id = %new.order_id,
        product_id = %new.product_id,
        stars = new.stars,
        "rating recorded"
    );

    let product_rating = handle_recompute_product_rating(new.product_id, ratings).await?;
    Ok(RatingRecorded {
        rating: new,
        product_rating,
    })
}
