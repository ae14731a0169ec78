use async_trait::async_trait;
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Rating, RatingSummary, StarsSummarizer};
use farmconnect_core::repository::RatingRepository;
use sqlx::query_scalar;
use uuid::Uuid;

use crate::pg_store::{PgStore, db_error};
use crate::rows::RatingRow;

#[async_trait]
impl RatingRepository for PgStore {
    async fn insert_rating(&self, rating: &Rating) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO ratings \
             (id, buyer_id, seller_id, product_id, order_id, stars, feedback, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(rating.id)
        .bind(rating.buyer_id)
        .bind(rating.seller_id)
        .bind(rating.product_id)
        .bind(rating.order_id)
        .bind(rating.stars)
        .bind(&rating.feedback)
        .bind(rating.created_at)
        .execute(self.pool())
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn find_rating_for_order(&self, order_id: Uuid) -> Result<Option<Rating>, DomainError> {
        let row: Option<RatingRow> = sqlx::query_as(
            "SELECT id, buyer_id, seller_id, product_id, order_id, stars, feedback, created_at \
             FROM ratings WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_error)?;
        Ok(row.map(Rating::from))
    }

    async fn recompute_product_rating(
        &self,
        product_id: Uuid,
        summarize: StarsSummarizer,
    ) -> Result<RatingSummary, DomainError> {
        let mut tx = self.begin().await?;

        // Concurrent recomputes of one product queue on this lock.
        let locked: Option<Uuid> =
            query_scalar("SELECT id FROM products WHERE id = $1 FOR UPDATE")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error)?;
        if locked.is_none() {
            return Err(DomainError::not_found("product", product_id));
        }

        let stars: Vec<i32> = query_scalar("SELECT stars FROM ratings WHERE product_id = $1")
            .bind(product_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error)?;
        let summary = summarize(&stars);

        sqlx::query("UPDATE products SET rating = $2, total_ratings = $3 WHERE id = $1")
            .bind(product_id)
            .bind(summary.rating)
            .bind(summary.total_ratings)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(summary)
    }
}
