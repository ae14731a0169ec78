use async_trait::async_trait;
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Account, AdminVerification};
use farmconnect_core::repository::AccountRepository;
use uuid::Uuid;

use crate::pg_store::{PgStore, db_error};
use crate::rows::{ACCOUNT_COLUMNS, AccountRow};

#[async_trait]
impl AccountRepository for PgStore {
    async fn insert_account(&self, account: &Account) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO accounts \
             (id, username, role, phone, location, address, is_verified, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(account.role.as_str())
        .bind(&account.phone)
        .bind(account.location.as_deref())
        .bind(account.address.as_deref())
        .bind(account.is_verified)
        .bind(account.created_at)
        .execute(self.pool())
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn find_account(&self, account_id: Uuid) -> Result<Option<Account>, DomainError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
        let row: Option<AccountRow> = sqlx::query_as(&sql)
            .bind(account_id)
            .fetch_optional(self.pool())
            .await
            .map_err(db_error)?;
        row.map(Account::try_from).transpose()
    }

    async fn record_verification(
        &self,
        verification: &AdminVerification,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;

        let updated = sqlx::query("UPDATE accounts SET is_verified = $2 WHERE id = $1")
            .bind(verification.account_id)
            .bind(verification.approved)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        if updated.rows_affected() == 0 {
            return Err(DomainError::not_found("account", verification.account_id));
        }

        sqlx::query(
            "INSERT INTO admin_verifications \
             (id, account_id, approved, rejection_reason, reviewed_by, reviewed_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(verification.id)
        .bind(verification.account_id)
        .bind(verification.approved)
        .bind(&verification.rejection_reason)
        .bind(verification.reviewed_by)
        .bind(verification.reviewed_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)
    }
}
