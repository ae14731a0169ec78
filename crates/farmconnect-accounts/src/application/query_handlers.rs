//! Query handlers for the Accounts context.

use farmconnect_core::error::DomainError;
use farmconnect_core::records::Account;
use farmconnect_core::repository::AccountRepository;
use uuid::Uuid;

/// Retrieves an account by ID.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the account does not exist.
pub async fn get_account(
    account_id: Uuid,
    repo: &dyn AccountRepository,
) -> Result<Account, DomainError> {
    repo.find_account(account_id)
        .await?
        .ok_or_else(|| DomainError::not_found("account", account_id))
}
