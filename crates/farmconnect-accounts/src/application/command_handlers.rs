//! Command handlers for the Accounts context.

use farmconnect_core::clock::Clock;
use farmconnect_core::command::Command;
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Account, AdminVerification};
use farmconnect_core::repository::AccountRepository;
use tracing::info;

use crate::domain::account;
use crate::domain::commands::{RegisterAccount, ReviewVerification};

/// Handles the `RegisterAccount` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` for invalid fields or a username or phone
/// that is already registered, or the repository error.
pub async fn handle_register_account(
    command: &RegisterAccount,
    clock: &dyn Clock,
    repo: &dyn AccountRepository,
) -> Result<Account, DomainError> {
    let new = account::new_account(command, clock.now())?;
    repo.insert_account(&new).await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        account_id = %new.id,
        role = %new.role,
        "account registered"
    );
    Ok(new)
}

/// Handles the `ReviewVerification` command: records the review and updates
/// the account's verified flag.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` if `reviewer` is not an admin,
/// `DomainError::Validation` for a rejection without reason,
/// `DomainError::NotFound` for an unknown account, or the repository error.
pub async fn handle_review_verification(
    command: &ReviewVerification,
    reviewer: &Account,
    clock: &dyn Clock,
    repo: &dyn AccountRepository,
) -> Result<AdminVerification, DomainError> {
    let review = account::new_review(reviewer, command, clock.now())?;
    if repo.find_account(command.account_id).await?.is_none() {
        return Err(DomainError::not_found("account", command.account_id));
    }
    repo.record_verification(&review).await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        account_id = %review.account_id,
        approved = review.approved,
        reviewed_by = %review.reviewed_by,
        "account reviewed"
    );
    Ok(review)
}
