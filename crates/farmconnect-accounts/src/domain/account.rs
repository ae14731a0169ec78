//! Registration and verification rules.

use chrono::{DateTime, Utc};
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Account, AccountRole, AdminVerification};
use uuid::Uuid;

use super::commands::{RegisterAccount, ReviewVerification};

/// Longest accepted username.
pub const MAX_USERNAME_LEN: usize = 150;

/// Longest accepted phone number.
pub const MAX_PHONE_LEN: usize = 15;

/// Longest accepted location.
pub const MAX_LOCATION_LEN: usize = 255;

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Builds an unverified account from `command`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an empty or overlong username, phone
/// or location.
pub fn new_account(command: &RegisterAccount, now: DateTime<Utc>) -> Result<Account, DomainError> {
    let username = command.username.trim();
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
        return Err(DomainError::Validation(format!(
            "username must be 1 to {MAX_USERNAME_LEN} characters"
        )));
    }
    let phone = command.phone.trim();
    if phone.is_empty() || phone.chars().count() > MAX_PHONE_LEN {
        return Err(DomainError::Validation(format!(
            "phone must be 1 to {MAX_PHONE_LEN} characters"
        )));
    }
    let location = non_blank(command.location.as_ref());
    if location
        .as_ref()
        .is_some_and(|l| l.chars().count() > MAX_LOCATION_LEN)
    {
        return Err(DomainError::Validation(format!(
            "location exceeds {MAX_LOCATION_LEN} characters"
        )));
    }

    Ok(Account {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        role: command.role,
        phone: phone.to_owned(),
        location,
        address: non_blank(command.address.as_ref()),
        is_verified: false,
        created_at: now,
    })
}

/// Builds the review record of `reviewer` for the account in `command`.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` if `reviewer` is not an admin and
/// `DomainError::Validation` when a rejection carries no reason.
pub fn new_review(
    reviewer: &Account,
    command: &ReviewVerification,
    now: DateTime<Utc>,
) -> Result<AdminVerification, DomainError> {
    reviewer.ensure_role(AccountRole::Admin)?;

    let reason = command.rejection_reason.trim();
    if !command.approved && reason.is_empty() {
        return Err(DomainError::Validation(
            "a rejection must state a reason".into(),
        ));
    }

    Ok(AdminVerification {
        id: Uuid::new_v4(),
        account_id: command.account_id,
        approved: command.approved,
        rejection_reason: if command.approved {
            String::new()
        } else {
            reason.to_owned()
        },
        reviewed_by: reviewer.id,
        reviewed_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmconnect_test_support::fixtures;

    fn register(username: &str) -> RegisterAccount {
        RegisterAccount {
            correlation_id: Uuid::new_v4(),
            username: username.to_owned(),
            role: AccountRole::Seller,
            phone: " 9876543210 ".to_owned(),
            location: Some("  ".to_owned()),
            address: Some("12 Market Road".to_owned()),
        }
    }

    fn review(approved: bool, reason: &str) -> ReviewVerification {
        ReviewVerification {
            correlation_id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            approved,
            rejection_reason: reason.to_owned(),
        }
    }

    #[test]
    fn test_new_account_normalizes_fields() {
        let now = Utc::now();

        let account = new_account(&register(" kisan "), now).unwrap();

        assert_eq!(account.username, "kisan");
        assert_eq!(account.phone, "9876543210");
        assert_eq!(account.location, None);
        assert_eq!(account.address.as_deref(), Some("12 Market Road"));
        assert!(!account.is_verified);
        assert_eq!(account.created_at, now);
    }

    #[test]
    fn test_new_account_rejects_blank_username() {
        let result = new_account(&register("   "), Utc::now());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_new_account_rejects_long_phone() {
        let mut command = register("kisan");
        command.phone = "1".repeat(MAX_PHONE_LEN + 1);

        let result = new_account(&command, Utc::now());

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_new_review_requires_admin() {
        let result = new_review(&fixtures::seller(), &review(true, ""), Utc::now());
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[test]
    fn test_new_review_rejection_needs_reason() {
        let result = new_review(&fixtures::admin(), &review(false, " "), Utc::now());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_new_review_approval_drops_reason() {
        let admin = fixtures::admin();

        let verification = new_review(&admin, &review(true, "stale"), Utc::now()).unwrap();

        assert!(verification.approved);
        assert!(verification.rejection_reason.is_empty());
        assert_eq!(verification.reviewed_by, admin.id);
    }
}
