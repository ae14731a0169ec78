//! Coupon rules.

use chrono::{DateTime, Utc};
use farmconnect_core::error::DomainError;
use farmconnect_core::records::{Account, AccountRole, Coupon};
use uuid::Uuid;

use super::commands::CreateCoupon;

/// Longest accepted coupon code.
pub const MAX_CODE_LEN: usize = 50;

/// Builds a coupon from `command`. Only admins may create coupons.
///
/// # Errors
///
/// Returns `DomainError::Forbidden` for non-admin actors and
/// `DomainError::Validation` for an empty or overlong code, a discount outside
/// `[0, 100]`, or an empty validity window.
pub fn new_coupon(actor: &Account, command: &CreateCoupon) -> Result<Coupon, DomainError> {
    actor.ensure_role(AccountRole::Admin)?;

    let code = command.code.trim();
    if code.is_empty() || code.len() > MAX_CODE_LEN {
        return Err(DomainError::Validation(format!(
            "coupon code must be 1 to {MAX_CODE_LEN} characters"
        )));
    }
    if !(0..=100).contains(&command.discount) {
        return Err(DomainError::Validation(format!(
            "discount must be between 0 and 100, got {}",
            command.discount
        )));
    }
    if command.valid_from >= command.valid_to {
        return Err(DomainError::Validation(
            "valid_from must be earlier than valid_to".into(),
        ));
    }

    Ok(Coupon {
        id: Uuid::new_v4(),
        code: code.to_owned(),
        valid_from: command.valid_from,
        valid_to: command.valid_to,
        discount: command.discount,
        active: command.active,
    })
}

/// Fails unless `coupon` is active and `now` lies inside its validity window
/// (both ends inclusive).
///
/// # Errors
///
/// Returns `DomainError::Validation` naming the reason.
pub fn ensure_redeemable(coupon: &Coupon, now: DateTime<Utc>) -> Result<(), DomainError> {
    if !coupon.active {
        return Err(DomainError::Validation(format!(
            "coupon {} is not active",
            coupon.code
        )));
    }
    if now < coupon.valid_from || now > coupon.valid_to {
        return Err(DomainError::Validation(format!(
            "coupon {} is not valid at {now}",
            coupon.code
        )));
    }
    Ok(())
}
