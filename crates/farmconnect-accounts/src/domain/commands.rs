//! Commands for the Accounts context.

use farmconnect_core::command::Command;
use farmconnect_core::records::AccountRole;
use uuid::Uuid;

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterAccount {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Desired login name.
    pub username: String,
    /// Requested role.
    pub role: AccountRole,
    /// Contact phone number.
    pub phone: String,
    /// Optional free-form location.
    pub location: Option<String>,
    /// Optional postal address.
    pub address: Option<String>,
}

impl Command for RegisterAccount {
    fn command_type(&self) -> &'static str {
        "accounts.register_account"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to approve or reject an account.
#[derive(Debug, Clone)]
pub struct ReviewVerification {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The reviewed account.
    pub account_id: Uuid,
    /// Whether the account is approved.
    pub approved: bool,
    /// Required when rejecting.
    pub rejection_reason: String,
}

impl Command for ReviewVerification {
    fn command_type(&self) -> &'static str {
        "accounts.review_verification"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
