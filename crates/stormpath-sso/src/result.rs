//! The immutable result of a validated SSO callback.

use std::str::FromStr;

use crate::SsoError;

/// The outcome the identity service asserts for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountResultStatus {
    /// The user authenticated against an existing account.
    Authenticated,
    /// The user logged out.
    Logout,
    /// The user registered a new account.
    Registered,
}

impl FromStr for AccountResultStatus {
    type Err = SsoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AUTHENTICATED" => Ok(Self::Authenticated),
            "LOGOUT" => Ok(Self::Logout),
            "REGISTERED" => Ok(Self::Registered),
            other => Err(SsoError::UnknownStatus(other.to_owned())),
        }
    }
}

/// A validated SSO callback result.
///
/// Built once per callback invocation from validated claims; immutable
/// afterwards. The account reference is present for every status except a
/// logout without a prior session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountResult {
    account_href: Option<String>,
    state: Option<String>,
    is_new_account: bool,
    status: AccountResultStatus,
}

impl AccountResult {
    pub(crate) fn new(
        account_href: Option<String>,
        state: Option<String>,
        is_new_account: bool,
        status: AccountResultStatus,
    ) -> Self {
        Self {
            account_href,
            state,
            is_new_account,
            status,
        }
    }

    /// Reference to the account the result concerns, if any.
    #[must_use]
    pub fn account_href(&self) -> Option<&str> {
        self.account_href.as_deref()
    }

    /// The opaque state string the application passed through the flow.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Whether the account was created during this flow.
    #[must_use]
    pub fn is_new_account(&self) -> bool {
        self.is_new_account
    }

    /// The asserted outcome.
    #[must_use]
    pub fn status(&self) -> AccountResultStatus {
        self.status
    }
}
