use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};

use super::Status;
use crate::entities::accounts;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: i64,
    pub username: String,
    pub email_address: String,
    pub status: Status,
    pub email_address_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<accounts::Model> for Account {
    type Error = DbErr;

    fn try_from(model: accounts::Model) -> Result<Self, Self::Error> {
        let status = model
            .status
            .parse::<Status>()
            .map_err(|err| DbErr::Type(err.to_string()))?;

        Ok(Self {
            account_id: model.account_id,
            username: model.username,
            email_address: model.email_address,
            status,
            email_address_verified_at: model
                .email_address_verified_at
                .map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

/// Status constraint applied by account lookups.
///
/// The default only matches active accounts; `Any` disables the constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    Only(Status),
    /// Every status except `deleted`; the scope identity uniqueness applies to.
    NotDeleted,
    Any,
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::Only(Status::Active)
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        StatusFilter::Only(status)
    }
}

/// Point lookup filters. Unset fields match any value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub account_id: Option<i64>,
    pub username: Option<String>,
    pub email_address: Option<String>,
    pub status: StatusFilter,
}

impl AccountFilter {
    pub fn by_id(account_id: i64) -> Self {
        Self {
            account_id: Some(account_id),
            ..Default::default()
        }
    }

    pub fn by_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Default::default()
        }
    }

    pub fn by_email_address(email_address: impl Into<String>) -> Self {
        Self {
            email_address: Some(email_address.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<StatusFilter>) -> Self {
        self.status = status.into();
        self
    }

    /// The account id when the filter addresses one active account by id only.
    pub(crate) fn active_id_lookup(&self) -> Option<i64> {
        match self {
            AccountFilter {
                account_id: Some(account_id),
                username: None,
                email_address: None,
                status: StatusFilter::Only(Status::Active),
            } => Some(*account_id),
            _ => None,
        }
    }
}

/// Candidate fields for a partial update.
///
/// `status` is not reachable from self-service callers; it can only be set
/// through [`AccountUpdate::with_status`] by operational tooling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    pub username: Option<String>,
    pub email_address: Option<String>,
    status: Option<Status>,
}

impl AccountUpdate {
    /// Profile-only update; status stays untouched.
    pub fn profile(username: Option<String>, email_address: Option<String>) -> Self {
        Self {
            username,
            email_address,
            status: None,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }
}

/// Column-level change set written by the accounts repository.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub email_address: Option<String>,
    pub email_address_verified_at: Option<Option<DateTime<Utc>>>,
    pub status: Option<Status>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email_address.is_none()
            && self.email_address_verified_at.is_none()
            && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_only_matches_active_accounts() {
        let filter = AccountFilter::default();
        assert_eq!(filter.status, StatusFilter::Only(Status::Active));
        assert_eq!(AccountFilter::by_id(7).active_id_lookup(), Some(7));
        assert_eq!(
            AccountFilter::by_id(7)
                .with_status(StatusFilter::Any)
                .active_id_lookup(),
            None
        );
    }

    #[test]
    fn status_is_only_set_through_the_private_path() {
        let update = AccountUpdate {
            username: Some("bob".to_string()),
            ..Default::default()
        };
        assert_eq!(update.status(), None);
        assert_eq!(
            update.with_status(Status::Suspended).status(),
            Some(Status::Suspended)
        );
    }
}
