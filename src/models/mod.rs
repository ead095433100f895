pub mod accounts;
pub mod credentials;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

pub use accounts::{Account, AccountChanges, AccountFilter, AccountUpdate, StatusFilter};
pub use credentials::{Credential, IdentifierType, NewCredential};

/// Lifecycle state shared by accounts and credentials.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Suspended,
    Deleted,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Suspended => "suspended",
            Status::Deleted => "deleted",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Status::Active),
            "suspended" => Ok(Status::Suspended),
            "deleted" => Ok(Status::Deleted),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_its_own_rendering() {
        for status in [Status::Active, Status::Suspended, Status::Deleted] {
            assert_eq!(status.as_str().parse::<Status>().ok(), Some(status));
        }
        assert!("banned".parse::<Status>().is_err());
    }
}
