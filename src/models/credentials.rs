use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use super::Status;
use crate::entities::credentials;

/// Which account key a credential authenticates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierType {
    Username,
    Email,
}

impl IdentifierType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierType::Username => "username",
            IdentifierType::Email => "email",
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierType {
    type Err = DbErr;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "username" => Ok(IdentifierType::Username),
            "email" => Ok(IdentifierType::Email),
            other => Err(DbErr::Type(format!("unknown identifier type: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credential {
    pub credentials_id: Uuid,
    pub account_id: i64,
    pub identifier_type: IdentifierType,
    pub identifier: String,
    #[serde(skip_serializing)]
    pub passphrase: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<credentials::Model> for Credential {
    type Error = DbErr;

    fn try_from(model: credentials::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            credentials_id: model.credentials_id,
            account_id: model.account_id,
            identifier_type: model.identifier_type.parse()?,
            identifier: model.identifier,
            passphrase: model.passphrase,
            status: model
                .status
                .parse()
                .map_err(|err: super::UnknownStatus| DbErr::Type(err.to_string()))?,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

/// Insert payload; the id is generated by the caller before the write.
#[derive(Clone, Debug)]
pub struct NewCredential {
    pub credentials_id: Uuid,
    pub account_id: i64,
    pub identifier_type: IdentifierType,
    pub identifier: String,
    pub passphrase: String,
}
