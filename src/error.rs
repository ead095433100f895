/// Failures returned by the account use cases.
///
/// Storage details never travel in these values; they are logged where the
/// failure is caught.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AccountsError {
    #[error("username is invalid")]
    UsernameInvalid,
    #[error("password is invalid")]
    PasswordInvalid,
    #[error("email address is invalid")]
    EmailAddressInvalid,
    #[error("email address already exists")]
    EmailAddressExists,
    #[error("username already exists")]
    UsernameExists,
    #[error("account could not be created")]
    CannotCreate,
    #[error("account not found")]
    NotFound,
    #[error("account could not be deleted")]
    CannotDelete,
    #[error("account could not be updated")]
    CannotUpdate,
    #[error("account could not be fetched")]
    CannotFetch,
}

impl AccountsError {
    pub fn code(&self) -> &'static str {
        match self {
            AccountsError::UsernameInvalid => "accounts.username_invalid",
            AccountsError::PasswordInvalid => "accounts.password_invalid",
            AccountsError::EmailAddressInvalid => "accounts.email_address_invalid",
            AccountsError::EmailAddressExists => "accounts.email_address_exists",
            AccountsError::UsernameExists => "accounts.username_exists",
            AccountsError::CannotCreate => "accounts.cannot_create",
            AccountsError::NotFound => "accounts.not_found",
            AccountsError::CannotDelete => "accounts.cannot_delete",
            AccountsError::CannotUpdate => "accounts.cannot_update",
            AccountsError::CannotFetch => "accounts.cannot_fetch",
        }
    }
}
