//! Data access over the `accounts` and `credentials` tables.
//!
//! Repositories borrow any sea-orm connection, so the same queries run on the
//! pooled connection or inside a transaction opened from a [`crate::context::Context`].

pub mod accounts;
pub mod credentials;

pub use accounts::AccountsRepo;
pub use credentials::CredentialsRepo;
