use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseTransaction, DbErr};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    context::Context,
    error::AccountsError,
    models::{
        Account, AccountChanges, AccountFilter, AccountUpdate, IdentifierType, NewCredential,
        Status, StatusFilter,
    },
    repo::{AccountsRepo, CredentialsRepo},
    service::{
        security::{HashError, HashingService},
        validation,
    },
};

#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Creates an account and its username and email credentials atomically.
    async fn sign_up(
        &self,
        ctx: &Context,
        username: &str,
        password: &str,
        email_address: &str,
    ) -> Result<Account, AccountsError>;
    async fn fetch_one(
        &self,
        ctx: &Context,
        filter: AccountFilter,
    ) -> Result<Account, AccountsError>;
    async fn fetch_all(
        &self,
        ctx: &Context,
        status: StatusFilter,
    ) -> Result<Vec<Account>, AccountsError>;
    /// Applies the fields of `update` that differ from the stored account.
    async fn partial_update(
        &self,
        ctx: &Context,
        account_id: i64,
        update: AccountUpdate,
    ) -> Result<Account, AccountsError>;
    /// Soft deletes the account and revokes every active credential it owns.
    async fn delete(&self, ctx: &Context, account_id: i64) -> Result<Account, AccountsError>;
}

#[derive(Debug, thiserror::Error)]
enum WriteError {
    #[error(transparent)]
    Db(#[from] DbErr),
    #[error(transparent)]
    Hash(#[from] HashError),
}

pub struct AccountsServiceImpl {
    hasher: Arc<dyn HashingService>,
}

impl AccountsServiceImpl {
    pub fn new(hasher: Arc<dyn HashingService>) -> Self {
        Self { hasher }
    }
}

async fn identity_taken<C: ConnectionTrait>(
    repo: &AccountsRepo<'_, C>,
    filter: AccountFilter,
) -> Result<bool, DbErr> {
    let filter = filter.with_status(StatusFilter::NotDeleted);
    Ok(repo.fetch_one(&filter).await?.is_some())
}

async fn create_account_txn(
    txn: &DatabaseTransaction,
    hasher: &dyn HashingService,
    username: &str,
    password: &str,
    email_address: &str,
) -> Result<Account, WriteError> {
    let accounts = AccountsRepo::new(txn);
    let credentials = CredentialsRepo::new(txn);

    let account = accounts
        .create(username, email_address, Status::Active)
        .await?;

    let passphrase = hasher.hash_password(password).await?;

    // One credential per identifier so either one can be used to log in.
    for (identifier_type, identifier) in [
        (IdentifierType::Username, username),
        (IdentifierType::Email, email_address),
    ] {
        credentials
            .create(NewCredential {
                credentials_id: Uuid::new_v4(),
                account_id: account.account_id,
                identifier_type,
                identifier: identifier.to_string(),
                passphrase: passphrase.clone(),
            })
            .await?;
    }

    Ok(account)
}

async fn revoke_credentials<C: ConnectionTrait>(
    credentials: &CredentialsRepo<'_, C>,
    account_id: i64,
) -> Result<usize, DbErr> {
    let active = credentials.fetch_all(account_id, Status::Active).await?;
    for credential in &active {
        if credentials.delete(credential.credentials_id).await?.is_none() {
            return Err(DbErr::RecordNotFound(format!(
                "credentials {} vanished during revocation",
                credential.credentials_id
            )));
        }
    }
    Ok(active.len())
}

async fn delete_account_txn(
    txn: &DatabaseTransaction,
    account_id: i64,
) -> Result<Option<(Account, usize)>, DbErr> {
    let Some(account) = AccountsRepo::new(txn).delete(account_id).await? else {
        return Ok(None);
    };

    let revoked = revoke_credentials(&CredentialsRepo::new(txn), account_id).await?;
    Ok(Some((account, revoked)))
}

/// Writes the account changes and keeps its credentials in step: renamed
/// identifiers follow the account, and a status of `deleted` revokes them.
async fn update_account_txn(
    txn: &DatabaseTransaction,
    account_id: i64,
    changes: AccountChanges,
) -> Result<Option<Account>, DbErr> {
    let credentials = CredentialsRepo::new(txn);
    let username = changes.username.clone();
    let email_address = changes.email_address.clone();
    let deleting = changes.status == Some(Status::Deleted);

    let Some(account) = AccountsRepo::new(txn)
        .partial_update(account_id, changes)
        .await?
    else {
        return Ok(None);
    };

    if let Some(username) = username {
        credentials
            .update_identifier(account_id, IdentifierType::Username, &username)
            .await?;
    }
    if let Some(email_address) = email_address {
        credentials
            .update_identifier(account_id, IdentifierType::Email, &email_address)
            .await?;
    }
    if deleting {
        revoke_credentials(&credentials, account_id).await?;
    }

    Ok(Some(account))
}

async fn rollback(txn: DatabaseTransaction) {
    if let Err(err) = txn.rollback().await {
        error!(error = %err, "transaction rollback failed");
    }
}

async fn cached_account(ctx: &Context, account_id: i64) -> Option<Account> {
    let cache = ctx.cache()?;
    match cache.get(account_id).await {
        Ok(account) => account,
        Err(err) => {
            warn!(account_id, error = %err, "account cache read failed");
            None
        }
    }
}

async fn cache_account(ctx: &Context, account: &Account) {
    let Some(cache) = ctx.cache() else {
        return;
    };
    if let Err(err) = cache.set(account).await {
        warn!(account_id = account.account_id, error = %err, "account cache write failed");
    }
}

async fn evict_account(ctx: &Context, account_id: i64) {
    let Some(cache) = ctx.cache() else {
        return;
    };
    if let Err(err) = cache.invalidate(account_id).await {
        warn!(account_id, error = %err, "account cache invalidation failed");
    }
}

/// Drops the cached copy unless it still matches storage. A writer that
/// committed and evicted between our read and our `set` leaves a stale entry.
async fn confirm_cached(ctx: &Context, filter: &AccountFilter, account: &Account) {
    match AccountsRepo::new(ctx.db()).fetch_one(filter).await {
        Ok(Some(current)) if current == *account => {}
        Ok(_) => evict_account(ctx, account.account_id).await,
        Err(err) => {
            warn!(
                account_id = account.account_id,
                error = %err,
                "account cache recheck failed"
            );
            evict_account(ctx, account.account_id).await;
        }
    }
}

#[async_trait]
impl AccountsService for AccountsServiceImpl {
    async fn sign_up(
        &self,
        ctx: &Context,
        username: &str,
        password: &str,
        email_address: &str,
    ) -> Result<Account, AccountsError> {
        if !validation::validate_username(username) {
            return Err(AccountsError::UsernameInvalid);
        }
        if !validation::validate_password(password) {
            return Err(AccountsError::PasswordInvalid);
        }
        if !validation::validate_email(email_address) {
            return Err(AccountsError::EmailAddressInvalid);
        }

        let lookup_failed = |err: DbErr| {
            error!(error = %err, "unable to check account identity");
            AccountsError::CannotCreate
        };
        let accounts = AccountsRepo::new(ctx.db());
        if identity_taken(&accounts, AccountFilter::by_email_address(email_address))
            .await
            .map_err(lookup_failed)?
        {
            return Err(AccountsError::EmailAddressExists);
        }
        if identity_taken(&accounts, AccountFilter::by_username(username))
            .await
            .map_err(lookup_failed)?
        {
            return Err(AccountsError::UsernameExists);
        }

        let txn = ctx.transaction().await.map_err(|err| {
            error!(error = %err, "unable to open transaction for account creation");
            AccountsError::CannotCreate
        })?;

        match create_account_txn(&txn, self.hasher.as_ref(), username, password, email_address)
            .await
        {
            Ok(account) => {
                txn.commit().await.map_err(|err| {
                    error!(error = %err, "unable to commit account creation");
                    AccountsError::CannotCreate
                })?;
                info!(account_id = account.account_id, "account created");
                Ok(account)
            }
            Err(err) => {
                error!(error = %err, "unable to create account");
                rollback(txn).await;
                Err(AccountsError::CannotCreate)
            }
        }
    }

    async fn fetch_one(
        &self,
        ctx: &Context,
        filter: AccountFilter,
    ) -> Result<Account, AccountsError> {
        let cache_key = filter.active_id_lookup();
        if let Some(account_id) = cache_key {
            if let Some(account) = cached_account(ctx, account_id).await {
                return Ok(account);
            }
        }

        let account = AccountsRepo::new(ctx.db())
            .fetch_one(&filter)
            .await
            .map_err(|err| {
                error!(error = %err, "unable to fetch account");
                AccountsError::CannotFetch
            })?
            .ok_or(AccountsError::NotFound)?;

        if cache_key.is_some() && ctx.cache().is_some() {
            cache_account(ctx, &account).await;
            confirm_cached(ctx, &filter, &account).await;
        }
        Ok(account)
    }

    async fn fetch_all(
        &self,
        ctx: &Context,
        status: StatusFilter,
    ) -> Result<Vec<Account>, AccountsError> {
        AccountsRepo::new(ctx.db())
            .fetch_all(status)
            .await
            .map_err(|err| {
                error!(error = %err, "unable to list accounts");
                AccountsError::CannotFetch
            })
    }

    async fn partial_update(
        &self,
        ctx: &Context,
        account_id: i64,
        update: AccountUpdate,
    ) -> Result<Account, AccountsError> {
        let lookup_failed = |err: DbErr| {
            error!(account_id, error = %err, "unable to load account for update");
            AccountsError::CannotUpdate
        };
        let accounts = AccountsRepo::new(ctx.db());

        let current = accounts
            .fetch_one(&AccountFilter::by_id(account_id).with_status(StatusFilter::NotDeleted))
            .await
            .map_err(lookup_failed)?
            .ok_or(AccountsError::NotFound)?;

        let new_status = update.status();
        let mut changes = AccountChanges::default();

        if let Some(username) = update.username.filter(|value| *value != current.username) {
            if !validation::validate_username(&username) {
                return Err(AccountsError::UsernameInvalid);
            }
            if identity_taken(&accounts, AccountFilter::by_username(username.as_str()))
                .await
                .map_err(lookup_failed)?
            {
                return Err(AccountsError::UsernameExists);
            }
            changes.username = Some(username);
        }

        if let Some(email_address) = update
            .email_address
            .filter(|value| *value != current.email_address)
        {
            if !validation::validate_email(&email_address) {
                return Err(AccountsError::EmailAddressInvalid);
            }
            if identity_taken(&accounts, AccountFilter::by_email_address(email_address.as_str()))
                .await
                .map_err(lookup_failed)?
            {
                return Err(AccountsError::EmailAddressExists);
            }
            changes.email_address = Some(email_address);
            // A new address has not been verified yet.
            changes.email_address_verified_at = Some(None);
        }

        if let Some(status) = new_status.filter(|value| *value != current.status) {
            changes.status = Some(status);
        }

        if changes.is_empty() {
            return Ok(current);
        }

        let txn = ctx.transaction().await.map_err(|err| {
            error!(account_id, error = %err, "unable to open transaction for account update");
            AccountsError::CannotUpdate
        })?;

        match update_account_txn(&txn, account_id, changes).await {
            Ok(Some(updated)) => {
                txn.commit().await.map_err(|err| {
                    error!(account_id, error = %err, "unable to commit account update");
                    AccountsError::CannotUpdate
                })?;
                evict_account(ctx, account_id).await;
                info!(account_id, status = %updated.status, "account updated");
                Ok(updated)
            }
            Ok(None) => {
                rollback(txn).await;
                Err(AccountsError::NotFound)
            }
            Err(err) => {
                error!(account_id, error = %err, "unable to update account");
                rollback(txn).await;
                Err(AccountsError::CannotUpdate)
            }
        }
    }

    async fn delete(&self, ctx: &Context, account_id: i64) -> Result<Account, AccountsError> {
        let txn = ctx.transaction().await.map_err(|err| {
            error!(account_id, error = %err, "unable to open transaction for account deletion");
            AccountsError::CannotDelete
        })?;

        match delete_account_txn(&txn, account_id).await {
            Ok(Some((account, revoked))) => {
                txn.commit().await.map_err(|err| {
                    error!(account_id, error = %err, "unable to commit account deletion");
                    AccountsError::CannotDelete
                })?;
                evict_account(ctx, account_id).await;
                info!(account_id, revoked_credentials = revoked, "account deleted");
                Ok(account)
            }
            Ok(None) => {
                rollback(txn).await;
                Err(AccountsError::NotFound)
            }
            Err(err) => {
                error!(account_id, error = %err, "unable to delete account");
                rollback(txn).await;
                Err(AccountsError::CannotDelete)
            }
        }
    }
}
