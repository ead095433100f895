use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::{error_response, ErrorResponse};
use crate::{
    models::{Account, AccountFilter, AccountUpdate, Status, StatusFilter},
    state::AppState,
};

#[derive(Deserialize, ToSchema)]
pub struct SignUpRequest {
    pub username: String,
    pub password: String,
    pub email_address: String,
}

/// Self-service profile fields. `status` is deliberately absent.
#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateAccountRequest {
    pub username: Option<String>,
    pub email_address: Option<String>,
}

#[derive(Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusParam {
    Active,
    Suspended,
    Deleted,
    Any,
}

impl From<StatusParam> for StatusFilter {
    fn from(param: StatusParam) -> Self {
        match param {
            StatusParam::Active => StatusFilter::Only(Status::Active),
            StatusParam::Suspended => StatusFilter::Only(Status::Suspended),
            StatusParam::Deleted => StatusFilter::Only(Status::Deleted),
            StatusParam::Any => StatusFilter::Any,
        }
    }
}

#[derive(Deserialize, IntoParams)]
pub struct ListAccountsQuery {
    /// Defaults to `active`.
    pub status: Option<StatusParam>,
}

#[derive(Serialize, ToSchema)]
pub struct AccountResponse {
    pub account_id: i64,
    pub username: String,
    pub email_address: String,
    pub status: Status,
    pub email_address_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.account_id,
            username: account.username,
            email_address: account.email_address,
            status: account.status,
            email_address_verified_at: account.email_address_verified_at,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Created", body = AccountResponse),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 409, description = "Username or email address taken", body = ErrorResponse)
    ),
    tag = "accounts"
)]
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignUpRequest>,
) -> Response {
    let ctx = state.context();
    match state
        .accounts()
        .sign_up(
            &ctx,
            &payload.username,
            &payload.password,
            &payload.email_address,
        )
        .await
    {
        Ok(account) => (StatusCode::CREATED, Json(AccountResponse::from(account))).into_response(),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    params(ListAccountsQuery),
    responses(
        (status = 200, description = "Accounts", body = [AccountResponse])
    ),
    tag = "accounts"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAccountsQuery>,
) -> Response {
    let status = query.status.map(StatusFilter::from).unwrap_or_default();
    let ctx = state.context();
    match state.accounts().fetch_all(&ctx, status).await {
        Ok(accounts) => {
            let body: Vec<AccountResponse> = accounts.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}",
    params(
        ("account_id" = i64, Path, description = "Account id")
    ),
    responses(
        (status = 200, description = "Account", body = AccountResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "accounts"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
) -> Response {
    let ctx = state.context();
    match state
        .accounts()
        .fetch_one(&ctx, AccountFilter::by_id(account_id))
        .await
    {
        Ok(account) => Json(AccountResponse::from(account)).into_response(),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/accounts/{account_id}",
    request_body = UpdateAccountRequest,
    params(
        ("account_id" = i64, Path, description = "Account id")
    ),
    responses(
        (status = 200, description = "Updated", body = AccountResponse),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 409, description = "Username or email address taken", body = ErrorResponse)
    ),
    tag = "accounts"
)]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Response {
    let update = AccountUpdate::profile(payload.username, payload.email_address);

    let ctx = state.context();
    match state
        .accounts()
        .partial_update(&ctx, account_id, update)
        .await
    {
        Ok(account) => Json(AccountResponse::from(account)).into_response(),
        Err(err) => error_response(err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{account_id}",
    params(
        ("account_id" = i64, Path, description = "Account id")
    ),
    responses(
        (status = 200, description = "Deleted", body = AccountResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "accounts"
)]
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
) -> Response {
    let ctx = state.context();
    match state.accounts().delete(&ctx, account_id).await {
        Ok(account) => Json(AccountResponse::from(account)).into_response(),
        Err(err) => error_response(err),
    }
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/accounts", post(sign_up).get(list_accounts))
        .route(
            "/api/v1/accounts/:account_id",
            get(get_account).patch(update_account).delete(delete_account),
        )
        .with_state(state)
}
