pub mod accounts;
pub mod health;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AccountsError;

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

fn status_for(err: AccountsError) -> StatusCode {
    match err {
        AccountsError::UsernameInvalid
        | AccountsError::PasswordInvalid
        | AccountsError::EmailAddressInvalid => StatusCode::BAD_REQUEST,
        AccountsError::EmailAddressExists | AccountsError::UsernameExists => StatusCode::CONFLICT,
        AccountsError::NotFound => StatusCode::NOT_FOUND,
        AccountsError::CannotCreate
        | AccountsError::CannotDelete
        | AccountsError::CannotUpdate
        | AccountsError::CannotFetch => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(err: AccountsError) -> Response {
    (
        status_for(err),
        Json(ErrorResponse {
            code: err.code().to_string(),
            message: err.to_string(),
        }),
    )
        .into_response()
}
