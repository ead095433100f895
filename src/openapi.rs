use utoipa::OpenApi;

use crate::{
    handler,
    handler::{
        accounts::{AccountResponse, SignUpRequest, StatusParam, UpdateAccountRequest},
        health::Health,
        ErrorResponse,
    },
    models::Status,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handler::health::health,
        handler::accounts::sign_up,
        handler::accounts::list_accounts,
        handler::accounts::get_account,
        handler::accounts::update_account,
        handler::accounts::delete_account
    ),
    components(schemas(
        Health,
        SignUpRequest,
        UpdateAccountRequest,
        AccountResponse,
        ErrorResponse,
        Status,
        StatusParam
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "accounts", description = "Account lifecycle")
    )
)]
pub struct ApiDoc;
