use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use fakestore_core::DomainError;
use fakestore_infra::StoreError;
use fakestore_products::QueryError;

use crate::app::dto::{ErrorBody, MessageBody};

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(MessageBody {
            message: PRODUCT_NOT_FOUND.to_string(),
        }),
    )
        .into_response()
}

pub fn store_error_to_response(err: StoreError) -> Response {
    match err {
        StoreError::InvalidId(_) => {
            tracing::warn!(error = %err, "rejected malformed product id");
            json_error(StatusCode::BAD_REQUEST, err.to_string())
        }
        StoreError::Backend(_) => {
            tracing::error!(error = %err, "product store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    tracing::warn!(error = %err, "rejected product request");
    json_error(StatusCode::BAD_REQUEST, err.to_string())
}

pub fn query_error_to_response(err: QueryError) -> Response {
    tracing::warn!(error = %err, "rejected listing query");
    json_error(StatusCode::BAD_REQUEST, err.to_string())
}

pub fn query_rejection_to_response(rejection: QueryRejection) -> Response {
    tracing::warn!(error = %rejection.body_text(), "rejected query string");
    json_error(StatusCode::BAD_REQUEST, rejection.body_text())
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> Response {
    tracing::warn!(error = %rejection.body_text(), "rejected request body");
    json_error(StatusCode::BAD_REQUEST, rejection.body_text())
}
