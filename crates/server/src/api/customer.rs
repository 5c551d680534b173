use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use paysys_core::domain::customer::CustomerId;
use paysys_core::mapping::{customer_from_request, response_from_customer, CustomerBody};
use tracing::info;

use super::{ApiError, AppState};

/// Bodies are decoded by hand so a malformed document gets the JSON error
/// envelope instead of axum's plain-text rejection.
fn decode_body(body: &Bytes) -> Result<CustomerBody, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::malformed_body())
}

pub async fn create_customer(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CustomerBody>), ApiError> {
    let request = decode_body(&body)?;
    let customer = customer_from_request(&request)?;

    let stored = state
        .workflow
        .create(customer)
        .await
        .map_err(|error| ApiError::from_application(error, "create", None))?;

    info!(
        event_name = "api.customer.created",
        customer_id = %stored.generated_id,
        "customer created"
    );

    Ok((StatusCode::CREATED, Json(response_from_customer(&stored))))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerBody>, ApiError> {
    let id = CustomerId(id);
    let found = state
        .workflow
        .find(&id)
        .await
        .map_err(|error| ApiError::from_application(error, "find", Some(id.as_str())))?;

    match found {
        Some(customer) => Ok(Json(response_from_customer(&customer))),
        None => Err(ApiError::not_found()),
    }
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let request = decode_body(&body)?;
    let customer = customer_from_request(&request)?;
    let id = CustomerId(id);

    state
        .workflow
        .update(customer, &id)
        .await
        .map_err(|error| ApiError::from_application(error, "update", Some(id.as_str())))?;

    info!(event_name = "api.customer.updated", customer_id = %id, "customer updated");
    Ok(StatusCode::OK)
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = CustomerId(id);

    state
        .workflow
        .delete(&id)
        .await
        .map_err(|error| ApiError::from_application(error, "delete", Some(id.as_str())))?;

    info!(event_name = "api.customer.deleted", customer_id = %id, "customer deleted");
    Ok(StatusCode::NO_CONTENT)
}
