use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use paysys_core::errors::{ApplicationError, ErrorKind, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    /// Body was not a JSON document of the expected shape.
    pub fn malformed_body() -> Self {
        Self::canonical(StatusCode::BAD_REQUEST)
    }

    pub fn not_found() -> Self {
        Self::canonical(StatusCode::NOT_FOUND)
    }

    pub fn internal() -> Self {
        Self::canonical(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Infrastructure failures are logged here with the operation and the
    /// customer they concern; their detail never reaches the client.
    pub fn from_application(
        error: ApplicationError,
        operation: &'static str,
        customer_id: Option<&str>,
    ) -> Self {
        if !error.is_client_error() {
            error!(
                event_name = "api.customer.failed",
                operation,
                customer_id = customer_id.unwrap_or("unknown"),
                error = %error,
                "customer operation failed"
            );
        }

        match error.kind() {
            ErrorKind::Validation => Self::new(StatusCode::BAD_REQUEST, error.to_string()),
            ErrorKind::Conflict => Self::new(StatusCode::CONFLICT, error.to_string()),
            ErrorKind::NotFound => Self::new(StatusCode::NOT_FOUND, error.to_string()),
            ErrorKind::Infrastructure => Self::internal(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn canonical(status: StatusCode) -> Self {
        Self::new(status, status.canonical_reason().unwrap_or("Unknown Error"))
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope {
            error: ErrorBody { status: self.status.as_u16(), message: self.message },
        };
        (self.status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use paysys_core::errors::{ApplicationError, ValidationError};

    use super::ApiError;

    #[test]
    fn canonical_errors_use_reason_phrases() {
        assert_eq!(ApiError::malformed_body().message(), "Bad Request");
        assert_eq!(ApiError::not_found().message(), "Not Found");
        assert_eq!(ApiError::internal().message(), "Internal Server Error");
    }

    #[test]
    fn application_errors_map_by_kind() {
        let validation = ApiError::from_application(
            ApplicationError::Validation(ValidationError::PassportNumberLength),
            "create",
            None,
        );
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.message(), "passport.number should be 10 characters long");

        let conflict = ApiError::from_application(ApplicationError::DuplicateCustomer, "create", None);
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(conflict.message(), "customer with such passport number already exist");

        let missing =
            ApiError::from_application(ApplicationError::CustomerNotFound, "update", Some("abc"));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.message(), "customer with such id not found");
    }

    #[test]
    fn persistence_detail_is_not_leaked() {
        let error = ApiError::from_application(
            ApplicationError::Persistence("disk I/O error at /var/lib/paysys.db".to_string()),
            "find",
            Some("abc"),
        );

        assert_eq!(error, ApiError::internal());
    }
}
