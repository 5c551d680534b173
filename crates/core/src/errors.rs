use thiserror::Error;

/// First failed check when mapping an inbound customer payload.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is mandatory field")]
    MissingField { field: &'static str },
    #[error("passport.number should be 10 characters long")]
    PassportNumberLength,
    #[error("wrong format for {field}. DD-MM-YYYY expected")]
    DateFormat { field: &'static str },
}

/// Failures reported by a customer store.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("customer with such generated id or passport number already exist")]
    Duplicate,
    #[error("store failure: {0}")]
    Backend(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Infrastructure,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("customer with such passport number already exist")]
    DuplicateCustomer,
    #[error("customer with such id not found")]
    CustomerNotFound,
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl ApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::DuplicateCustomer => ErrorKind::Conflict,
            Self::CustomerNotFound => ErrorKind::NotFound,
            Self::Persistence(_) => ErrorKind::Infrastructure,
        }
    }

    /// Validation and conflict errors are expected control flow; everything
    /// else is a fault worth reporting.
    pub fn is_client_error(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Infrastructure)
    }
}

impl From<StoreError> for ApplicationError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate => Self::DuplicateCustomer,
            StoreError::Backend(message) => Self::Persistence(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, ErrorKind, StoreError, ValidationError};

    #[test]
    fn validation_messages_name_the_offending_field() {
        assert_eq!(
            ValidationError::MissingField { field: "address.city" }.to_string(),
            "address.city is mandatory field"
        );
        assert_eq!(
            ValidationError::DateFormat { field: "passport.issue_date" }.to_string(),
            "wrong format for passport.issue_date. DD-MM-YYYY expected"
        );
    }

    #[test]
    fn validation_error_keeps_its_message_through_application_error() {
        let error = ApplicationError::from(ValidationError::PassportNumberLength);

        assert_eq!(error.kind(), ErrorKind::Validation);
        assert_eq!(error.to_string(), "passport.number should be 10 characters long");
    }

    #[test]
    fn store_duplicate_maps_to_conflict() {
        let error = ApplicationError::from(StoreError::Duplicate);

        assert_eq!(error, ApplicationError::DuplicateCustomer);
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert!(error.is_client_error());
    }

    #[test]
    fn store_backend_failure_maps_to_infrastructure() {
        let error = ApplicationError::from(StoreError::Backend("database is locked".to_owned()));

        assert_eq!(error.kind(), ErrorKind::Infrastructure);
        assert!(!error.is_client_error());
    }

    #[test]
    fn not_found_is_its_own_kind() {
        assert_eq!(ApplicationError::CustomerNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(ApplicationError::CustomerNotFound.to_string(), "customer with such id not found");
    }
}
