use async_trait::async_trait;

use crate::domain::customer::{Customer, CustomerId};
use crate::errors::StoreError;

/// Persistence port for customer records.
///
/// Implementations must enforce uniqueness of both the generated id and the
/// passport number themselves and report a violation as
/// [`StoreError::Duplicate`].
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn create(&self, customer: &Customer) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, StoreError>;

    async fn find_by_passport_number(&self, number: &str)
        -> Result<Option<Customer>, StoreError>;

    /// Replaces every mutable column of the row keyed by `customer.generated_id`.
    async fn update(&self, customer: &Customer) -> Result<(), StoreError>;

    /// Deleting an unknown id is not an error.
    async fn delete(&self, id: &CustomerId) -> Result<(), StoreError>;
}
