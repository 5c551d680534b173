use std::sync::Arc;

use crate::domain::customer::{normalize_passport_number, Customer, CustomerId};
use crate::errors::ApplicationError;
use crate::identifier::{generate_customer_id, Clock, SystemClock};
use crate::repository::CustomerRepository;

/// Create/find/update/delete orchestration on top of a [`CustomerRepository`].
#[derive(Clone)]
pub struct CustomerWorkflow {
    repository: Arc<dyn CustomerRepository>,
    clock: Arc<dyn Clock>,
}

impl CustomerWorkflow {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<dyn CustomerRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Assigns a fresh identifier and stores the customer. Returns the stored
    /// record with its identifier.
    ///
    /// The passport lookup only gives a friendlier early answer; concurrent
    /// creates are settled by the store's unique constraint, which surfaces as
    /// the same [`ApplicationError::DuplicateCustomer`].
    pub async fn create(&self, mut customer: Customer) -> Result<Customer, ApplicationError> {
        let existing = self.find_by_passport_number(&customer.passport.number).await?;
        if existing.is_some() {
            return Err(ApplicationError::DuplicateCustomer);
        }

        customer.generated_id = generate_customer_id(
            &customer.first_name,
            &customer.passport.number,
            self.clock.unix_timestamp(),
        );
        self.repository.create(&customer).await?;

        Ok(customer)
    }

    /// `Ok(None)` when nothing matches.
    pub async fn find(&self, id: &CustomerId) -> Result<Option<Customer>, ApplicationError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn find_by_passport_number(
        &self,
        number: &str,
    ) -> Result<Option<Customer>, ApplicationError> {
        let normalized = normalize_passport_number(number);
        Ok(self.repository.find_by_passport_number(&normalized).await?)
    }

    /// Full replace of the customer stored under `id`.
    pub async fn update(
        &self,
        mut customer: Customer,
        id: &CustomerId,
    ) -> Result<(), ApplicationError> {
        let existing = self.repository.find_by_id(id).await?;
        let Some(existing) = existing else {
            return Err(ApplicationError::CustomerNotFound);
        };

        customer.generated_id = id.clone();
        customer.uid = existing.uid;
        self.repository.update(&customer).await?;

        Ok(())
    }

    pub async fn delete(&self, id: &CustomerId) -> Result<(), ApplicationError> {
        Ok(self.repository.delete(id).await?)
    }
}
