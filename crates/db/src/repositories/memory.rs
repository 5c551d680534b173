use std::collections::HashMap;

use tokio::sync::RwLock;

use paysys_core::domain::customer::{Customer, CustomerId};
use paysys_core::errors::StoreError;
use paysys_core::repository::CustomerRepository;

#[derive(Default)]
struct CustomerTable {
    rows: HashMap<String, Customer>,
    next_uid: i64,
}

impl CustomerTable {
    fn passport_taken_by_other(&self, customer: &Customer) -> bool {
        self.rows.values().any(|row| {
            row.passport.number == customer.passport.number
                && row.generated_id != customer.generated_id
        })
    }
}

/// Keeps the same uniqueness rules as the `customer` table: one row per
/// generated id and per passport number.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    table: RwLock<CustomerTable>,
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn create(&self, customer: &Customer) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        if table.rows.contains_key(customer.generated_id.as_str())
            || table.passport_taken_by_other(customer)
        {
            return Err(StoreError::Duplicate);
        }

        table.next_uid += 1;
        let mut row = customer.clone();
        row.uid = Some(table.next_uid);
        table.rows.insert(row.generated_id.0.clone(), row);
        Ok(())
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.get(id.as_str()).cloned())
    }

    async fn find_by_passport_number(
        &self,
        number: &str,
    ) -> Result<Option<Customer>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|row| row.passport.number == number).cloned())
    }

    async fn update(&self, customer: &Customer) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        if table.passport_taken_by_other(customer) {
            return Err(StoreError::Duplicate);
        }

        if let Some(row) = table.rows.get_mut(customer.generated_id.as_str()) {
            let uid = row.uid;
            *row = Customer { uid, ..customer.clone() };
        }
        Ok(())
    }

    async fn delete(&self, id: &CustomerId) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        table.rows.remove(id.as_str());
        Ok(())
    }
}
