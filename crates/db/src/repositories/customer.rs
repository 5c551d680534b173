use chrono::NaiveDate;
use sqlx::Row;

use paysys_core::domain::customer::{Address, Customer, CustomerId, Passport};
use paysys_core::errors::StoreError;
use paysys_core::repository::CustomerRepository;

use super::RepositoryError;
use crate::DbPool;

const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_CUSTOMER: &str = "SELECT uid, generatedid, firstname, lastname, email, phone,
        country, region, city, street, building,
        passportnumber, passportissuedate, passportissuer, birthdate, birthplace
 FROM customer";

pub struct SqlCustomerRepository {
    pool: DbPool,
}

impl SqlCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, customer: &Customer) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO customer (generatedid, firstname, lastname, email, phone,
                                   country, region, city, street, building,
                                   passportnumber, passportissuedate, passportissuer,
                                   birthdate, birthplace)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(customer.generated_id.as_str())
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address.country)
        .bind(&customer.address.region)
        .bind(&customer.address.city)
        .bind(&customer.address.street)
        .bind(&customer.address.building)
        .bind(&customer.passport.number)
        .bind(format_storage_date(customer.passport.issue_date))
        .bind(&customer.passport.issuer)
        .bind(format_storage_date(customer.passport.birth_date))
        .bind(&customer.passport.birth_place)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_one_where(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_CUSTOMER} WHERE {column} = ?"))
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_customer(r)?)),
            None => Ok(None),
        }
    }

    async fn replace(&self, customer: &Customer) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE customer SET
                 firstname = ?, lastname = ?, email = ?, phone = ?,
                 country = ?, region = ?, city = ?, street = ?, building = ?,
                 passportnumber = ?, passportissuedate = ?, passportissuer = ?,
                 birthdate = ?, birthplace = ?
             WHERE generatedid = ?",
        )
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address.country)
        .bind(&customer.address.region)
        .bind(&customer.address.city)
        .bind(&customer.address.street)
        .bind(&customer.address.building)
        .bind(&customer.passport.number)
        .bind(format_storage_date(customer.passport.issue_date))
        .bind(&customer.passport.issuer)
        .bind(format_storage_date(customer.passport.birth_date))
        .bind(&customer.passport.birth_place)
        .bind(customer.generated_id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, id: &CustomerId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM customer WHERE generatedid = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn format_storage_date(date: NaiveDate) -> String {
    date.format(STORAGE_DATE_FORMAT).to_string()
}

fn parse_storage_date(column: &str, raw: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(raw, STORAGE_DATE_FORMAT)
        .map_err(|e| RepositoryError::Decode(format!("{column}: {e}")))
}

fn row_to_customer(row: &sqlx::sqlite::SqliteRow) -> Result<Customer, RepositoryError> {
    let text = |column: &str| -> Result<String, RepositoryError> {
        row.try_get(column).map_err(|e| RepositoryError::Decode(e.to_string()))
    };

    let uid: i64 = row.try_get("uid").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let issue_date = parse_storage_date("passportissuedate", &text("passportissuedate")?)?;
    let birth_date = parse_storage_date("birthdate", &text("birthdate")?)?;

    Ok(Customer {
        uid: Some(uid),
        generated_id: CustomerId(text("generatedid")?),
        first_name: text("firstname")?,
        last_name: text("lastname")?,
        email: text("email")?,
        phone: text("phone")?,
        address: Address {
            country: text("country")?,
            region: text("region")?,
            city: text("city")?,
            street: text("street")?,
            building: text("building")?,
        },
        passport: Passport {
            number: text("passportnumber")?,
            issue_date,
            issuer: text("passportissuer")?,
            birth_date,
            birth_place: text("birthplace")?,
        },
    })
}

#[async_trait::async_trait]
impl CustomerRepository for SqlCustomerRepository {
    async fn create(&self, customer: &Customer) -> Result<(), StoreError> {
        Ok(self.insert(customer).await?)
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, StoreError> {
        Ok(self.fetch_one_where("generatedid", id.as_str()).await?)
    }

    async fn find_by_passport_number(
        &self,
        number: &str,
    ) -> Result<Option<Customer>, StoreError> {
        Ok(self.fetch_one_where("passportnumber", number).await?)
    }

    async fn update(&self, customer: &Customer) -> Result<(), StoreError> {
        Ok(self.replace(customer).await?)
    }

    async fn delete(&self, id: &CustomerId) -> Result<(), StoreError> {
        Ok(self.remove(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use paysys_core::domain::customer::{Address, Customer, CustomerId, Passport};
    use paysys_core::errors::StoreError;
    use paysys_core::repository::CustomerRepository;

    use super::SqlCustomerRepository;
    use crate::{connect_with_settings, migrations};

    async fn setup() -> sqlx::SqlitePool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    fn sample_customer(id: &str, passport_number: &str) -> Customer {
        Customer {
            uid: None,
            generated_id: CustomerId(id.to_string()),
            first_name: "Bruce".to_string(),
            last_name: "Wayne".to_string(),
            email: "goo@gmail.com".to_string(),
            phone: "+1234566".to_string(),
            address: Address {
                country: "Russia".to_string(),
                region: "Sakha".to_string(),
                city: "Yakutsk".to_string(),
                street: "Marks".to_string(),
                building: "105".to_string(),
            },
            passport: Passport {
                number: passport_number.to_string(),
                issue_date: NaiveDate::from_ymd_opt(2010, 1, 1).expect("valid date"),
                issuer: "Gov".to_string(),
                birth_date: NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date"),
                birth_place: "Nov".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn create_and_find_by_id() {
        let repo = SqlCustomerRepository::new(setup().await);
        let customer = sample_customer("c-1", "1234567890");

        repo.create(&customer).await.expect("create");
        let found = repo.find_by_id(&customer.generated_id).await.expect("find");
        let found = found.expect("should exist");

        assert!(found.uid.is_some());
        assert_eq!(Customer { uid: None, ..found }, customer);
    }

    #[tokio::test]
    async fn find_by_passport_number_returns_matching_row() {
        let repo = SqlCustomerRepository::new(setup().await);
        repo.create(&sample_customer("c-1", "1234567890")).await.expect("create 1");
        repo.create(&sample_customer("c-2", "0987654321")).await.expect("create 2");

        let found = repo.find_by_passport_number("0987654321").await.expect("find");

        assert_eq!(found.map(|row| row.generated_id), Some(CustomerId("c-2".to_string())));
    }

    #[tokio::test]
    async fn missing_rows_are_none() {
        let repo = SqlCustomerRepository::new(setup().await);

        assert_eq!(repo.find_by_id(&CustomerId("nope".to_string())).await.expect("find"), None);
        assert_eq!(repo.find_by_passport_number("0000000000").await.expect("find"), None);
    }

    #[tokio::test]
    async fn duplicate_passport_number_is_reported_as_duplicate() {
        let repo = SqlCustomerRepository::new(setup().await);
        repo.create(&sample_customer("c-1", "1234567890")).await.expect("create");

        let error = repo
            .create(&sample_customer("c-2", "1234567890"))
            .await
            .expect_err("passport collision");

        assert_eq!(error, StoreError::Duplicate);
    }

    #[tokio::test]
    async fn duplicate_generated_id_is_reported_as_duplicate() {
        let repo = SqlCustomerRepository::new(setup().await);
        repo.create(&sample_customer("c-1", "1234567890")).await.expect("create");

        let error = repo
            .create(&sample_customer("c-1", "0987654321"))
            .await
            .expect_err("id collision");

        assert_eq!(error, StoreError::Duplicate);
    }

    #[tokio::test]
    async fn update_replaces_all_columns() {
        let repo = SqlCustomerRepository::new(setup().await);
        repo.create(&sample_customer("c-1", "1234567890")).await.expect("create");

        let mut changed = sample_customer("c-1", "1111111111");
        changed.first_name = "Selina".to_string();
        changed.email = String::new();
        changed.address.city = "Gotham".to_string();
        changed.passport.birth_date = NaiveDate::from_ymd_opt(1990, 12, 31).expect("valid date");
        repo.update(&changed).await.expect("update");

        let found = repo.find_by_id(&changed.generated_id).await.expect("find").expect("row");
        assert_eq!(Customer { uid: None, ..found }, changed);
    }

    #[tokio::test]
    async fn update_onto_taken_passport_number_is_duplicate() {
        let repo = SqlCustomerRepository::new(setup().await);
        repo.create(&sample_customer("c-1", "1234567890")).await.expect("create 1");
        repo.create(&sample_customer("c-2", "0987654321")).await.expect("create 2");

        let error = repo
            .update(&sample_customer("c-2", "1234567890"))
            .await
            .expect_err("passport collision on update");

        assert_eq!(error, StoreError::Duplicate);
    }

    #[tokio::test]
    async fn delete_is_safe_for_unknown_ids() {
        let repo = SqlCustomerRepository::new(setup().await);
        let customer = sample_customer("c-1", "1234567890");
        repo.create(&customer).await.expect("create");

        repo.delete(&customer.generated_id).await.expect("delete");
        repo.delete(&customer.generated_id).await.expect("delete again");

        assert_eq!(repo.find_by_id(&customer.generated_id).await.expect("find"), None);
    }

    #[tokio::test]
    async fn closed_pool_is_a_backend_failure() {
        let pool = setup().await;
        let repo = SqlCustomerRepository::new(pool.clone());
        pool.close().await;

        let error = repo
            .find_by_id(&CustomerId("c-1".to_string()))
            .await
            .expect_err("closed pool should fail");

        assert!(matches!(error, StoreError::Backend(_)));
    }
}
