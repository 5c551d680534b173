//! Wire representation of a customer and its mapping to the domain entity.
//!
//! Inbound payloads are validated fail-fast in a fixed field order so a caller
//! always sees the first problem only. Missing JSON keys and explicit `null`s
//! deserialize to empty values and are reported by the same mandatory-field
//! checks.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::customer::{
    format_date, normalize_passport_number, parse_date, Address, Customer, CustomerId, Passport,
    PASSPORT_NUMBER_LENGTH,
};
use crate::errors::ValidationError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerBody {
    #[serde(deserialize_with = "null_as_default")]
    pub customer_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: AddressBody,
    #[serde(deserialize_with = "null_as_default")]
    pub passport: PassportBody,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressBody {
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub street: String,
    #[serde(deserialize_with = "null_as_default")]
    pub building: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassportBody {
    #[serde(deserialize_with = "null_as_default")]
    pub number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub issue_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub issuer: String,
    #[serde(deserialize_with = "null_as_default")]
    pub birth_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub birth_place: String,
}

/// `null` is treated like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn customer_from_request(request: &CustomerBody) -> Result<Customer, ValidationError> {
    require("first_name", &request.first_name)?;
    require("last_name", &request.last_name)?;
    require("phone", &request.phone)?;

    let address = &request.address;
    require("address.country", &address.country)?;
    require("address.region", &address.region)?;
    require("address.city", &address.city)?;
    require("address.street", &address.street)?;
    require("address.building", &address.building)?;

    let passport = &request.passport;
    let passport_number = normalize_passport_number(&passport.number);
    if passport_number.chars().count() != PASSPORT_NUMBER_LENGTH {
        return Err(ValidationError::PassportNumberLength);
    }

    let birth_date = require_date("passport.birth_date", &passport.birth_date)?;
    require("passport.birth_place", &passport.birth_place)?;
    require("passport.issuer", &passport.issuer)?;
    let issue_date = require_date("passport.issue_date", &passport.issue_date)?;

    Ok(Customer {
        uid: None,
        generated_id: CustomerId::default(),
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        email: request.email.clone(),
        phone: request.phone.clone(),
        address: Address {
            country: address.country.clone(),
            region: address.region.clone(),
            city: address.city.clone(),
            street: address.street.clone(),
            building: address.building.clone(),
        },
        passport: Passport {
            number: passport_number,
            issue_date,
            issuer: passport.issuer.clone(),
            birth_date,
            birth_place: passport.birth_place.clone(),
        },
    })
}

pub fn response_from_customer(customer: &Customer) -> CustomerBody {
    CustomerBody {
        customer_id: customer.generated_id.0.clone(),
        first_name: customer.first_name.clone(),
        last_name: customer.last_name.clone(),
        email: customer.email.clone(),
        phone: customer.phone.clone(),
        address: AddressBody {
            country: customer.address.country.clone(),
            region: customer.address.region.clone(),
            city: customer.address.city.clone(),
            street: customer.address.street.clone(),
            building: customer.address.building.clone(),
        },
        passport: PassportBody {
            number: customer.passport.number.clone(),
            issue_date: format_date(customer.passport.issue_date),
            issuer: customer.passport.issuer.clone(),
            birth_date: format_date(customer.passport.birth_date),
            birth_place: customer.passport.birth_place.clone(),
        },
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

fn require_date(field: &'static str, value: &str) -> Result<chrono::NaiveDate, ValidationError> {
    require(field, value)?;
    parse_date(value).ok_or(ValidationError::DateFormat { field })
}
