use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format for passport dates.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

pub const PASSPORT_NUMBER_LENGTH: usize = 10;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

impl CustomerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub region: String,
    pub city: String,
    pub street: String,
    pub building: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passport {
    pub number: String,
    pub issue_date: NaiveDate,
    pub issuer: String,
    pub birth_date: NaiveDate,
    pub birth_place: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Storage surrogate key; only populated on records read back from a store.
    pub uid: Option<i64>,
    pub generated_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
    pub passport: Passport,
}

/// Strips every space from a passport number.
pub fn normalize_passport_number(raw: &str) -> String {
    raw.replace(' ', "")
}

/// Parses a strict `DD-MM-YYYY` date. Single-digit days or months, short years
/// and impossible calendar dates are rejected.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            2 | 5 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
