//! Deterministic customer identifiers.
//!
//! The identifier is an MD5 digest over the first name, the normalized passport
//! number, a fixed domain tag and the creation timestamp in Unix seconds. Two
//! creations for the same passport inside one second collide; passport
//! uniqueness in the store is what actually keeps records apart.

use std::time::{SystemTime, UNIX_EPOCH};

use md5::{Digest, Md5};

use crate::domain::customer::CustomerId;

const CUSTOMER_HASH_TAG: &str = "customer";

pub fn generate_customer_id(
    first_name: &str,
    passport_number: &str,
    timestamp: i64,
) -> CustomerId {
    let material = format!("{first_name}{passport_number}{CUSTOMER_HASH_TAG}{timestamp}");
    CustomerId(md5_hex(material.as_bytes()))
}

fn md5_hex(payload: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(payload);
    format!("{:x}", hasher.finalize())
}

/// Source of creation timestamps for identifier generation.
pub trait Clock: Send + Sync {
    fn unix_timestamp(&self) -> i64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_timestamp(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
            .unwrap_or_default()
    }
}

/// Clock pinned to a single instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn unix_timestamp(&self) -> i64 {
        self.0
    }
}
