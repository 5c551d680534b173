pub mod config;
pub mod domain;
pub mod errors;
pub mod identifier;
pub mod mapping;
pub mod repository;
pub mod workflow;

pub use domain::customer::{Address, Customer, CustomerId, Passport};
pub use errors::{ApplicationError, ErrorKind, StoreError, ValidationError};
pub use identifier::{generate_customer_id, Clock, FixedClock, SystemClock};
pub use mapping::{customer_from_request, response_from_customer, CustomerBody};
pub use repository::CustomerRepository;
pub use workflow::CustomerWorkflow;
