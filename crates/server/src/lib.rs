pub mod api;
pub mod bootstrap;
pub mod health;

pub use api::{router, AppState};
pub use bootstrap::{bootstrap, bootstrap_with_config, Application, BootstrapError};
