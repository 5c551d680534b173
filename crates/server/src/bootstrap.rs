use std::sync::Arc;

use paysys_core::config::{AppConfig, ConfigError, LoadOptions};
use paysys_core::workflow::CustomerWorkflow;
use paysys_db::{connect, migrations, DbPool, SqlCustomerRepository};
use thiserror::Error;
use tracing::info;

use crate::api::AppState;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub workflow: CustomerWorkflow,
}

impl Application {
    pub fn state(&self) -> AppState {
        AppState { workflow: self.workflow.clone(), db_pool: self.db_pool.clone() }
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Wires pool, migrations, repository and workflow for an already loaded config.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        max_connections = config.database.max_connections,
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let repository = Arc::new(SqlCustomerRepository::new(db_pool.clone()));
    let workflow = CustomerWorkflow::new(repository);

    Ok(Application { config, db_pool, workflow })
}
