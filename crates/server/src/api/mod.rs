//! Customer HTTP API.
//!
//! - `POST   /customer`      create, 201 with the stored projection
//! - `GET    /customer/{id}` fetch, 200 with the projection
//! - `PUT    /customer/{id}` full replace, 200 with an empty body
//! - `DELETE /customer/{id}` remove, 204
//! - `GET    /health`        readiness probe

use axum::{
    routing::{get, post},
    Router,
};
use paysys_core::workflow::CustomerWorkflow;
use paysys_db::DbPool;
use tower_http::trace::TraceLayer;

use crate::health;

pub mod customer;
pub mod error;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub workflow: CustomerWorkflow,
    pub db_pool: DbPool,
}

pub fn router(state: AppState) -> Router {
    let health = health::router(state.db_pool.clone());

    Router::new()
        .route("/customer", post(customer::create_customer))
        .route(
            "/customer/{id}",
            get(customer::get_customer)
                .put(customer::update_customer)
                .delete(customer::delete_customer),
        )
        .with_state(state)
        .merge(health)
        .layer(TraceLayer::new_for_http())
}
