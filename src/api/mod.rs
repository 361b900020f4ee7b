//! HTTP interface for the patient registry.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/` | service name |
//! | GET | `/about` | service description |
//! | GET | `/view` | all patients keyed by id |
//! | GET | `/patient/:patient_id` | one patient |
//! | GET | `/sort?sort_by=&order=` | patients ordered by height, weight or bmi |
//! | POST | `/create` | add a patient |
//! | PUT | `/edit/:patient_id` | partial update |
//! | DELETE | `/delete/:patient_id` | remove a patient |
//!
//! Every patient in a response carries its computed `bmi` and `verdict`.

pub mod error;
mod handlers;

use crate::core::registry::PatientRegistry;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Builds the router with all routes over a shared registry
pub fn app(registry: Arc<PatientRegistry>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/about", get(handlers::about))
        .route("/view", get(handlers::view_all))
        .route("/patient/:patient_id", get(handlers::view_patient))
        .route("/sort", get(handlers::sort_patients))
        .route("/create", post(handlers::create_patient))
        .route("/edit/:patient_id", put(handlers::update_patient))
        .route("/delete/:patient_id", delete(handlers::delete_patient))
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}
