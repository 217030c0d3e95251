use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use crate::handlers;
use crate::services::PatientService;

pub fn patient_routes(service: Arc<PatientService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_patients).post(handlers::register_patient))
        .route(
            "/{patient_id}",
            get(handlers::get_patient)
                .put(handlers::update_patient)
                .delete(handlers::deactivate_patient),
        )
        .with_state(service)
}
