use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use crate::handlers;
use crate::services::{AvailabilityService, DoctorService};

pub struct DoctorState {
    pub doctors: Arc<DoctorService>,
    pub availability: Arc<AvailabilityService>,
}

pub fn doctor_routes(state: Arc<DoctorState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors).post(handlers::register_doctor))
        .route("/available", get(handlers::find_available_doctor))
        .route(
            "/{doctor_id}",
            get(handlers::get_doctor)
                .put(handlers::update_doctor)
                .delete(handlers::deactivate_doctor),
        )
        .with_state(state)
}
