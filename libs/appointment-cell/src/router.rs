use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::services::BookingService;

pub fn appointment_routes(service: Arc<BookingService>) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route(
            "/{appointment_id}",
            get(handlers::get_appointment).delete(handlers::cancel_appointment),
        )
        .with_state(service)
}
