pub mod clock;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use clock::{Clock, FixedClock, SystemClock};
pub use models::*;
pub use repository::{AppointmentRepository, InMemoryAppointmentRepository, SupabaseAppointmentRepository};
pub use services::BookingService;
