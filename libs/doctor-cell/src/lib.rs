pub mod handlers;
pub mod router;
pub mod models;
pub mod repository;
pub mod services;

pub use models::*;
pub use repository::{BookedSlots, DoctorRepository, InMemoryDoctorRepository, SupabaseDoctorRepository};
pub use services::*;
