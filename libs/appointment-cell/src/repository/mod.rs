use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use doctor_cell::repository::BookedSlots;
use shared_database::StoreError;

use crate::models::{Appointment, CancellationReason};

pub mod memory;
pub mod supabase;

pub use memory::InMemoryAppointmentRepository;
pub use supabase::SupabaseAppointmentRepository;

/// Appointment store. Also answers the doctor-side booked-slot lookup.
#[async_trait]
pub trait AppointmentRepository: BookedSlots {
    /// Fails with `StoreError::Conflict` when the doctor already holds an
    /// active appointment at the same instant, or the patient one on the
    /// same day.
    async fn insert(&self, appointment: &Appointment) -> Result<Appointment, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, StoreError>;

    /// Active appointments of a patient with `from <= scheduled_at < to`.
    async fn find_active_for_patient_between(
        &self,
        patient_id: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Appointment>, StoreError>;

    /// Fails with `StoreError::Conflict` when the appointment is already
    /// cancelled.
    async fn cancel(&self, id: Uuid, reason: CancellationReason) -> Result<Appointment, StoreError>;
}
