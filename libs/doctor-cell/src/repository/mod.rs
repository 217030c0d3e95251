use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use shared_database::{PageRequest, StoreError};

use crate::models::{Doctor, Specialty};

pub mod memory;
pub mod supabase;

pub use memory::InMemoryDoctorRepository;
pub use supabase::SupabaseDoctorRepository;

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Persist a new doctor. Email and license number are unique.
    async fn insert(&self, doctor: &Doctor) -> Result<Doctor, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, StoreError>;

    async fn find_active_by_specialty(&self, specialty: Specialty) -> Result<Vec<Doctor>, StoreError>;

    /// Active doctors ordered by name.
    async fn list_active(&self, page: PageRequest) -> Result<Vec<Doctor>, StoreError>;

    async fn update(&self, doctor: &Doctor) -> Result<Doctor, StoreError>;
}

/// Occupancy lookup the availability selector consumes. Implemented by the
/// appointment store.
#[async_trait]
pub trait BookedSlots: Send + Sync {
    /// Id of the doctor's non-cancelled appointment at exactly `at`, if any.
    async fn find_active_appointment(
        &self,
        doctor_id: Uuid,
        at: NaiveDateTime,
    ) -> Result<Option<Uuid>, StoreError>;
}
