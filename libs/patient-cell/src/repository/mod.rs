use async_trait::async_trait;
use uuid::Uuid;

use shared_database::{PageRequest, StoreError};

use crate::models::Patient;

pub mod memory;
pub mod supabase;

pub use memory::InMemoryPatientRepository;
pub use supabase::SupabasePatientRepository;

#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Email and national ID are unique.
    async fn insert(&self, patient: &Patient) -> Result<Patient, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, StoreError>;

    async fn list_active(&self, page: PageRequest) -> Result<Vec<Patient>, StoreError>;

    async fn update(&self, patient: &Patient) -> Result<Patient, StoreError>;
}
