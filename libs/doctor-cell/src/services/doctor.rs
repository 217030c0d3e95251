use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use shared_database::PageRequest;

use crate::models::{Doctor, DoctorError, DoctorRegistration, DoctorSummary, DoctorUpdate};
use crate::repository::DoctorRepository;

pub struct DoctorService {
    repository: Arc<dyn DoctorRepository>,
}

impl DoctorService {
    pub fn new(repository: Arc<dyn DoctorRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> Arc<dyn DoctorRepository> {
        Arc::clone(&self.repository)
    }

    pub async fn register(&self, request: DoctorRegistration) -> Result<Doctor, DoctorError> {
        debug!("Registering doctor with email {}", request.email);

        let doctor = Doctor::register(request)?;
        let stored = self.repository.insert(&doctor).await?;

        info!("Doctor {} registered ({})", stored.id, stored.specialty);
        Ok(stored)
    }

    pub async fn get(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        self.repository
            .find_by_id(doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)
    }

    pub async fn list(&self, page: PageRequest) -> Result<Vec<DoctorSummary>, DoctorError> {
        let doctors = self.repository.list_active(page).await?;
        Ok(doctors.iter().map(DoctorSummary::from).collect())
    }

    pub async fn update(&self, doctor_id: Uuid, update: DoctorUpdate) -> Result<Doctor, DoctorError> {
        let mut doctor = self.get(doctor_id).await?;
        doctor.apply_update(update)?;

        let stored = self.repository.update(&doctor).await?;
        info!("Doctor {} updated", stored.id);
        Ok(stored)
    }

    /// Soft delete. Deactivated doctors drop out of listings and selection.
    pub async fn deactivate(&self, doctor_id: Uuid) -> Result<(), DoctorError> {
        let mut doctor = self.get(doctor_id).await?;
        if !doctor.active {
            debug!("Doctor {} already inactive", doctor_id);
            return Ok(());
        }

        doctor.active = false;
        self.repository.update(&doctor).await?;
        info!("Doctor {} deactivated", doctor_id);
        Ok(())
    }
}
