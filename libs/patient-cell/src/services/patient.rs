use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use shared_database::PageRequest;

use crate::models::{Patient, PatientError, PatientRegistration, PatientSummary, PatientUpdate};
use crate::repository::PatientRepository;

pub struct PatientService {
    repository: Arc<dyn PatientRepository>,
}

impl PatientService {
    pub fn new(repository: Arc<dyn PatientRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> Arc<dyn PatientRepository> {
        Arc::clone(&self.repository)
    }

    pub async fn register(&self, request: PatientRegistration) -> Result<Patient, PatientError> {
        debug!("Registering patient with email {}", request.email);

        let patient = Patient::register(request)?;
        let stored = self.repository.insert(&patient).await?;

        info!("Patient {} registered", stored.id);
        Ok(stored)
    }

    pub async fn get(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        self.repository
            .find_by_id(patient_id)
            .await?
            .ok_or(PatientError::NotFound)
    }

    pub async fn list(&self, page: PageRequest) -> Result<Vec<PatientSummary>, PatientError> {
        let patients = self.repository.list_active(page).await?;
        Ok(patients.iter().map(PatientSummary::from).collect())
    }

    pub async fn update(&self, patient_id: Uuid, update: PatientUpdate) -> Result<Patient, PatientError> {
        let mut patient = self.get(patient_id).await?;
        patient.apply_update(update)?;

        let stored = self.repository.update(&patient).await?;
        info!("Patient {} updated", stored.id);
        Ok(stored)
    }

    pub async fn deactivate(&self, patient_id: Uuid) -> Result<(), PatientError> {
        let mut patient = self.get(patient_id).await?;
        if !patient.active {
            return Ok(());
        }

        patient.active = false;
        self.repository.update(&patient).await?;
        info!("Patient {} deactivated", patient_id);
        Ok(())
    }
}
