use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared_database::{PageRequest, StoreError};

use super::PatientRepository;
use crate::models::Patient;

fn digits(national_id: &str) -> String {
    national_id.chars().filter(char::is_ascii_digit).collect()
}

#[derive(Default)]
pub struct InMemoryPatientRepository {
    patients: RwLock<HashMap<Uuid, Patient>>,
}

impl InMemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientRepository {
    async fn insert(&self, patient: &Patient) -> Result<Patient, StoreError> {
        let mut patients = self.patients.write().await;

        if patients.contains_key(&patient.id) {
            return Err(StoreError::Conflict(format!("patient {} already exists", patient.id)));
        }
        if patients.values().any(|p| p.email.eq_ignore_ascii_case(&patient.email)) {
            return Err(StoreError::Conflict(format!("email {} already registered", patient.email)));
        }
        let national_id = digits(&patient.national_id);
        if patients.values().any(|p| digits(&p.national_id) == national_id) {
            return Err(StoreError::Conflict("national id already registered".to_string()));
        }

        patients.insert(patient.id, patient.clone());
        Ok(patient.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, StoreError> {
        Ok(self.patients.read().await.get(&id).cloned())
    }

    async fn list_active(&self, page: PageRequest) -> Result<Vec<Patient>, StoreError> {
        let mut active: Vec<Patient> = self
            .patients
            .read()
            .await
            .values()
            .filter(|p| p.active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(page.apply(active))
    }

    async fn update(&self, patient: &Patient) -> Result<Patient, StoreError> {
        let mut patients = self.patients.write().await;
        match patients.get_mut(&patient.id) {
            Some(stored) => {
                *stored = patient.clone();
                Ok(patient.clone())
            }
            None => Err(StoreError::NotFound(format!("patient {}", patient.id))),
        }
    }
}
