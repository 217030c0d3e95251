use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared_database::{PageRequest, StoreError};

use super::DoctorRepository;
use crate::models::{Doctor, Specialty};

#[derive(Default)]
pub struct InMemoryDoctorRepository {
    doctors: RwLock<HashMap<Uuid, Doctor>>,
}

impl InMemoryDoctorRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DoctorRepository for InMemoryDoctorRepository {
    async fn insert(&self, doctor: &Doctor) -> Result<Doctor, StoreError> {
        let mut doctors = self.doctors.write().await;

        if doctors.contains_key(&doctor.id) {
            return Err(StoreError::Conflict(format!("doctor {} already exists", doctor.id)));
        }
        if doctors.values().any(|d| d.email.eq_ignore_ascii_case(&doctor.email)) {
            return Err(StoreError::Conflict(format!("email {} already registered", doctor.email)));
        }
        if doctors.values().any(|d| d.license_number == doctor.license_number) {
            return Err(StoreError::Conflict(format!(
                "license {} already registered",
                doctor.license_number
            )));
        }

        doctors.insert(doctor.id, doctor.clone());
        Ok(doctor.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, StoreError> {
        Ok(self.doctors.read().await.get(&id).cloned())
    }

    async fn find_active_by_specialty(&self, specialty: Specialty) -> Result<Vec<Doctor>, StoreError> {
        let doctors = self.doctors.read().await;
        Ok(doctors
            .values()
            .filter(|d| d.active && d.specialty == specialty)
            .cloned()
            .collect())
    }

    async fn list_active(&self, page: PageRequest) -> Result<Vec<Doctor>, StoreError> {
        let mut active: Vec<Doctor> = self
            .doctors
            .read()
            .await
            .values()
            .filter(|d| d.active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(page.apply(active))
    }

    async fn update(&self, doctor: &Doctor) -> Result<Doctor, StoreError> {
        let mut doctors = self.doctors.write().await;
        match doctors.get_mut(&doctor.id) {
            Some(stored) => {
                *stored = doctor.clone();
                Ok(doctor.clone())
            }
            None => Err(StoreError::NotFound(format!("doctor {}", doctor.id))),
        }
    }
}
