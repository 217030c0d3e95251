use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_database::supabase::{eq, SupabaseClient};
use shared_database::{PageRequest, StoreError};

use super::PatientRepository;
use crate::models::Patient;

const PATIENTS: &str = "/rest/v1/patients";

pub struct SupabasePatientRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabasePatientRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl PatientRepository for SupabasePatientRepository {
    async fn insert(&self, patient: &Patient) -> Result<Patient, StoreError> {
        debug!("Inserting patient {}", patient.id);

        let rows: Vec<Patient> = self
            .supabase
            .write(Method::POST, PATIENTS, serde_json::to_value(patient)?)
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend("insert returned no rows".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, StoreError> {
        let path = format!("{}?id={}", PATIENTS, eq(id));
        let rows: Vec<Patient> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn list_active(&self, page: PageRequest) -> Result<Vec<Patient>, StoreError> {
        let path = format!(
            "{}?active=eq.true&order=name.asc&limit={}&offset={}",
            PATIENTS,
            page.limit(),
            page.offset()
        );
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn update(&self, patient: &Patient) -> Result<Patient, StoreError> {
        let path = format!("{}?id={}", PATIENTS, eq(patient.id));
        let body = json!({
            "name": patient.name,
            "phone": patient.phone,
            "address": patient.address,
            "active": patient.active,
        });

        let rows: Vec<Patient> = self.supabase.write(Method::PATCH, &path, body).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("patient {}", patient.id)))
    }
}
