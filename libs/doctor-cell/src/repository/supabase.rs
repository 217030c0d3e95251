use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_database::supabase::{eq, SupabaseClient};
use shared_database::{PageRequest, StoreError};

use super::DoctorRepository;
use crate::models::{Doctor, Specialty};

const DOCTORS: &str = "/rest/v1/doctors";

/// `doctors` table: one row per doctor, `address` held as jsonb.
pub struct SupabaseDoctorRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseDoctorRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl DoctorRepository for SupabaseDoctorRepository {
    async fn insert(&self, doctor: &Doctor) -> Result<Doctor, StoreError> {
        debug!("Inserting doctor {}", doctor.id);

        let rows: Vec<Doctor> = self
            .supabase
            .write(Method::POST, DOCTORS, serde_json::to_value(doctor)?)
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend("insert returned no rows".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, StoreError> {
        let path = format!("{}?id={}", DOCTORS, eq(id));
        let rows: Vec<Doctor> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_active_by_specialty(&self, specialty: Specialty) -> Result<Vec<Doctor>, StoreError> {
        let path = format!("{}?specialty={}&active=eq.true&order=id.asc", DOCTORS, eq(specialty));
        let rows: Vec<Doctor> = self.supabase.request(Method::GET, &path, None).await?;

        debug!("Found {} active {} doctors", rows.len(), specialty);
        Ok(rows)
    }

    async fn list_active(&self, page: PageRequest) -> Result<Vec<Doctor>, StoreError> {
        let path = format!(
            "{}?active=eq.true&order=name.asc&limit={}&offset={}",
            DOCTORS,
            page.limit(),
            page.offset()
        );
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn update(&self, doctor: &Doctor) -> Result<Doctor, StoreError> {
        let path = format!("{}?id={}", DOCTORS, eq(doctor.id));
        let body = json!({
            "name": doctor.name,
            "phone": doctor.phone,
            "address": doctor.address,
            "active": doctor.active,
        });

        let rows: Vec<Doctor> = self.supabase.write(Method::PATCH, &path, body).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("doctor {}", doctor.id)))
    }
}
