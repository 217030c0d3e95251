use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use doctor_cell::repository::BookedSlots;
use shared_database::supabase::{eq, filter, SupabaseClient};
use shared_database::StoreError;

use super::AppointmentRepository;
use crate::models::{Appointment, CancellationReason};

const APPOINTMENTS: &str = "/rest/v1/appointments";

fn timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[derive(Deserialize)]
struct IdRow {
    id: Uuid,
}

/// `appointments` table. Expects partial unique indexes on
/// `(doctor_id, scheduled_at)` and `(patient_id, (scheduled_at::date))`
/// where `cancellation_reason is null`; a violation arrives as HTTP 409.
pub struct SupabaseAppointmentRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAppointmentRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl BookedSlots for SupabaseAppointmentRepository {
    async fn find_active_appointment(
        &self,
        doctor_id: Uuid,
        at: NaiveDateTime,
    ) -> Result<Option<Uuid>, StoreError> {
        let path = format!(
            "{}?select=id&doctor_id={}&scheduled_at={}&cancellation_reason=is.null&limit=1",
            APPOINTMENTS,
            eq(doctor_id),
            eq(timestamp(at))
        );
        let rows: Vec<IdRow> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next().map(|row| row.id))
    }
}

#[async_trait]
impl AppointmentRepository for SupabaseAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> Result<Appointment, StoreError> {
        debug!("Inserting appointment {} for doctor {}", appointment.id, appointment.doctor_id);

        let body = json!({
            "id": appointment.id,
            "doctor_id": appointment.doctor_id,
            "patient_id": appointment.patient_id,
            "scheduled_at": timestamp(appointment.scheduled_at),
            "cancellation_reason": appointment.cancellation_reason,
        });

        let rows: Vec<Appointment> = self.supabase.write(Method::POST, APPOINTMENTS, body).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Backend("insert returned no rows".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        let path = format!("{}?id={}", APPOINTMENTS, eq(id));
        let rows: Vec<Appointment> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_active_for_patient_between(
        &self,
        patient_id: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Appointment>, StoreError> {
        let path = format!(
            "{}?patient_id={}&scheduled_at={}&scheduled_at={}&cancellation_reason=is.null&order=scheduled_at.asc",
            APPOINTMENTS,
            eq(patient_id),
            filter("gte", timestamp(from)),
            filter("lt", timestamp(to))
        );
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn cancel(&self, id: Uuid, reason: CancellationReason) -> Result<Appointment, StoreError> {
        let path = format!("{}?id={}&cancellation_reason=is.null", APPOINTMENTS, eq(id));
        let rows: Vec<Appointment> = self
            .supabase
            .write(Method::PATCH, &path, json!({ "cancellation_reason": reason }))
            .await?;

        if let Some(cancelled) = rows.into_iter().next() {
            return Ok(cancelled);
        }

        // Nothing matched: either no such row or it was cancelled first.
        match self.find_by_id(id).await? {
            Some(_) => Err(StoreError::Conflict(format!("appointment {} already cancelled", id))),
            None => Err(StoreError::NotFound(format!("appointment {}", id))),
        }
    }
}
