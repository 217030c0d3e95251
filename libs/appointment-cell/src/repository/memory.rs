use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use doctor_cell::repository::BookedSlots;
use shared_database::StoreError;

use super::AppointmentRepository;
use crate::models::{Appointment, CancellationReason};

#[derive(Default)]
pub struct InMemoryAppointmentRepository {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookedSlots for InMemoryAppointmentRepository {
    async fn find_active_appointment(
        &self,
        doctor_id: Uuid,
        at: NaiveDateTime,
    ) -> Result<Option<Uuid>, StoreError> {
        let appointments = self.appointments.read().await;
        Ok(appointments
            .values()
            .find(|a| a.is_active() && a.doctor_id == doctor_id && a.scheduled_at == at)
            .map(|a| a.id))
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> Result<Appointment, StoreError> {
        // Checked under the write lock: one active appointment per doctor and
        // instant, one per patient and day.
        let mut appointments = self.appointments.write().await;

        if appointments.contains_key(&appointment.id) {
            return Err(StoreError::Conflict(format!("appointment {} already exists", appointment.id)));
        }
        if appointment.is_active()
            && appointments.values().any(|a| {
                a.is_active()
                    && a.doctor_id == appointment.doctor_id
                    && a.scheduled_at == appointment.scheduled_at
            })
        {
            return Err(StoreError::Conflict(format!(
                "doctor {} already booked at {}",
                appointment.doctor_id, appointment.scheduled_at
            )));
        }
        if appointment.is_active()
            && appointments.values().any(|a| {
                a.is_active()
                    && a.patient_id == appointment.patient_id
                    && a.scheduled_at.date() == appointment.scheduled_at.date()
            })
        {
            return Err(StoreError::Conflict(format!(
                "patient {} already booked on {}",
                appointment.patient_id,
                appointment.scheduled_at.date()
            )));
        }

        appointments.insert(appointment.id, appointment.clone());
        Ok(appointment.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn find_active_for_patient_between(
        &self,
        patient_id: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Appointment>, StoreError> {
        let appointments = self.appointments.read().await;
        let mut found: Vec<Appointment> = appointments
            .values()
            .filter(|a| {
                a.is_active() && a.patient_id == patient_id && a.scheduled_at >= from && a.scheduled_at < to
            })
            .cloned()
            .collect();
        found.sort_by_key(|a| a.scheduled_at);
        Ok(found)
    }

    async fn cancel(&self, id: Uuid, reason: CancellationReason) -> Result<Appointment, StoreError> {
        let mut appointments = self.appointments.write().await;
        let appointment = appointments
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("appointment {}", id)))?;

        if !appointment.is_active() {
            return Err(StoreError::Conflict(format!("appointment {} already cancelled", id)));
        }
        appointment.cancellation_reason = Some(reason);
        Ok(appointment.clone())
    }
}
