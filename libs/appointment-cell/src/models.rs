// libs/appointment-cell/src/models.rs
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use doctor_cell::models::Specialty;
use shared_database::StoreError;
use shared_models::error::AppError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A booked consultation. Cancelling sets `cancellation_reason`; rows are
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub scheduled_at: NaiveDateTime,
    pub cancellation_reason: Option<CancellationReason>,
}

impl PartialEq for Appointment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Appointment {}

impl Appointment {
    pub fn new(doctor_id: Uuid, patient_id: Uuid, scheduled_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            doctor_id,
            patient_id,
            scheduled_at,
            cancellation_reason: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancellation_reason.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancellationReason {
    PatientWithdrew,
    DoctorCancelled,
    Other,
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancellationReason::PatientWithdrew => write!(f, "PATIENT_WITHDREW"),
            CancellationReason::DoctorCancelled => write!(f, "DOCTOR_CANCELLED"),
            CancellationReason::Other => write!(f, "OTHER"),
        }
    }
}

// ==============================================================================
// REQUEST DTOs
// ==============================================================================

/// Booking input. Without `doctor_id` a free doctor of `specialty` is picked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub specialty: Option<Specialty>,
    pub scheduled_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub reason: CancellationReason,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient is inactive")]
    PatientInactive,

    #[error("Doctor is inactive")]
    DoctorInactive,

    #[error("{0} is outside clinic hours (Monday to Saturday, 07:00 to 19:00)")]
    OutsideClinicHours(NaiveDateTime),

    #[error("{0} is outside the supported calendar range")]
    DateOutOfRange(NaiveDateTime),

    #[error("Appointments must be booked at least {minutes} minutes in advance")]
    InsufficientNotice { minutes: i64 },

    #[error("Patient already has an appointment on {0}")]
    PatientAlreadyBooked(NaiveDate),

    #[error("Doctor already has an appointment at {0}")]
    DoctorBusy(NaiveDateTime),

    #[error("Specialty is required when no doctor is chosen")]
    SpecialtyRequired,

    #[error("No {specialty} doctor available at {at}")]
    NoDoctorAvailable { specialty: Specialty, at: NaiveDateTime },

    #[error("Appointment slot was taken by a concurrent booking")]
    SlotTaken,

    #[error("Appointment is already cancelled")]
    AlreadyCancelled,

    #[error("Appointments can only be cancelled at least {hours} hours in advance")]
    CancellationTooLate { hours: i64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound
            | AppointmentError::PatientNotFound
            | AppointmentError::DoctorNotFound => AppError::NotFound(err.to_string()),
            AppointmentError::DoctorBusy(_)
            | AppointmentError::NoDoctorAvailable { .. }
            | AppointmentError::SlotTaken
            | AppointmentError::AlreadyCancelled => AppError::Conflict(err.to_string()),
            AppointmentError::Store(store) => store.into(),
            _ => AppError::ValidationError(err.to_string()),
        }
    }
}
