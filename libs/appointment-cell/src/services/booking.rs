// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{NaiveDateTime, NaiveTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::repository::{BookedSlots, DoctorRepository};
use doctor_cell::services::AvailabilityService;
use patient_cell::repository::PatientRepository;
use shared_database::StoreError;

use crate::clock::{Clock, SystemClock};
use crate::models::{Appointment, AppointmentError, BookAppointmentRequest, CancellationReason};
use crate::repository::AppointmentRepository;
use crate::services::rules::BookingRules;

pub struct BookingService {
    doctors: Arc<dyn DoctorRepository>,
    patients: Arc<dyn PatientRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    availability: Arc<AvailabilityService>,
    rules: BookingRules,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(
        doctors: Arc<dyn DoctorRepository>,
        patients: Arc<dyn PatientRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        availability: Arc<AvailabilityService>,
    ) -> Self {
        Self {
            doctors,
            patients,
            appointments,
            availability,
            rules: BookingRules::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_rules(mut self, rules: BookingRules) -> Self {
        self.rules = rules;
        self
    }

    pub async fn book(&self, request: BookAppointmentRequest) -> Result<Appointment, AppointmentError> {
        let at = request.scheduled_at;
        info!("Booking appointment for patient {} at {}", request.patient_id, at);

        // Step 1: participants exist and are active
        let patient = self
            .patients
            .find_by_id(request.patient_id)
            .await?
            .ok_or(AppointmentError::PatientNotFound)?;
        if !patient.active {
            return Err(AppointmentError::PatientInactive);
        }

        if let Some(doctor_id) = request.doctor_id {
            let doctor = self
                .doctors
                .find_by_id(doctor_id)
                .await?
                .ok_or(AppointmentError::DoctorNotFound)?;
            if !doctor.active {
                return Err(AppointmentError::DoctorInactive);
            }
        }

        // Step 2: scheduling rules
        self.rules.check_clinic_hours(at)?;
        self.rules.check_booking_notice(self.clock.now(), at)?;
        self.check_patient_free_on_day(patient.id, at).await?;

        // Step 3: resolve the doctor
        let doctor_id = match request.doctor_id {
            Some(doctor_id) => {
                if self.appointments.find_active_appointment(doctor_id, at).await?.is_some() {
                    warn!("Doctor {} already booked at {}", doctor_id, at);
                    return Err(AppointmentError::DoctorBusy(at));
                }
                doctor_id
            }
            None => {
                let specialty = request.specialty.ok_or(AppointmentError::SpecialtyRequired)?;
                let doctor = self
                    .availability
                    .pick_available_doctor(specialty, at)
                    .await?
                    .ok_or(AppointmentError::NoDoctorAvailable { specialty, at })?;
                debug!("Selected doctor {} ({}) for {}", doctor.id, specialty, at);
                doctor.id
            }
        };

        // Step 4: persist; the store rejects a concurrent booking of the slot or day
        let appointment = Appointment::new(doctor_id, patient.id, at);
        let stored = match self.appointments.insert(&appointment).await {
            Ok(stored) => stored,
            Err(StoreError::Conflict(msg)) => {
                warn!("Booking lost to concurrent booking: {}", msg);
                self.check_patient_free_on_day(patient.id, at).await?;
                return Err(AppointmentError::SlotTaken);
            }
            Err(e) => return Err(e.into()),
        };

        info!("Appointment {} booked with doctor {} at {}", stored.id, stored.doctor_id, at);
        Ok(stored)
    }

    pub async fn get(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.appointments
            .find_by_id(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    pub async fn cancel(
        &self,
        appointment_id: Uuid,
        reason: CancellationReason,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.get(appointment_id).await?;
        if !appointment.is_active() {
            return Err(AppointmentError::AlreadyCancelled);
        }

        self.rules
            .check_cancellation_notice(self.clock.now(), appointment.scheduled_at)?;

        let cancelled = match self.appointments.cancel(appointment_id, reason).await {
            Ok(cancelled) => cancelled,
            Err(StoreError::Conflict(_)) => return Err(AppointmentError::AlreadyCancelled),
            Err(e) => return Err(e.into()),
        };
        info!("Appointment {} cancelled ({})", appointment_id, reason);
        Ok(cancelled)
    }

    async fn check_patient_free_on_day(&self, patient_id: Uuid, at: NaiveDateTime) -> Result<(), AppointmentError> {
        let day_start = at.date().and_time(NaiveTime::MIN);
        let day_end = at
            .date()
            .succ_opt()
            .ok_or(AppointmentError::DateOutOfRange(at))?
            .and_time(NaiveTime::MIN);

        let existing = self
            .appointments
            .find_active_for_patient_between(patient_id, day_start, day_end)
            .await?;

        if !existing.is_empty() {
            warn!("Patient {} already booked on {}", patient_id, at.date());
            return Err(AppointmentError::PatientAlreadyBooked(at.date()));
        }
        Ok(())
    }
}
