#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use appointment_cell::clock::FixedClock;
use appointment_cell::repository::InMemoryAppointmentRepository;
use appointment_cell::services::BookingService;
use doctor_cell::models::{Doctor, DoctorRegistration, Specialty};
use doctor_cell::repository::InMemoryDoctorRepository;
use doctor_cell::services::{AvailabilityService, DoctorService};
use patient_cell::models::{Patient, PatientRegistration};
use patient_cell::repository::InMemoryPatientRepository;
use patient_cell::services::PatientService;
use shared_models::address::AddressData;

pub fn address() -> AddressData {
    AddressData {
        street: "rua xpto".to_string(),
        district: "bairro".to_string(),
        postal_code: "00000000".to_string(),
        city: "Brasilia".to_string(),
        state: "DF".to_string(),
        number: None,
        complement: None,
    }
}

pub fn doctor_data(name: &str, email: &str, license: &str, specialty: Specialty) -> DoctorRegistration {
    DoctorRegistration {
        name: name.to_string(),
        email: email.to_string(),
        phone: "619999999999".to_string(),
        license_number: license.to_string(),
        specialty,
        address: address(),
    }
}

pub fn patient_data(name: &str, email: &str, national_id: &str) -> PatientRegistration {
    PatientRegistration {
        name: name.to_string(),
        email: email.to_string(),
        phone: "619999999999".to_string(),
        national_id: national_id.to_string(),
        address: address(),
    }
}

/// 2030-01-07 is a Monday.
pub fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 1, 7)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub struct Clinic {
    pub doctor_repo: Arc<InMemoryDoctorRepository>,
    pub patient_repo: Arc<InMemoryPatientRepository>,
    pub appointment_repo: Arc<InMemoryAppointmentRepository>,
    pub doctors: DoctorService,
    pub patients: PatientService,
    pub availability: Arc<AvailabilityService>,
}

impl Clinic {
    pub fn new() -> Self {
        let doctor_repo = Arc::new(InMemoryDoctorRepository::new());
        let patient_repo = Arc::new(InMemoryPatientRepository::new());
        let appointment_repo = Arc::new(InMemoryAppointmentRepository::new());
        let availability = Arc::new(AvailabilityService::with_seed(
            doctor_repo.clone(),
            appointment_repo.clone(),
            11,
        ));

        Self {
            doctors: DoctorService::new(doctor_repo.clone()),
            patients: PatientService::new(patient_repo.clone()),
            doctor_repo,
            patient_repo,
            appointment_repo,
            availability,
        }
    }

    /// Booking service whose clock reads `now`.
    pub fn booking(&self, now: NaiveDateTime) -> BookingService {
        BookingService::new(
            self.doctor_repo.clone(),
            self.patient_repo.clone(),
            self.appointment_repo.clone(),
            self.availability.clone(),
        )
        .with_clock(Arc::new(FixedClock(now)))
    }

    pub async fn doctor(&self, name: &str, email: &str, license: &str, specialty: Specialty) -> Doctor {
        self.doctors
            .register(doctor_data(name, email, license, specialty))
            .await
            .unwrap()
    }

    pub async fn patient(&self, name: &str, email: &str, national_id: &str) -> Patient {
        self.patients
            .register(patient_data(name, email, national_id))
            .await
            .unwrap()
    }
}
