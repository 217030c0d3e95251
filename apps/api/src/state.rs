use std::sync::Arc;

use anyhow::bail;
use tracing::info;

use appointment_cell::repository::{
    AppointmentRepository, InMemoryAppointmentRepository, SupabaseAppointmentRepository,
};
use appointment_cell::services::BookingService;
use doctor_cell::repository::{BookedSlots, DoctorRepository, InMemoryDoctorRepository, SupabaseDoctorRepository};
use doctor_cell::router::DoctorState;
use doctor_cell::services::{AvailabilityService, DoctorService};
use patient_cell::repository::{InMemoryPatientRepository, PatientRepository, SupabasePatientRepository};
use patient_cell::services::PatientService;
use shared_config::{AppConfig, StoreBackend};
use shared_database::SupabaseClient;

/// Services shared by every cell router.
pub struct AppState {
    pub doctors: Arc<DoctorState>,
    pub patients: Arc<PatientService>,
    pub booking: Arc<BookingService>,
}

struct Repositories {
    doctors: Arc<dyn DoctorRepository>,
    patients: Arc<dyn PatientRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    slots: Arc<dyn BookedSlots>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let repositories = match config.store_backend {
            StoreBackend::Memory => {
                let appointments = Arc::new(InMemoryAppointmentRepository::new());
                Repositories {
                    doctors: Arc::new(InMemoryDoctorRepository::new()),
                    patients: Arc::new(InMemoryPatientRepository::new()),
                    appointments: appointments.clone(),
                    slots: appointments,
                }
            }
            StoreBackend::Supabase => {
                if !config.is_configured() {
                    bail!("STORE_BACKEND=supabase requires SUPABASE_URL and SUPABASE_ANON_PUBLIC_KEY");
                }
                let supabase = Arc::new(SupabaseClient::new(config));
                let appointments = Arc::new(SupabaseAppointmentRepository::new(supabase.clone()));
                Repositories {
                    doctors: Arc::new(SupabaseDoctorRepository::new(supabase.clone())),
                    patients: Arc::new(SupabasePatientRepository::new(supabase)),
                    appointments: appointments.clone(),
                    slots: appointments,
                }
            }
        };
        info!("Using {} store", config.store_backend);

        Ok(Self::wire(repositories, config.availability_seed))
    }

    fn wire(repositories: Repositories, seed: Option<u64>) -> Self {
        let Repositories { doctors, patients, appointments, slots } = repositories;

        let availability = Arc::new(match seed {
            Some(seed) => {
                info!("Doctor selection seeded with {}", seed);
                AvailabilityService::with_seed(doctors.clone(), slots, seed)
            }
            None => AvailabilityService::new(doctors.clone(), slots),
        });

        let booking = BookingService::new(
            doctors.clone(),
            patients.clone(),
            appointments,
            availability.clone(),
        );

        Self {
            doctors: Arc::new(DoctorState {
                doctors: Arc::new(DoctorService::new(doctors)),
                availability,
            }),
            patients: Arc::new(PatientService::new(patients)),
            booking: Arc::new(booking),
        }
    }
}
