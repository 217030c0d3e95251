use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDateTime;
use futures::future::try_join_all;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info};

use shared_database::StoreError;

use crate::models::{Doctor, Specialty};
use crate::repository::{BookedSlots, DoctorRepository};

/// Picks a free doctor of a specialty for an exact instant.
///
/// A doctor is eligible when active, of the requested specialty, and without
/// a non-cancelled appointment at exactly that instant. One eligible doctor
/// is returned with uniform probability; no eligible doctor yields `None`.
/// The selector only reads from the stores.
pub struct AvailabilityService {
    doctors: Arc<dyn DoctorRepository>,
    slots: Arc<dyn BookedSlots>,
    rng: Mutex<StdRng>,
}

impl AvailabilityService {
    pub fn new(doctors: Arc<dyn DoctorRepository>, slots: Arc<dyn BookedSlots>) -> Self {
        Self::with_rng(doctors, slots, StdRng::from_entropy())
    }

    /// Deterministic selection sequence for a given seed.
    pub fn with_seed(doctors: Arc<dyn DoctorRepository>, slots: Arc<dyn BookedSlots>, seed: u64) -> Self {
        Self::with_rng(doctors, slots, StdRng::seed_from_u64(seed))
    }

    fn with_rng(doctors: Arc<dyn DoctorRepository>, slots: Arc<dyn BookedSlots>, rng: StdRng) -> Self {
        Self {
            doctors,
            slots,
            rng: Mutex::new(rng),
        }
    }

    /// All eligible doctors for `(specialty, at)`, ordered by id so a seeded
    /// draw picks the same doctor whatever order the store returns rows in.
    pub async fn eligible_doctors(
        &self,
        specialty: Specialty,
        at: NaiveDateTime,
    ) -> Result<Vec<Doctor>, StoreError> {
        let mut doctors: Vec<Doctor> = self
            .doctors
            .find_active_by_specialty(specialty)
            .await?
            .into_iter()
            .filter(|doctor| doctor.active && doctor.specialty == specialty)
            .collect();
        doctors.sort_by_key(|doctor| doctor.id);

        let bookings = try_join_all(
            doctors
                .iter()
                .map(|doctor| self.slots.find_active_appointment(doctor.id, at)),
        )
        .await?;

        let eligible: Vec<Doctor> = doctors
            .into_iter()
            .zip(bookings)
            .filter_map(|(doctor, booking)| booking.is_none().then_some(doctor))
            .collect();

        debug!("{} {} doctors free at {}", eligible.len(), specialty, at);
        Ok(eligible)
    }

    pub async fn pick_available_doctor(
        &self,
        specialty: Specialty,
        at: NaiveDateTime,
    ) -> Result<Option<Doctor>, StoreError> {
        let mut candidates = self.eligible_doctors(specialty, at).await?;

        if candidates.is_empty() {
            info!("No {} doctor available at {}", specialty, at);
            return Ok(None);
        }

        let index = self.draw_index(candidates.len());
        let doctor = candidates.swap_remove(index);

        debug!("Picked doctor {} for {} at {}", doctor.id, specialty, at);
        Ok(Some(doctor))
    }

    fn draw_index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..len)
    }
}
