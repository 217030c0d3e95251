use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use mockall::mock;
use uuid::Uuid;

use doctor_cell::models::{Doctor, DoctorRegistration, Specialty};
use doctor_cell::repository::{BookedSlots, DoctorRepository, InMemoryDoctorRepository};
use doctor_cell::services::AvailabilityService;
use shared_database::{PageRequest, StoreError};
use shared_models::address::AddressData;

struct Booking {
    doctor_id: Uuid,
    at: NaiveDateTime,
    cancelled: bool,
}

#[derive(Default)]
struct FakeBookings {
    bookings: Mutex<Vec<Booking>>,
}

impl FakeBookings {
    fn book(&self, doctor: &Doctor, at: NaiveDateTime) {
        self.bookings.lock().unwrap().push(Booking { doctor_id: doctor.id, at, cancelled: false });
    }

    fn book_cancelled(&self, doctor: &Doctor, at: NaiveDateTime) {
        self.bookings.lock().unwrap().push(Booking { doctor_id: doctor.id, at, cancelled: true });
    }
}

#[async_trait]
impl BookedSlots for FakeBookings {
    async fn find_active_appointment(
        &self,
        doctor_id: Uuid,
        at: NaiveDateTime,
    ) -> Result<Option<Uuid>, StoreError> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .find(|b| b.doctor_id == doctor_id && b.at == at && !b.cancelled)
            .map(|_| Uuid::new_v4()))
    }
}

mock! {
    pub Slots {}

    #[async_trait]
    impl BookedSlots for Slots {
        async fn find_active_appointment(
            &self,
            doctor_id: Uuid,
            at: NaiveDateTime,
        ) -> Result<Option<Uuid>, StoreError>;
    }
}

mock! {
    pub Doctors {}

    #[async_trait]
    impl DoctorRepository for Doctors {
        async fn insert(&self, doctor: &Doctor) -> Result<Doctor, StoreError>;
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, StoreError>;
        async fn find_active_by_specialty(&self, specialty: Specialty) -> Result<Vec<Doctor>, StoreError>;
        async fn list_active(&self, page: PageRequest) -> Result<Vec<Doctor>, StoreError>;
        async fn update(&self, doctor: &Doctor) -> Result<Doctor, StoreError>;
    }
}

fn monday_at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 1, 7)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn registration(name: &str, email: &str, license: &str, specialty: Specialty) -> DoctorRegistration {
    DoctorRegistration {
        name: name.to_string(),
        email: email.to_string(),
        phone: "619999999999".to_string(),
        license_number: license.to_string(),
        specialty,
        address: AddressData {
            street: "rua xpto".to_string(),
            district: "bairro".to_string(),
            postal_code: "00000000".to_string(),
            city: "Brasilia".to_string(),
            state: "DF".to_string(),
            number: None,
            complement: None,
        },
    }
}

struct Fixture {
    doctors: Arc<InMemoryDoctorRepository>,
    bookings: Arc<FakeBookings>,
    selector: AvailabilityService,
}

impl Fixture {
    fn new() -> Self {
        let doctors = Arc::new(InMemoryDoctorRepository::new());
        let bookings = Arc::new(FakeBookings::default());
        let selector = AvailabilityService::with_seed(doctors.clone(), bookings.clone(), 42);
        Self { doctors, bookings, selector }
    }

    async fn doctor(&self, name: &str, email: &str, license: &str, specialty: Specialty) -> Doctor {
        let doctor = Doctor::register(registration(name, email, license, specialty)).unwrap();
        self.doctors.insert(&doctor).await.unwrap()
    }
}

#[tokio::test]
async fn never_returns_doctor_booked_at_instant() {
    let fx = Fixture::new();
    let booked = fx.doctor("Medico", "medico@voll.med", "123456", Specialty::Cardiology).await;
    let free = fx.doctor("Medico Dois", "medico2@voll.med", "123455", Specialty::Cardiology).await;
    fx.bookings.book(&booked, monday_at(10));

    for _ in 0..100 {
        let picked = fx.selector.pick_available_doctor(Specialty::Cardiology, monday_at(10)).await.unwrap();
        assert_eq!(picked, Some(free.clone()));
    }
}

#[tokio::test]
async fn returns_single_free_doctor() {
    let fx = Fixture::new();
    let doctor = fx.doctor("Medico", "medico@voll.med", "123456", Specialty::Cardiology).await;

    let picked = fx.selector.pick_available_doctor(Specialty::Cardiology, monday_at(10)).await.unwrap();
    assert_eq!(picked, Some(doctor));
}

#[tokio::test]
async fn absent_when_every_doctor_is_booked() {
    let fx = Fixture::new();
    let first = fx.doctor("Medico", "medico@voll.med", "123456", Specialty::Cardiology).await;
    let second = fx.doctor("Medico Dois", "medico2@voll.med", "123455", Specialty::Cardiology).await;
    fx.bookings.book(&first, monday_at(10));
    fx.bookings.book(&second, monday_at(10));

    let picked = fx.selector.pick_available_doctor(Specialty::Cardiology, monday_at(10)).await.unwrap();
    assert_eq!(picked, None);
}

#[tokio::test]
async fn absent_when_no_doctor_has_specialty() {
    let fx = Fixture::new();
    fx.doctor("Medico", "medico@voll.med", "123456", Specialty::Orthopedics).await;

    let picked = fx.selector.pick_available_doctor(Specialty::Cardiology, monday_at(10)).await.unwrap();
    assert_eq!(picked, None);
}

#[tokio::test]
async fn spreads_picks_evenly_across_free_doctors() {
    let fx = Fixture::new();
    let mut free = Vec::new();
    for i in 0..3 {
        let doctor = fx
            .doctor(&format!("Medico {}", i), &format!("medico{}@voll.med", i), &format!("10000{}", i), Specialty::Dermatology)
            .await;
        free.push(doctor.id);
    }
    let booked = fx.doctor("Ocupado", "ocupado@voll.med", "200000", Specialty::Dermatology).await;
    fx.bookings.book(&booked, monday_at(15));

    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for _ in 0..3000 {
        let picked = fx
            .selector
            .pick_available_doctor(Specialty::Dermatology, monday_at(15))
            .await
            .unwrap()
            .unwrap();
        *counts.entry(picked.id).or_default() += 1;
    }

    assert!(!counts.contains_key(&booked.id));
    assert_eq!(counts.len(), 3);
    for id in free {
        let hits = counts[&id];
        assert!((800..=1200).contains(&hits), "doctor {} picked {} times", id, hits);
    }
}

#[tokio::test]
async fn cancelled_appointment_does_not_block() {
    let fx = Fixture::new();
    let doctor = fx.doctor("Medico", "medico@voll.med", "123456", Specialty::Gynecology).await;
    fx.bookings.book_cancelled(&doctor, monday_at(9));

    let picked = fx.selector.pick_available_doctor(Specialty::Gynecology, monday_at(9)).await.unwrap();
    assert_eq!(picked, Some(doctor));
}

#[tokio::test]
async fn appointment_at_other_time_same_day_does_not_block() {
    let fx = Fixture::new();
    let doctor = fx.doctor("Medico", "medico@voll.med", "123456", Specialty::Cardiology).await;
    fx.bookings.book(&doctor, monday_at(11));

    let picked = fx.selector.pick_available_doctor(Specialty::Cardiology, monday_at(10)).await.unwrap();
    assert_eq!(picked, Some(doctor));
}

#[tokio::test]
async fn inactive_doctor_is_never_picked() {
    let fx = Fixture::new();
    let mut doctor = fx.doctor("Medico", "medico@voll.med", "123456", Specialty::Cardiology).await;
    doctor.active = false;
    fx.doctors.update(&doctor).await.unwrap();

    let picked = fx.selector.pick_available_doctor(Specialty::Cardiology, monday_at(10)).await.unwrap();
    assert_eq!(picked, None);
}

fn orthopedists(count: usize) -> Vec<Doctor> {
    (0..count)
        .map(|i| {
            Doctor::register(registration(
                &format!("Medico {}", i),
                &format!("m{}@voll.med", i),
                &format!("30000{}", i),
                Specialty::Orthopedics,
            ))
            .unwrap()
        })
        .collect()
}

async fn seeded_picks(doctors: &[Doctor], seed: u64) -> Vec<Uuid> {
    let repository = Arc::new(InMemoryDoctorRepository::new());
    for doctor in doctors {
        repository.insert(doctor).await.unwrap();
    }
    let selector = AvailabilityService::with_seed(repository, Arc::new(FakeBookings::default()), seed);

    let mut picks = Vec::new();
    for _ in 0..20 {
        let doctor = selector
            .pick_available_doctor(Specialty::Orthopedics, monday_at(8))
            .await
            .unwrap()
            .unwrap();
        picks.push(doctor.id);
    }
    picks
}

#[tokio::test]
async fn same_seed_gives_same_sequence_across_stores() {
    let doctors = orthopedists(5);
    let mut reversed = doctors.clone();
    reversed.reverse();

    let first = seeded_picks(&doctors, 7).await;
    let second = seeded_picks(&reversed, 7).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn candidates_are_ordered_by_id_regardless_of_store_order() {
    let mut doctors = orthopedists(4);
    let rows = doctors.clone();
    doctors.sort_by_key(|doctor| doctor.id);

    let mut repository = MockDoctors::new();
    repository
        .expect_find_active_by_specialty()
        .returning(move |_| Ok(rows.iter().rev().cloned().collect()));

    let selector = AvailabilityService::with_seed(Arc::new(repository), Arc::new(FakeBookings::default()), 1);
    let eligible = selector
        .eligible_doctors(Specialty::Orthopedics, monday_at(8))
        .await
        .unwrap();

    let ids: Vec<Uuid> = eligible.iter().map(|doctor| doctor.id).collect();
    let expected: Vec<Uuid> = doctors.iter().map(|doctor| doctor.id).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn slot_lookup_failure_propagates() {
    let doctors = Arc::new(InMemoryDoctorRepository::new());
    let doctor = Doctor::register(registration("Medico", "medico@voll.med", "123456", Specialty::Cardiology)).unwrap();
    doctors.insert(&doctor).await.unwrap();

    let mut slots = MockSlots::new();
    slots
        .expect_find_active_appointment()
        .returning(|_, _| Err(StoreError::Backend("connection refused".to_string())));

    let selector = AvailabilityService::with_seed(doctors, Arc::new(slots), 1);
    let result = selector.pick_available_doctor(Specialty::Cardiology, monday_at(10)).await;

    assert_matches!(result, Err(StoreError::Backend(msg)) if msg == "connection refused");
}

#[tokio::test]
async fn doctor_lookup_failure_propagates_without_checking_slots() {
    let mut doctors = MockDoctors::new();
    doctors
        .expect_find_active_by_specialty()
        .times(1)
        .returning(|_| Err(StoreError::Backend("timeout".to_string())));

    let mut slots = MockSlots::new();
    slots.expect_find_active_appointment().never();

    let selector = AvailabilityService::with_seed(Arc::new(doctors), Arc::new(slots), 1);
    let result = selector.pick_available_doctor(Specialty::Cardiology, monday_at(10)).await;

    assert_matches!(result, Err(StoreError::Backend(_)));
}

#[tokio::test]
async fn queries_slots_for_exact_instant() {
    let doctors = Arc::new(InMemoryDoctorRepository::new());
    let doctor = Doctor::register(registration("Medico", "medico@voll.med", "123456", Specialty::Cardiology)).unwrap();
    doctors.insert(&doctor).await.unwrap();

    let expected_id = doctor.id;
    let mut slots = MockSlots::new();
    slots
        .expect_find_active_appointment()
        .withf(move |id, at| *id == expected_id && *at == monday_at(10))
        .times(1)
        .returning(|_, _| Ok(None));

    let selector = AvailabilityService::with_seed(doctors, Arc::new(slots), 1);
    let picked = selector.pick_available_doctor(Specialty::Cardiology, monday_at(10)).await.unwrap();
    assert_eq!(picked, Some(doctor));
}
