use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::address::{Address, AddressData, AddressUpdate};
use shared_models::error::AppError;
use shared_models::validation::{self, FieldError};

static LICENSE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4,6}$").expect("valid license pattern"));

/// Serialized in SCREAMING_SNAKE_CASE; accepted in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Specialty {
    Orthopedics,
    Cardiology,
    Gynecology,
    Dermatology,
}

impl Specialty {
    pub const ALL: [Specialty; 4] = [
        Specialty::Orthopedics,
        Specialty::Cardiology,
        Specialty::Gynecology,
        Specialty::Dermatology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Specialty::Orthopedics => "ORTHOPEDICS",
            Specialty::Cardiology => "CARDIOLOGY",
            Specialty::Gynecology => "GYNECOLOGY",
            Specialty::Dermatology => "DERMATOLOGY",
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Specialty {
    type Err = DoctorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Specialty::ALL
            .into_iter()
            .find(|specialty| specialty.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DoctorError::InvalidSpecialty(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Specialty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Registered doctor. Two values are the same doctor iff their ids match,
/// so a record reloaded from any store compares equal to the original.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub specialty: Specialty,
    pub address: Address,
    pub active: bool,
}

impl PartialEq for Doctor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Doctor {}

impl Doctor {
    /// Build an active doctor from registration data, validating every field.
    pub fn register(data: DoctorRegistration) -> Result<Self, DoctorError> {
        validation::non_blank("name", &data.name)?;
        validation::email("email", &data.email)?;
        validation::non_blank("phone", &data.phone)?;
        validation::matches("license_number", &data.license_number, &LICENSE_NUMBER, "4 to 6 digits")?;
        let address = Address::try_from(data.address)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: data.name.trim().to_string(),
            email: data.email.trim().to_string(),
            phone: data.phone.trim().to_string(),
            license_number: data.license_number,
            specialty: data.specialty,
            address,
            active: true,
        })
    }

    /// Name, phone and address are the only mutable registration fields.
    pub fn apply_update(&mut self, update: DoctorUpdate) -> Result<(), DoctorError> {
        if let Some(name) = update.name {
            validation::non_blank("name", &name)?;
            self.name = name.trim().to_string();
        }
        if let Some(phone) = update.phone {
            validation::non_blank("phone", &phone)?;
            self.phone = phone.trim().to_string();
        }
        if let Some(address) = update.address {
            self.address = self.address.apply(address)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub specialty: Specialty,
    pub address: AddressData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<AddressUpdate>,
}

/// Listing row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub license_number: String,
    pub specialty: Specialty,
}

impl From<&Doctor> for DoctorSummary {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name.clone(),
            email: doctor.email.clone(),
            license_number: doctor.license_number.clone(),
            specialty: doctor.specialty,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub specialty: Specialty,
    pub at: NaiveDateTime,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Invalid specialty: {0}")]
    InvalidSpecialty(String),

    #[error("Validation error: {0}")]
    Validation(#[from] FieldError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::InvalidSpecialty(_) | DoctorError::Validation(_) => {
                AppError::ValidationError(err.to_string())
            }
            DoctorError::Store(store) => store.into(),
        }
    }
}
