use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::address::{Address, AddressData, AddressUpdate};
use shared_models::error::AppError;
use shared_models::validation::{self, FieldError};

static NATIONAL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{3}\.?[0-9]{3}\.?[0-9]{3}-?[0-9]{2}$").expect("valid national id pattern")
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub address: Address,
    pub active: bool,
}

impl PartialEq for Patient {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Patient {}

impl Patient {
    pub fn register(data: PatientRegistration) -> Result<Self, PatientError> {
        validation::non_blank("name", &data.name)?;
        validation::email("email", &data.email)?;
        validation::non_blank("phone", &data.phone)?;
        validation::matches("national_id", &data.national_id, &NATIONAL_ID, "11 digits (000.000.000-00)")?;
        let address = Address::try_from(data.address)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: data.name.trim().to_string(),
            email: data.email.trim().to_string(),
            phone: data.phone.trim().to_string(),
            national_id: data.national_id,
            address,
            active: true,
        })
    }

    pub fn apply_update(&mut self, update: PatientUpdate) -> Result<(), PatientError> {
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
pub struct PatientRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub national_id: String,
    pub address: AddressData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<AddressUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub national_id: String,
}

impl From<&Patient> for PatientSummary {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            email: patient.email.clone(),
            national_id: patient.national_id.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(#[from] FieldError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::Validation(_) => AppError::ValidationError(err.to_string()),
            PatientError::Store(store) => store.into(),
        }
    }
}
