use serde::{Deserialize, Serialize};

use crate::validation::{self, FieldError, POSTAL_CODE, STATE_CODE};

/// Postal address embedded in a doctor or patient record. Never shared
/// between records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub district: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
    pub number: Option<String>,
    pub complement: Option<String>,
}

/// Flat address input as submitted on registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressData {
    pub street: String,
    pub district: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
    pub number: Option<String>,
    pub complement: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressUpdate {
    pub street: Option<String>,
    pub district: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
}

impl TryFrom<AddressData> for Address {
    type Error = FieldError;

    fn try_from(data: AddressData) -> Result<Self, Self::Error> {
        let address = Address {
            street: data.street,
            district: data.district,
            postal_code: data.postal_code,
            city: data.city,
            state: data.state,
            number: data.number,
            complement: data.complement,
        };
        address.validate()?;
        Ok(address)
    }
}

impl Address {
    pub fn validate(&self) -> Result<(), FieldError> {
        validation::non_blank("address.street", &self.street)?;
        validation::non_blank("address.district", &self.district)?;
        validation::matches("address.postal_code", &self.postal_code, &POSTAL_CODE, "8 digits")?;
        validation::non_blank("address.city", &self.city)?;
        validation::matches("address.state", &self.state, &STATE_CODE, "a 2-letter state code")?;
        Ok(())
    }

    /// Merge the supplied fields, then re-validate the result.
    pub fn apply(&self, update: AddressUpdate) -> Result<Address, FieldError> {
        let merged = Address {
            street: update.street.unwrap_or_else(|| self.street.clone()),
            district: update.district.unwrap_or_else(|| self.district.clone()),
            postal_code: update.postal_code.unwrap_or_else(|| self.postal_code.clone()),
            city: update.city.unwrap_or_else(|| self.city.clone()),
            state: update.state.unwrap_or_else(|| self.state.clone()),
            number: update.number.or_else(|| self.number.clone()),
            complement: update.complement.or_else(|| self.complement.clone()),
        };
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> AddressData {
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

    #[test]
    fn accepts_well_formed_address() {
        let address = Address::try_from(data()).unwrap();
        assert_eq!(address.city, "Brasilia");
        assert_eq!(address.number, None);
    }

    #[test]
    fn rejects_bad_postal_code() {
        let mut input = data();
        input.postal_code = "7000".to_string();
        let err = Address::try_from(input).unwrap_err();
        assert_eq!(err.field, "address.postal_code");
    }

    #[test]
    fn update_keeps_unspecified_fields() {
        let address = Address::try_from(data()).unwrap();
        let updated = address
            .apply(AddressUpdate {
                number: Some("42".to_string()),
                city: Some("Goiania".to_string()),
                state: Some("GO".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.street, "rua xpto");
        assert_eq!(updated.city, "Goiania");
        assert_eq!(updated.number.as_deref(), Some("42"));
    }

    #[test]
    fn update_is_revalidated() {
        let address = Address::try_from(data()).unwrap();
        let err = address
            .apply(AddressUpdate {
                state: Some("Distrito Federal".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.field, "address.state");
    }
}
