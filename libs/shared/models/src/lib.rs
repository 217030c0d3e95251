pub mod address;
pub mod error;
pub mod validation;

pub use address::{Address, AddressData, AddressUpdate};
pub use error::AppError;
pub use validation::FieldError;
