pub mod booking;
pub mod rules;

pub use booking::BookingService;
pub use rules::BookingRules;
