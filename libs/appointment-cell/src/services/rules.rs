use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Weekday};

use crate::models::AppointmentError;

/// Scheduling constraints applied when booking or cancelling.
#[derive(Debug, Clone)]
pub struct BookingRules {
    pub opening_hour: u32,
    /// Latest hour an appointment may start in.
    pub last_start_hour: u32,
    pub closed_on: Weekday,
    pub min_booking_notice_minutes: i64,
    pub min_cancellation_notice_hours: i64,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            opening_hour: 7,
            last_start_hour: 18,
            closed_on: Weekday::Sun,
            min_booking_notice_minutes: 30,
            min_cancellation_notice_hours: 24,
        }
    }
}

impl BookingRules {
    pub fn check_clinic_hours(&self, at: NaiveDateTime) -> Result<(), AppointmentError> {
        let hour = at.hour();
        if at.weekday() == self.closed_on || hour < self.opening_hour || hour > self.last_start_hour {
            return Err(AppointmentError::OutsideClinicHours(at));
        }
        Ok(())
    }

    pub fn check_booking_notice(&self, now: NaiveDateTime, at: NaiveDateTime) -> Result<(), AppointmentError> {
        if at - now < Duration::minutes(self.min_booking_notice_minutes) {
            return Err(AppointmentError::InsufficientNotice {
                minutes: self.min_booking_notice_minutes,
            });
        }
        Ok(())
    }

    pub fn check_cancellation_notice(&self, now: NaiveDateTime, at: NaiveDateTime) -> Result<(), AppointmentError> {
        if at - now < Duration::hours(self.min_cancellation_notice_hours) {
            return Err(AppointmentError::CancellationTooLate {
                hours: self.min_cancellation_notice_hours,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // 2030-01-07 is a Monday
    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn clinic_hours_bounds() {
        let rules = BookingRules::default();
        assert!(rules.check_clinic_hours(at(7, 7, 0)).is_ok());
        assert!(rules.check_clinic_hours(at(7, 18, 0)).is_ok());
        assert!(rules.check_clinic_hours(at(12, 10, 0)).is_ok()); // Saturday
        assert!(rules.check_clinic_hours(at(7, 6, 59)).is_err());
        assert!(rules.check_clinic_hours(at(7, 19, 0)).is_err());
        assert!(rules.check_clinic_hours(at(13, 10, 0)).is_err()); // Sunday
    }

    #[test]
    fn booking_needs_thirty_minutes_notice() {
        let rules = BookingRules::default();
        assert!(rules.check_booking_notice(at(7, 9, 30), at(7, 10, 0)).is_ok());
        assert!(matches!(
            rules.check_booking_notice(at(7, 9, 31), at(7, 10, 0)),
            Err(AppointmentError::InsufficientNotice { minutes: 30 })
        ));
    }

    #[test]
    fn cancellation_needs_a_day_notice() {
        let rules = BookingRules::default();
        assert!(rules.check_cancellation_notice(at(6, 10, 0), at(7, 10, 0)).is_ok());
        assert!(rules.check_cancellation_notice(at(6, 10, 1), at(7, 10, 0)).is_err());
    }
}
