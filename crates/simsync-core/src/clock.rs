//! Calendar timestamp composition from raw clock fields
//!
//! The simulator stores its clock as six independent scalars. A reading
//! is only usable when the scalars combine into a valid calendar
//! timestamp; the simulator can be attached but show garbage here while
//! no scene is loaded.

use chrono::{NaiveDate, NaiveDateTime};

use crate::{SyncError, SyncResult};

/// Compose the six raw fields into a calendar timestamp.
///
/// The fractional second is rounded up and clamped to [0, 59] before
/// composition: the simulator advances the fractional field between our
/// reads, and rounding down would re-publish a second that is already
/// in the past.
pub fn compose_reading(
    year: i32,
    month: i32,
    day: i32,
    hour: u8,
    minute: u8,
    second: f32,
) -> SyncResult<NaiveDateTime> {
    let second = (second.ceil() as i64).clamp(0, 59) as u32;
    let month = u32::try_from(month).map_err(|_| SyncError::InvalidClock)?;
    let day = u32::try_from(day).map_err(|_| SyncError::InvalidClock)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour as u32, minute as u32, second))
        .ok_or(SyncError::InvalidClock)
}

/// Signed difference `later - earlier` in fractional seconds
pub fn delta_seconds(later: NaiveDateTime, earlier: NaiveDateTime) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_compose_valid_reading() {
        let reading = compose_reading(2024, 7, 4, 13, 5, 42.0).unwrap();
        assert_eq!(
            reading,
            NaiveDate::from_ymd_opt(2024, 7, 4)
                .unwrap()
                .and_hms_opt(13, 5, 42)
                .unwrap()
        );
    }

    #[test]
    fn test_fractional_second_rounds_up() {
        let reading = compose_reading(2024, 7, 4, 13, 5, 41.2).unwrap();
        assert_eq!(reading.time().second(), 42);
    }

    #[test]
    fn test_second_clamped_to_minute() {
        // 59.5 would ceil to 60, which is not a valid second
        let reading = compose_reading(2024, 7, 4, 13, 5, 59.5).unwrap();
        assert_eq!(reading.time().second(), 59);

        let reading = compose_reading(2024, 7, 4, 13, 5, -3.0).unwrap();
        assert_eq!(reading.time().second(), 0);
    }

    #[test]
    fn test_invalid_day_is_unusable() {
        assert!(matches!(
            compose_reading(2024, 7, 32, 13, 5, 0.0),
            Err(SyncError::InvalidClock)
        ));
    }

    #[test]
    fn test_negative_month_is_unusable() {
        assert!(matches!(
            compose_reading(2024, -1, 4, 13, 5, 0.0),
            Err(SyncError::InvalidClock)
        ));
    }

    #[test]
    fn test_delta_seconds_sign() {
        let earlier = compose_reading(2024, 7, 4, 13, 5, 40.0).unwrap();
        let later = compose_reading(2024, 7, 4, 13, 5, 42.0).unwrap();

        assert_eq!(delta_seconds(later, earlier), 2.0);
        assert_eq!(delta_seconds(earlier, later), -2.0);
    }
}
