use chrono::{DateTime, Duration, Utc};

use shared_models::entities::Appointment;

/// Half-width of the exclusion window around a booking. Two appointments
/// for one doctor may not start within this span of each other, bounds
/// included.
pub const CONFLICT_WINDOW_MINUTES: i64 = 30;

/// The inclusive scan range around a proposed start instant.
pub fn conflict_window(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let half = Duration::minutes(CONFLICT_WINDOW_MINUTES);
    (at - half, at + half)
}

/// True when any row in `neighbors` collides with the proposed start,
/// ignoring the row named by `exclude_id` (the booking being updated).
/// `neighbors` is expected to already be the window scan for one doctor.
pub fn has_conflict(neighbors: &[Appointment], exclude_id: Option<i64>) -> bool {
    neighbors
        .iter()
        .any(|existing| Some(existing.id) != exclude_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(id: i64) -> Appointment {
        Appointment {
            id,
            doctor_id: 1,
            patient_id: 1,
            appointment_time: Utc.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap(),
            status: 0,
            prescription_added: false,
        }
    }

    #[test]
    fn window_is_symmetric_and_inclusive() {
        let at = Utc.with_ymd_and_hms(2025, 6, 10, 10, 0, 0).unwrap();
        let (from, to) = conflict_window(at);
        assert_eq!(from, Utc.with_ymd_and_hms(2025, 6, 10, 9, 30, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2025, 6, 10, 10, 30, 0).unwrap());
    }

    #[test]
    fn self_row_never_conflicts() {
        assert!(has_conflict(&[row(7)], None));
        assert!(!has_conflict(&[row(7)], Some(7)));
        assert!(has_conflict(&[row(7), row(8)], Some(7)));
    }
}
