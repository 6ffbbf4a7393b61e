use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use shared_store::ClinicStore;

use crate::models::{DoctorError, SlotValidation};

/// The fixed daily booking grid: every half hour from 09:00 to 17:00
/// inclusive, 17 slots.
pub fn daily_slot_grid() -> Vec<NaiveTime> {
    let mut slots = Vec::with_capacity(17);
    for hour in 9..17 {
        slots.push(NaiveTime::from_hms_opt(hour, 0, 0).expect("valid grid time"));
        slots.push(NaiveTime::from_hms_opt(hour, 30, 0).expect("valid grid time"));
    }
    slots.push(NaiveTime::from_hms_opt(17, 0, 0).expect("valid grid time"));
    slots
}

/// Computes a doctor's free slots for a day. Always recomputed from the
/// store, so the result reflects the latest writes at call time.
pub struct AvailabilityService {
    store: Arc<dyn ClinicStore>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }

    /// Free slots for `doctor_id` on `date`, in grid order. A slot is taken
    /// iff an appointment for the doctor starts at that exact time-of-day on
    /// the date. Unknown doctors yield an empty list, not an error.
    pub async fn availability(
        &self,
        doctor_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, DoctorError> {
        debug!("Computing availability for doctor {} on {}", doctor_id, date);

        let exists = self
            .store
            .doctor_exists(doctor_id)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;
        if !exists {
            return Ok(Vec::new());
        }

        let appointments = self
            .store
            .appointments_for_doctor_on_day(doctor_id, date)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        let booked: Vec<NaiveTime> = appointments.iter().map(|a| a.time_of_day()).collect();

        Ok(daily_slot_grid()
            .into_iter()
            .filter(|slot| !booked.contains(slot))
            .collect())
    }

    /// Check one concrete instant against the doctor's free slots. This is
    /// the operation that distinguishes an unknown doctor from a taken slot.
    pub async fn validate_slot(
        &self,
        doctor_id: i64,
        at: DateTime<Utc>,
    ) -> Result<SlotValidation, DoctorError> {
        let exists = self
            .store
            .doctor_exists(doctor_id)
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;
        if !exists {
            return Ok(SlotValidation::UnknownDoctor);
        }

        let free = self.availability(doctor_id, at.date_naive()).await?;
        if free.contains(&at.time()) {
            Ok(SlotValidation::Valid)
        } else {
            Ok(SlotValidation::SlotTaken)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_seventeen_half_hour_slots() {
        let grid = daily_slot_grid();
        assert_eq!(grid.len(), 17);
        assert_eq!(grid[0], NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(grid[16], NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        // Ascending, 30 minutes apart.
        for pair in grid.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_minutes(), 30);
        }
    }
}
