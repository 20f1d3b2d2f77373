//! Weekly availability slots offered by a doctor.
//!
//! A slot is a recurring interval on one weekday. Its status gates booking:
//! only an `available` slot may be referenced by a new appointment.

use crate::domain::foundation::{SlotId, StateMachine, Timestamp, UserId, ValidationError};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{clock_time, DayOfWeek};

/// Bookability of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    #[default]
    Available,
    Reserved,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::Reserved => "reserved",
        }
    }

    /// Returns true if a new appointment may reference a slot in this status.
    pub fn is_bookable(&self) -> bool {
        matches!(self, SlotStatus::Available)
    }
}

impl StateMachine for SlotStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SlotStatus::*;
        matches!((self, target), (Available, Reserved) | (Reserved, Available))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            SlotStatus::Available => vec![SlotStatus::Reserved],
            SlotStatus::Reserved => vec![SlotStatus::Available],
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(SlotStatus::Available),
            "reserved" => Ok(SlotStatus::Reserved),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown slot status '{}'", other),
            )),
        }
    }
}

/// A doctor's bookable interval on a weekday.
///
/// # Invariants
///
/// - `start_time < end_time`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub doctor_id: UserId,
    pub day_of_week: DayOfWeek,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    pub status: SlotStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields required to create a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSlot {
    pub doctor_id: UserId,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: SlotStatus,
}

impl NewSlot {
    /// Creates an available slot after checking the interval.
    pub fn new(
        doctor_id: UserId,
        day_of_week: DayOfWeek,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Result<Self, ValidationError> {
        validate_interval(&start_time, &end_time)?;
        Ok(Self {
            doctor_id,
            day_of_week,
            start_time,
            end_time,
            status: SlotStatus::Available,
        })
    }

    pub fn with_status(mut self, status: SlotStatus) -> Self {
        self.status = status;
        self
    }

    pub fn into_slot(self, id: SlotId, now: Timestamp) -> Slot {
        Slot {
            id,
            doctor_id: self.doctor_id,
            day_of_week: self.day_of_week,
            start_time: self.start_time,
            end_time: self.end_time,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotPatch {
    pub day_of_week: Option<DayOfWeek>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub status: Option<SlotStatus>,
}

impl SlotPatch {
    pub fn status(status: SlotStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Slot {
    /// Returns a copy with the patch applied and `updated_at` refreshed.
    ///
    /// # Errors
    ///
    /// Fails when the resulting interval is empty or inverted.
    pub fn patched(&self, patch: &SlotPatch, now: Timestamp) -> Result<Slot, ValidationError> {
        let mut next = self.clone();
        if let Some(day) = patch.day_of_week {
            next.day_of_week = day;
        }
        if let Some(start) = patch.start_time {
            next.start_time = start;
        }
        if let Some(end) = patch.end_time {
            next.end_time = end;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        validate_interval(&next.start_time, &next.end_time)?;
        next.updated_at = now;
        Ok(next)
    }
}

fn validate_interval(start: &NaiveTime, end: &NaiveTime) -> Result<(), ValidationError> {
    if start >= end {
        return Err(ValidationError::invalid_format(
            "end_time",
            format!(
                "end time {} must be after start time {}",
                clock_time::format_clock_time(end),
                clock_time::format_clock_time(start)
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn doctor() -> UserId {
        UserId::new("doc-1").unwrap()
    }

    fn monday_slot() -> Slot {
        NewSlot::new(doctor(), DayOfWeek::Monday, hm(9, 0), hm(17, 0))
            .unwrap()
            .into_slot(SlotId::new(), Timestamp::now())
    }

    #[test]
    fn new_slot_defaults_to_available() {
        let slot = NewSlot::new(doctor(), DayOfWeek::Monday, hm(9, 0), hm(17, 0)).unwrap();
        assert_eq!(slot.status, SlotStatus::Available);
    }

    #[test]
    fn new_slot_rejects_zero_length_interval() {
        let err = NewSlot::new(doctor(), DayOfWeek::Monday, hm(9, 0), hm(9, 0)).unwrap_err();
        assert_eq!(err.field(), "end_time");
    }

    #[test]
    fn patch_changes_only_supplied_fields() {
        let slot = monday_slot();
        let patch = SlotPatch {
            end_time: Some(hm(12, 0)),
            ..Default::default()
        };

        let next = slot.patched(&patch, Timestamp::now()).unwrap();

        assert_eq!(next.start_time, hm(9, 0));
        assert_eq!(next.end_time, hm(12, 0));
        assert_eq!(next.day_of_week, DayOfWeek::Monday);
        assert_eq!(next.status, SlotStatus::Available);
    }

    #[test]
    fn patch_validates_resulting_interval() {
        let slot = monday_slot();
        let patch = SlotPatch {
            start_time: Some(hm(18, 0)),
            ..Default::default()
        };
        assert!(slot.patched(&patch, Timestamp::now()).is_err());
    }

    #[test]
    fn only_available_is_bookable() {
        assert!(SlotStatus::Available.is_bookable());
        assert!(!SlotStatus::Reserved.is_bookable());
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("booked".parse::<SlotStatus>().is_err());
        assert!(serde_json::from_str::<SlotStatus>("\"held\"").is_err());
    }

    #[test]
    fn slot_serializes_times_as_hh_mm() {
        let json = serde_json::to_value(monday_slot()).unwrap();
        assert_eq!(json["start_time"], "09:00");
        assert_eq!(json["end_time"], "17:00");
        assert_eq!(json["day_of_week"], "monday");
        assert_eq!(json["status"], "available");
    }

    proptest! {
        #[test]
        fn interval_accepted_iff_start_before_end(
            a in 0u32..(24 * 60),
            b in 0u32..(24 * 60),
        ) {
            let start = hm(a / 60, a % 60);
            let end = hm(b / 60, b % 60);
            let result = NewSlot::new(doctor(), DayOfWeek::Friday, start, end);
            prop_assert_eq!(result.is_ok(), a < b);
        }

        #[test]
        fn patched_slot_keeps_interval_invariant(
            start in proptest::option::of(0u32..(24 * 60)),
            end in proptest::option::of(0u32..(24 * 60)),
        ) {
            let slot = monday_slot();
            let patch = SlotPatch {
                start_time: start.map(|m| hm(m / 60, m % 60)),
                end_time: end.map(|m| hm(m / 60, m % 60)),
                ..Default::default()
            };
            if let Ok(next) = slot.patched(&patch, Timestamp::now()) {
                prop_assert!(next.start_time < next.end_time);
            }
        }
    }
}
