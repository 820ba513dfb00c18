use chrono::{NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};

/// One bookable 30-minute interval on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    #[serde(serialize_with = "serialize_slot_time")]
    pub time: NaiveTime,
    pub booked: bool,
}

impl TimeSlot {
    pub fn open(time: NaiveTime) -> Self {
        Self {
            time,
            booked: false,
        }
    }

    /// Display form, e.g. "10:30 AM".
    pub fn label(&self) -> String {
        self.time.format("%-I:%M %p").to_string()
    }
}

fn serialize_slot_time<S: Serializer>(time: &NaiveTime, ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(&time.format("%-I:%M %p").to_string())
}

/// A calendar date with its generated slot list. Built fresh per request;
/// only materialized bookings are persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DaySlot {
    pub date: NaiveDate,
    pub display_name: String,
    pub time_slots: Vec<TimeSlot>,
    pub open_slots: usize,
}

impl DaySlot {
    pub fn new(date: NaiveDate, time_slots: Vec<TimeSlot>) -> Self {
        let open_slots = time_slots.iter().filter(|s| !s.booked).count();
        Self {
            date,
            display_name: date.format("%A, %B %-d, %Y").to_string(),
            time_slots,
            open_slots,
        }
    }
}
