use chrono::{Duration, NaiveDate, NaiveTime, Timelike};

use crate::models::{DaySlot, Doctor, TimeSlot};
use crate::services::store::BookingStore;

pub const SLOT_MINUTES: i64 = 30;
/// Lunch break: no slot may start within 13:00-13:59.
const LUNCH_HOUR: u32 = 13;
/// The upcoming-dates view covers the next 7 days, today excluded.
const UPCOMING_DAYS: i64 = 7;

/// Parses a working-hours bound. Accepts "h:mm AM/PM" and "h AM/PM".
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(s, "%I %p"))
        .ok()
}

/// Generates the ordered slot-start times for a working-hours window.
///
/// The start is rounded up to the next half-hour boundary, then stepped in
/// 30-minute increments; a slot is kept only if it ends by the window's end
/// and does not start during lunch. An unparsable bound falls back to the
/// fixed default list instead of erroring.
pub fn generate_slots(start: &str, end: &str) -> Vec<NaiveTime> {
    match (parse_time_of_day(start), parse_time_of_day(end)) {
        (Some(s), Some(e)) => walk_window(s, e),
        _ => {
            tracing::debug!(start, end, "unparsable working-hours window, using defaults");
            default_slots()
        }
    }
}

/// The fallback list: 10 half-hour slots from 10:00 AM to 3:30 PM, lunch
/// excluded.
pub fn default_slots() -> Vec<NaiveTime> {
    let ten = NaiveTime::from_hms_opt(10, 0, 0).expect("valid time");
    let four = NaiveTime::from_hms_opt(16, 0, 0).expect("valid time");
    walk_window(ten, four)
}

fn walk_window(start: NaiveTime, end: NaiveTime) -> Vec<NaiveTime> {
    let mut slots = vec![];
    let Some(mut t) = round_up_to_boundary(start) else {
        return slots;
    };
    loop {
        let (slot_end, wrapped) = t.overflowing_add_signed(Duration::minutes(SLOT_MINUTES));
        if wrapped != 0 || slot_end > end {
            break;
        }
        if t.hour() != LUNCH_HOUR {
            slots.push(t);
        }
        t = slot_end;
    }
    slots
}

/// Rounds up to the next :00/:30 boundary; None when that would cross
/// midnight.
fn round_up_to_boundary(t: NaiveTime) -> Option<NaiveTime> {
    let minutes = t.hour() * 60 + t.minute();
    let rounded = minutes.div_ceil(30) * 30;
    NaiveTime::from_hms_opt(rounded / 60, rounded % 60, 0)
}

/// The slot list for one (doctor, date), with each slot's booked flag set
/// from the store. Callers that present options to users must filter booked
/// slots out first.
pub fn day_view(
    store: &dyn BookingStore,
    doctor: &Doctor,
    date: NaiveDate,
) -> anyhow::Result<DaySlot> {
    let booked = store.booked_times(&doctor.id, date)?;
    let slots = generate_slots(&doctor.hours_start, &doctor.hours_end)
        .into_iter()
        .map(|time| TimeSlot {
            time,
            booked: booked.contains(&TimeSlot::open(time).label()),
        })
        .collect();
    Ok(DaySlot::new(date, slots))
}

/// The next 7 calendar dates strictly after `today`, each with its full
/// slot list. Fully-booked days are annotated, never hidden here.
pub fn upcoming_days(
    store: &dyn BookingStore,
    doctor: &Doctor,
    today: NaiveDate,
) -> anyhow::Result<Vec<DaySlot>> {
    (1..=UPCOMING_DAYS)
        .map(|offset| day_view(store, doctor, today + Duration::days(offset)))
        .collect()
}

/// Upcoming view for a bare working-hours window with no doctor to
/// reconcile against; every slot is open.
pub fn upcoming_days_for_window(start: &str, end: &str, today: NaiveDate) -> Vec<DaySlot> {
    let times = generate_slots(start, end);
    (1..=UPCOMING_DAYS)
        .map(|offset| {
            DaySlot::new(
                today + Duration::days(offset),
                times.iter().copied().map(TimeSlot::open).collect(),
            )
        })
        .collect()
}
