pub mod demo;
pub mod sqlite;

pub use demo::DemoStore;
pub use sqlite::SqliteStore;

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::models::{BookingRecord, Doctor, PatientRecord};

/// Persistence boundary for the intake flow.
///
/// Two implementations exist: [`SqliteStore`] (the real one) and
/// [`DemoStore`] (in-memory fallback when the database cannot be opened).
/// The choice is made once at startup; nothing downstream branches on it.
/// All calls are fallible, finite-latency and may block the handling task.
pub trait BookingStore: Send + Sync {
    fn list_doctors(&self) -> anyhow::Result<Vec<Doctor>>;
    fn find_doctor(&self, id: &str) -> anyhow::Result<Option<Doctor>>;

    fn code_exists(&self, code: &str) -> anyhow::Result<bool>;
    fn insert_patient(&self, patient: &PatientRecord) -> anyhow::Result<()>;
    fn find_patient_by_code(&self, code: &str) -> anyhow::Result<Option<PatientRecord>>;

    fn insert_confirmation(&self, record: &BookingRecord) -> anyhow::Result<()>;
    fn find_confirmation_for_patient(
        &self,
        patient_id: &str,
    ) -> anyhow::Result<Option<BookingRecord>>;

    /// Marks (doctor, date, time) as taken so later availability queries
    /// exclude it. Read-then-write: no atomicity guarantee across racing
    /// bookings.
    fn reserve_slot(&self, doctor_id: &str, date: NaiveDate, time: &str) -> anyhow::Result<()>;
    fn booked_times(&self, doctor_id: &str, date: NaiveDate) -> anyhow::Result<HashSet<String>>;
}
