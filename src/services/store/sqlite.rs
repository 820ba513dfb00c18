use std::collections::HashSet;
use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::{self, queries};
use crate::models::{BookingRecord, Doctor, PatientRecord};

use super::BookingStore;

/// SQLite-backed store. The connection lives behind a mutex; each call
/// locks, runs one query, and releases.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let conn = db::init_db(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl BookingStore for SqliteStore {
    fn list_doctors(&self) -> anyhow::Result<Vec<Doctor>> {
        let conn = self.conn.lock().unwrap();
        queries::list_doctors(&conn)
    }

    fn find_doctor(&self, id: &str) -> anyhow::Result<Option<Doctor>> {
        let conn = self.conn.lock().unwrap();
        queries::find_doctor(&conn, id)
    }

    fn code_exists(&self, code: &str) -> anyhow::Result<bool> {
        let conn = self.conn.lock().unwrap();
        queries::code_exists(&conn, code)
    }

    fn insert_patient(&self, patient: &PatientRecord) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        queries::insert_patient(&conn, patient)
    }

    fn find_patient_by_code(&self, code: &str) -> anyhow::Result<Option<PatientRecord>> {
        let conn = self.conn.lock().unwrap();
        queries::find_patient_by_code(&conn, code)
    }

    fn insert_confirmation(&self, record: &BookingRecord) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        queries::insert_confirmation(&conn, record)
    }

    fn find_confirmation_for_patient(
        &self,
        patient_id: &str,
    ) -> anyhow::Result<Option<BookingRecord>> {
        let conn = self.conn.lock().unwrap();
        queries::find_confirmation_for_patient(&conn, patient_id)
    }

    fn reserve_slot(&self, doctor_id: &str, date: NaiveDate, time: &str) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        queries::reserve_slot(&conn, doctor_id, date, time)
    }

    fn booked_times(&self, doctor_id: &str, date: NaiveDate) -> anyhow::Result<HashSet<String>> {
        let conn = self.conn.lock().unwrap();
        queries::booked_times(&conn, doctor_id, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn store() -> SqliteStore {
        SqliteStore::open(":memory:").unwrap()
    }

    #[test]
    fn test_seeded_doctor_roster() {
        let store = store();
        let doctors = store.list_doctors().unwrap();
        assert_eq!(doctors.len(), 3);
        assert!(store.find_doctor("doc-1").unwrap().is_some());
        assert!(store.find_doctor("nope").unwrap().is_none());
    }

    #[test]
    fn test_patient_round_trip() {
        let store = store();
        let patient = PatientRecord {
            id: "p-1".to_string(),
            name: "Asha Mehta".to_string(),
            age: 30,
            gender: "Female".to_string(),
            blood_group: "B+".to_string(),
            contact: "9876543210".to_string(),
            code: "12345678".to_string(),
            symptoms: vec!["fever".to_string()],
            matched_symptoms: vec!["fever".to_string()],
            possible_conditions: vec!["Flu".to_string()],
            created_at: Utc::now().naive_utc(),
        };

        assert!(!store.code_exists("12345678").unwrap());
        store.insert_patient(&patient).unwrap();
        assert!(store.code_exists("12345678").unwrap());

        let found = store.find_patient_by_code("12345678").unwrap().unwrap();
        assert_eq!(found.name, "Asha Mehta");
        assert_eq!(found.symptoms, vec!["fever"]);
        assert!(store.find_patient_by_code("00000000").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let store = store();
        let mut patient = PatientRecord {
            id: "p-1".to_string(),
            name: "A".to_string(),
            age: 1,
            gender: "Other".to_string(),
            blood_group: "O+".to_string(),
            contact: "9876543210".to_string(),
            code: "11112222".to_string(),
            symptoms: vec![],
            matched_symptoms: vec![],
            possible_conditions: vec![],
            created_at: Utc::now().naive_utc(),
        };
        store.insert_patient(&patient).unwrap();

        patient.id = "p-2".to_string();
        assert!(store.insert_patient(&patient).is_err());
    }

    #[test]
    fn test_booked_times_scoped_to_doctor_and_date() {
        let store = store();
        let date = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        let other = NaiveDate::from_ymd_opt(2025, 10, 16).unwrap();

        store.reserve_slot("doc-1", date, "10:30 AM").unwrap();
        store.reserve_slot("doc-2", date, "11:00 AM").unwrap();

        let times = store.booked_times("doc-1", date).unwrap();
        assert_eq!(times.len(), 1);
        assert!(times.contains("10:30 AM"));
        assert!(store.booked_times("doc-1", other).unwrap().is_empty());
    }
}
