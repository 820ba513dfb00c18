use std::collections::HashSet;
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::models::{BookingRecord, Doctor, PatientRecord};

use super::BookingStore;

/// Degraded-mode store: a fixed doctor roster plus in-memory records.
/// Bookings made against it still round-trip through lookup-by-code; they
/// just do not survive a restart.
pub struct DemoStore {
    inner: Mutex<DemoData>,
}

#[derive(Default)]
struct DemoData {
    patients: Vec<PatientRecord>,
    confirmations: Vec<BookingRecord>,
    booked: Vec<(String, NaiveDate, String)>,
}

pub fn demo_doctors() -> Vec<Doctor> {
    vec![
        Doctor {
            id: "doc-1".to_string(),
            name: "Dr. Asha Mehta".to_string(),
            specialty: "General Medicine".to_string(),
            qualification: "MBBS, MD".to_string(),
            hours_start: "9:00 AM".to_string(),
            hours_end: "5:00 PM".to_string(),
        },
        Doctor {
            id: "doc-2".to_string(),
            name: "Dr. Rohan Iyer".to_string(),
            specialty: "Cardiology".to_string(),
            qualification: "MBBS, DM Cardiology".to_string(),
            hours_start: "10:00 AM".to_string(),
            hours_end: "4:00 PM".to_string(),
        },
        Doctor {
            id: "doc-3".to_string(),
            name: "Dr. Priya Nair".to_string(),
            specialty: "Pediatrics".to_string(),
            qualification: "MBBS, MD Pediatrics".to_string(),
            hours_start: "8:00 AM".to_string(),
            hours_end: "6:00 PM".to_string(),
        },
    ]
}

impl DemoStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(DemoData::default()),
        }
    }
}

impl Default for DemoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingStore for DemoStore {
    fn list_doctors(&self) -> anyhow::Result<Vec<Doctor>> {
        Ok(demo_doctors())
    }

    fn find_doctor(&self, id: &str) -> anyhow::Result<Option<Doctor>> {
        Ok(demo_doctors().into_iter().find(|d| d.id == id))
    }

    fn code_exists(&self, code: &str) -> anyhow::Result<bool> {
        let data = self.inner.lock().unwrap();
        Ok(data.patients.iter().any(|p| p.code == code))
    }

    fn insert_patient(&self, patient: &PatientRecord) -> anyhow::Result<()> {
        let mut data = self.inner.lock().unwrap();
        data.patients.push(patient.clone());
        Ok(())
    }

    fn find_patient_by_code(&self, code: &str) -> anyhow::Result<Option<PatientRecord>> {
        let data = self.inner.lock().unwrap();
        Ok(data.patients.iter().find(|p| p.code == code).cloned())
    }

    fn insert_confirmation(&self, record: &BookingRecord) -> anyhow::Result<()> {
        let mut data = self.inner.lock().unwrap();
        data.confirmations.push(record.clone());
        Ok(())
    }

    fn find_confirmation_for_patient(
        &self,
        patient_id: &str,
    ) -> anyhow::Result<Option<BookingRecord>> {
        let data = self.inner.lock().unwrap();
        Ok(data
            .confirmations
            .iter()
            .find(|c| c.patient_id == patient_id)
            .cloned())
    }

    fn reserve_slot(&self, doctor_id: &str, date: NaiveDate, time: &str) -> anyhow::Result<()> {
        let mut data = self.inner.lock().unwrap();
        data.booked
            .push((doctor_id.to_string(), date, time.to_string()));
        Ok(())
    }

    fn booked_times(&self, doctor_id: &str, date: NaiveDate) -> anyhow::Result<HashSet<String>> {
        let data = self.inner.lock().unwrap();
        Ok(data
            .booked
            .iter()
            .filter(|(d, on, _)| d == doctor_id && *on == date)
            .map(|(_, _, time)| time.clone())
            .collect())
    }
}
