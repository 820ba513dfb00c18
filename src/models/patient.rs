use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::Doctor;

/// Accumulator for the data collected across a booking conversation.
/// Fields fill in one state at a time; only a fully populated draft is
/// eligible for persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientDraft {
    pub name: Option<String>,
    pub blood_group: Option<String>,
    pub age: Option<u8>,
    pub gender: Option<String>,
    pub contact: Option<String>,
    pub symptoms: Vec<String>,
    pub matched_symptoms: Vec<String>,
    pub possible_conditions: Vec<String>,
    pub doctor: Option<Doctor>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

/// Persisted snapshot of a completed draft, tagged with the confirmation
/// code that serves as its external lookup key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub age: u8,
    pub gender: String,
    pub blood_group: String,
    pub contact: String,
    pub code: String,
    pub symptoms: Vec<String>,
    pub matched_symptoms: Vec<String>,
    pub possible_conditions: Vec<String>,
    pub created_at: NaiveDateTime,
}
