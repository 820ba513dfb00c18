use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Confirmation record linking a patient to a doctor, date and time slot.
/// Immutable once created; status changes happen in administrative flows
/// outside this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: BookingStatus,
    pub code: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "confirmed" => BookingStatus::Confirmed,
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Pending,
        }
    }
}

/// Combined view assembled on lookup-by-code.
#[derive(Debug, Clone, Serialize)]
pub struct BookingView {
    pub code: String,
    pub patient: PatientSummary,
    pub doctor: DoctorSummary,
    pub appointment: AppointmentSummary,
    pub patient_id: String,
    pub confirmation_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    pub name: String,
    pub age: u8,
    pub gender: String,
    pub blood_group: String,
    pub contact: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorSummary {
    pub name: String,
    pub specialty: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentSummary {
    pub date: String,
    pub time: String,
    pub status: String,
    pub created_at: String,
}
