use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{DaySlot, Doctor, PatientDraft, TimeSlot};

/// Conversational state of one intake session. The happy path is linear;
/// `WaitingCode` is a side branch that returns to `Greeting` after a lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Greeting,
    WaitingCode,
    WaitingName,
    WaitingBloodGroup,
    WaitingAge,
    WaitingGender,
    WaitingContact,
    WaitingSymptoms,
    WaitingDoctorSelection,
    WaitingDateSelection,
    WaitingTimeSelection,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Greeting => "greeting",
            SessionState::WaitingCode => "waiting_code",
            SessionState::WaitingName => "waiting_name",
            SessionState::WaitingBloodGroup => "waiting_blood_group",
            SessionState::WaitingAge => "waiting_age",
            SessionState::WaitingGender => "waiting_gender",
            SessionState::WaitingContact => "waiting_contact",
            SessionState::WaitingSymptoms => "waiting_symptoms",
            SessionState::WaitingDoctorSelection => "waiting_doctor_selection",
            SessionState::WaitingDateSelection => "waiting_date_selection",
            SessionState::WaitingTimeSelection => "waiting_time_selection",
        }
    }
}

/// One user/bot exchange, kept for inspection only; nothing reads it back.
#[derive(Debug, Clone, Serialize)]
pub struct SessionTurn {
    pub user: String,
    pub bot: String,
    pub at: NaiveDateTime,
}

/// Per-session conversational context. Selection indices sent by the user
/// are resolved against the `offered_*` sequences from the immediately
/// preceding turn, never against a fresh query.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub state: SessionState,
    pub draft: PatientDraft,
    pub offered_doctors: Vec<Doctor>,
    pub offered_dates: Vec<DaySlot>,
    pub offered_slots: Vec<TimeSlot>,
    pub history: Vec<SessionTurn>,
}

impl Session {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            state: SessionState::Greeting,
            draft: PatientDraft::default(),
            offered_doctors: vec![],
            offered_dates: vec![],
            offered_slots: vec![],
            history: vec![],
        }
    }

    /// Back to the main menu: discards the draft and all pending offers,
    /// keeps the turn history.
    pub fn reset(mut self) -> Self {
        self.state = SessionState::Greeting;
        self.draft = PatientDraft::default();
        self.offered_doctors.clear();
        self.offered_dates.clear();
        self.offered_slots.clear();
        self
    }
}
