use serde::Serialize;

use crate::models::{BookingView, DaySlot, Doctor, TimeSlot};

/// Discriminator the web client switches on to render the right widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Menu,
    TextInput,
    BloodGroupSelection,
    GenderSelection,
    DoctorSelection,
    DateSelection,
    TimeSelection,
    BookingDetails,
    BookingConfirmed,
    Error,
    EndConfirmation,
}

/// Structured reply for one conversation turn. Only the fields relevant to
/// the reply kind are populated; the rest are omitted from the JSON body.
#[derive(Debug, Clone, Serialize)]
pub struct BotReply {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ReplyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctors: Option<Vec<Doctor>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<DaySlot>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_slots: Option<Vec<TimeSlot>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingView>,
}

impl BotReply {
    fn base(kind: ReplyKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            placeholder: None,
            options: None,
            doctors: None,
            dates: None,
            time_slots: None,
            unique_code: None,
            booking: None,
        }
    }

    pub fn menu(message: impl Into<String>) -> Self {
        Self::base(ReplyKind::Menu, message)
    }

    pub fn text_input(message: impl Into<String>, placeholder: &str) -> Self {
        Self {
            placeholder: Some(placeholder.to_string()),
            ..Self::base(ReplyKind::TextInput, message)
        }
    }

    pub fn blood_group_selection(message: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            options: Some(options),
            ..Self::base(ReplyKind::BloodGroupSelection, message)
        }
    }

    pub fn gender_selection(message: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            options: Some(options),
            ..Self::base(ReplyKind::GenderSelection, message)
        }
    }

    pub fn doctor_selection(message: impl Into<String>, doctors: Vec<Doctor>) -> Self {
        Self {
            doctors: Some(doctors),
            ..Self::base(ReplyKind::DoctorSelection, message)
        }
    }

    pub fn date_selection(message: impl Into<String>, dates: Vec<DaySlot>) -> Self {
        Self {
            dates: Some(dates),
            ..Self::base(ReplyKind::DateSelection, message)
        }
    }

    pub fn time_selection(message: impl Into<String>, time_slots: Vec<TimeSlot>) -> Self {
        Self {
            time_slots: Some(time_slots),
            ..Self::base(ReplyKind::TimeSelection, message)
        }
    }

    pub fn booking_details(message: impl Into<String>, view: BookingView) -> Self {
        Self {
            booking: Some(view),
            ..Self::base(ReplyKind::BookingDetails, message)
        }
    }

    pub fn booking_confirmed(message: impl Into<String>, code: &str) -> Self {
        Self {
            unique_code: Some(code.to_string()),
            ..Self::base(ReplyKind::BookingConfirmed, message)
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::base(ReplyKind::Error, message)
    }

    pub fn end_confirmation(message: impl Into<String>) -> Self {
        Self::base(ReplyKind::EndConfirmation, message)
    }
}
