pub mod booking;
pub mod doctor;
pub mod patient;
pub mod reply;
pub mod session;
pub mod slots;

pub use booking::{
    AppointmentSummary, BookingRecord, BookingStatus, BookingView, DoctorSummary, PatientSummary,
};
pub use doctor::Doctor;
pub use patient::{PatientDraft, PatientRecord};
pub use reply::{BotReply, ReplyKind};
pub use session::{Session, SessionState, SessionTurn};
pub use slots::{DaySlot, TimeSlot};
