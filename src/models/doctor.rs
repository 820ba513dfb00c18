use serde::{Deserialize, Serialize};

/// A clinician as presented to patients. Read-only from the conversation's
/// perspective; rows come from the doctors table or the demo roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub qualification: String,
    /// Working-hours window bounds, e.g. "9:00 AM" / "5:00 PM".
    pub hours_start: String,
    pub hours_end: String,
}

impl Doctor {
    pub fn hours_label(&self) -> String {
        format!("{} - {}", self.hours_start, self.hours_end)
    }
}
