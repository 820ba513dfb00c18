use chrono::Utc;
use rand::Rng;

use crate::models::{
    AppointmentSummary, BookingRecord, BookingStatus, BookingView, DoctorSummary, PatientDraft,
    PatientRecord, PatientSummary,
};
use crate::services::store::BookingStore;

/// A write step failed mid-transaction. Steps already committed are not
/// rolled back; the error names the step so the gap is visible in logs.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("booking draft is missing required fields")]
    IncompleteDraft,

    #[error("failed to generate a confirmation code: {0}")]
    CodeGeneration(#[source] anyhow::Error),

    #[error("failed to save patient information: {0}")]
    PatientWrite(#[source] anyhow::Error),

    #[error("failed to save appointment confirmation: {0}")]
    ConfirmationWrite(#[source] anyhow::Error),

    #[error("failed to reserve the selected time slot: {0}")]
    SlotReserve(#[source] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub code: String,
    pub patient_id: String,
    pub confirmation_id: String,
}

/// Draws 8-digit codes until one is free. The 10^8 space makes collisions
/// rare but not impossible; there is no retry bound.
pub fn generate_code(store: &dyn BookingStore) -> anyhow::Result<String> {
    let mut rng = rand::thread_rng();
    loop {
        let code = format!("{:08}", rng.gen_range(0..100_000_000u32));
        if !store.code_exists(&code)? {
            return Ok(code);
        }
    }
}

/// Persists a completed draft as patient record, confirmation record and
/// booked-slot marker, in that order. A failed step aborts the rest and is
/// reported; earlier writes stay (an orphaned patient record is an accepted
/// inconsistency, surfaced through the returned error and the log).
pub fn complete_booking(
    store: &dyn BookingStore,
    draft: &PatientDraft,
) -> Result<BookingOutcome, BookingError> {
    let (name, blood_group, age, gender, contact, doctor, date, time) = match (
        &draft.name,
        &draft.blood_group,
        draft.age,
        &draft.gender,
        &draft.contact,
        &draft.doctor,
        draft.date,
        &draft.time,
    ) {
        (
            Some(name),
            Some(blood_group),
            Some(age),
            Some(gender),
            Some(contact),
            Some(doctor),
            Some(date),
            Some(time),
        ) => (name, blood_group, age, gender, contact, doctor, date, time),
        _ => return Err(BookingError::IncompleteDraft),
    };

    let code = generate_code(store).map_err(BookingError::CodeGeneration)?;
    let now = Utc::now().naive_utc();

    let patient = PatientRecord {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.clone(),
        age,
        gender: gender.clone(),
        blood_group: blood_group.clone(),
        contact: contact.clone(),
        code: code.clone(),
        symptoms: draft.symptoms.clone(),
        matched_symptoms: draft.matched_symptoms.clone(),
        possible_conditions: draft.possible_conditions.clone(),
        created_at: now,
    };
    store
        .insert_patient(&patient)
        .map_err(BookingError::PatientWrite)?;

    let confirmation = BookingRecord {
        id: uuid::Uuid::new_v4().to_string(),
        patient_id: patient.id.clone(),
        doctor_id: doctor.id.clone(),
        doctor_name: doctor.name.clone(),
        date,
        time: time.clone(),
        status: BookingStatus::Confirmed,
        code: code.clone(),
        created_at: now,
    };
    store
        .insert_confirmation(&confirmation)
        .map_err(BookingError::ConfirmationWrite)?;

    store
        .reserve_slot(&doctor.id, date, time)
        .map_err(BookingError::SlotReserve)?;

    tracing::info!(code = %code, doctor = %doctor.id, date = %date, time = %time, "booking committed");

    Ok(BookingOutcome {
        code,
        patient_id: patient.id,
        confirmation_id: confirmation.id,
    })
}

/// Resolves a confirmation code to the combined booking view. A code with
/// no patient, or a patient with no confirmation, is Not Found rather than
/// an error.
pub fn lookup_by_code(
    store: &dyn BookingStore,
    code: &str,
) -> anyhow::Result<Option<BookingView>> {
    let Some(patient) = store.find_patient_by_code(code)? else {
        return Ok(None);
    };
    let Some(confirmation) = store.find_confirmation_for_patient(&patient.id)? else {
        return Ok(None);
    };

    let specialty = store
        .find_doctor(&confirmation.doctor_id)?
        .map(|d| d.specialty)
        .unwrap_or_else(|| "N/A".to_string());

    Ok(Some(BookingView {
        code: code.to_string(),
        patient: PatientSummary {
            name: patient.name,
            age: patient.age,
            gender: patient.gender,
            blood_group: patient.blood_group,
            contact: patient.contact,
        },
        doctor: DoctorSummary {
            name: confirmation.doctor_name.clone(),
            specialty,
        },
        appointment: AppointmentSummary {
            date: confirmation.date.format("%A, %B %-d, %Y").to_string(),
            time: confirmation.time.clone(),
            status: confirmation.status.as_str().to_string(),
            created_at: confirmation
                .created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        },
        patient_id: patient.id,
        confirmation_id: confirmation.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use chrono::NaiveDate;

    use crate::models::Doctor;
    use crate::services::store::demo::demo_doctors;
    use crate::services::store::DemoStore;

    fn full_draft(doctor: Doctor) -> PatientDraft {
        PatientDraft {
            name: Some("Asha Mehta".to_string()),
            blood_group: Some("B+".to_string()),
            age: Some(30),
            gender: Some("Female".to_string()),
            contact: Some("9876543210".to_string()),
            symptoms: vec!["fever".to_string(), "cough".to_string()],
            matched_symptoms: vec!["fever".to_string(), "cough".to_string()],
            possible_conditions: vec!["Flu".to_string()],
            doctor: Some(doctor),
            date: NaiveDate::from_ymd_opt(2025, 10, 15),
            time: Some("10:30 AM".to_string()),
        }
    }

    #[test]
    fn test_generated_code_is_eight_digits() {
        let store = DemoStore::new();
        let code = generate_code(&store).unwrap();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_booking_round_trip() {
        let store = DemoStore::new();
        let doctor = demo_doctors().remove(0);
        let draft = full_draft(doctor.clone());

        let outcome = complete_booking(&store, &draft).unwrap();
        let view = lookup_by_code(&store, &outcome.code).unwrap().unwrap();

        assert_eq!(view.patient.name, "Asha Mehta");
        assert_eq!(view.patient.age, 30);
        assert_eq!(view.patient.contact, "9876543210");
        assert_eq!(view.doctor.name, doctor.name);
        assert_eq!(view.doctor.specialty, doctor.specialty);
        assert_eq!(view.appointment.time, "10:30 AM");
        assert_eq!(view.appointment.status, "confirmed");
        assert_eq!(view.patient_id, outcome.patient_id);
        assert_eq!(view.confirmation_id, outcome.confirmation_id);

        // Slot marker landed too.
        let booked = store
            .booked_times(&doctor.id, draft.date.unwrap())
            .unwrap();
        assert!(booked.contains("10:30 AM"));
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let store = DemoStore::new();
        let draft = full_draft(demo_doctors().remove(0));
        let outcome = complete_booking(&store, &draft).unwrap();

        let first = lookup_by_code(&store, &outcome.code).unwrap().unwrap();
        let second = lookup_by_code(&store, &outcome.code).unwrap().unwrap();
        assert_eq!(first.patient.name, second.patient.name);
        assert_eq!(first.appointment.date, second.appointment.date);
        assert_eq!(first.confirmation_id, second.confirmation_id);
    }

    #[test]
    fn test_unknown_code_is_not_found_not_error() {
        let store = DemoStore::new();
        assert!(lookup_by_code(&store, "00000000").unwrap().is_none());
    }

    #[test]
    fn test_incomplete_draft_rejected_before_any_write() {
        let store = DemoStore::new();
        let mut draft = full_draft(demo_doctors().remove(0));
        draft.contact = None;

        let err = complete_booking(&store, &draft).unwrap_err();
        assert!(matches!(err, BookingError::IncompleteDraft));
    }

    /// Store whose confirmation write always fails, for exercising the
    /// abort-without-rollback path. Remembers the code of the last patient
    /// written so the test can find the orphan.
    struct FailingConfirmations {
        inner: DemoStore,
        last_patient_code: std::sync::Mutex<Option<String>>,
    }

    impl FailingConfirmations {
        fn new() -> Self {
            Self {
                inner: DemoStore::new(),
                last_patient_code: std::sync::Mutex::new(None),
            }
        }
    }

    impl BookingStore for FailingConfirmations {
        fn list_doctors(&self) -> anyhow::Result<Vec<Doctor>> {
            self.inner.list_doctors()
        }
        fn find_doctor(&self, id: &str) -> anyhow::Result<Option<Doctor>> {
            self.inner.find_doctor(id)
        }
        fn code_exists(&self, code: &str) -> anyhow::Result<bool> {
            self.inner.code_exists(code)
        }
        fn insert_patient(&self, patient: &PatientRecord) -> anyhow::Result<()> {
            *self.last_patient_code.lock().unwrap() = Some(patient.code.clone());
            self.inner.insert_patient(patient)
        }
        fn find_patient_by_code(&self, code: &str) -> anyhow::Result<Option<PatientRecord>> {
            self.inner.find_patient_by_code(code)
        }
        fn insert_confirmation(&self, _record: &BookingRecord) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
        fn find_confirmation_for_patient(
            &self,
            patient_id: &str,
        ) -> anyhow::Result<Option<BookingRecord>> {
            self.inner.find_confirmation_for_patient(patient_id)
        }
        fn reserve_slot(
            &self,
            doctor_id: &str,
            date: NaiveDate,
            time: &str,
        ) -> anyhow::Result<()> {
            self.inner.reserve_slot(doctor_id, date, time)
        }
        fn booked_times(
            &self,
            doctor_id: &str,
            date: NaiveDate,
        ) -> anyhow::Result<HashSet<String>> {
            self.inner.booked_times(doctor_id, date)
        }
    }

    #[test]
    fn test_confirmation_failure_leaves_orphaned_patient_and_no_slot() {
        let store = FailingConfirmations::new();
        let draft = full_draft(demo_doctors().remove(0));

        let err = complete_booking(&store, &draft).unwrap_err();
        assert!(matches!(err, BookingError::ConfirmationWrite(_)));

        // The patient write committed and stays; later steps never ran.
        let code = store.last_patient_code.lock().unwrap().clone().unwrap();
        let orphan = store.find_patient_by_code(&code).unwrap().unwrap();
        assert_eq!(orphan.name, "Asha Mehta");
        assert!(lookup_by_code(&store, &code).unwrap().is_none());

        let booked = store.booked_times("doc-1", draft.date.unwrap()).unwrap();
        assert!(booked.is_empty());
    }
}
