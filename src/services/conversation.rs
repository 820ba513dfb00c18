use chrono::Utc;

use crate::models::{
    BotReply, DaySlot, PatientDraft, Session, SessionState, SessionTurn, TimeSlot,
};
use crate::services::validators::{
    validate_age, validate_blood_group, validate_contact, validate_gender, validate_name,
    BLOOD_GROUPS, GENDERS,
};
use crate::services::{availability, booking, symptoms};
use crate::state::AppState;

const MENU_PHRASES: [&str; 5] = ["reset_to_menu", "menu", "main menu", "back", "start over"];

const MENU_TEXT: &str = "Welcome to the clinic assistant!\n\nI can help you with:\n\
    \u{2022} Check an existing booking with your unique code\n\
    \u{2022} Book a new doctor's appointment\n\nPlease select an option below:";

/// Processes one turn: loads the session, applies global overrides, routes
/// to the handler for the current state and stores the updated session.
/// Handlers consume the session value and hand back a new one; the shared
/// store is written exactly once per turn.
pub fn process_message(state: &AppState, session_id: &str, message: &str) -> anyhow::Result<BotReply> {
    let session = state.sessions.get_or_create(session_id);
    let message = message.trim();

    tracing::info!(
        session = session_id,
        state = session.state.as_str(),
        "processing turn"
    );

    // Global overrides, checked before state dispatch.
    if MENU_PHRASES.contains(&message.to_lowercase().as_str()) {
        let session = session.reset();
        let reply = BotReply::menu(MENU_TEXT);
        finish_turn(state, session, message, &reply);
        return Ok(reply);
    }
    if message.eq_ignore_ascii_case("end") {
        // One-shot prompt; the session is stored untouched.
        let reply = BotReply::end_confirmation(
            "Are you sure you want to go back to the main menu? This will end your current session.",
        );
        finish_turn(state, session, message, &reply);
        return Ok(reply);
    }

    let (session, reply) = match session.state {
        SessionState::Greeting => handle_greeting(session, message),
        SessionState::WaitingCode => handle_code(state, session, message)?,
        SessionState::WaitingName => handle_name(session, message),
        SessionState::WaitingBloodGroup => handle_blood_group(session, message),
        SessionState::WaitingAge => handle_age(session, message),
        SessionState::WaitingGender => handle_gender(session, message),
        SessionState::WaitingContact => handle_contact(session, message),
        SessionState::WaitingSymptoms => handle_symptoms(state, session, message)?,
        SessionState::WaitingDoctorSelection => handle_doctor_selection(state, session, message)?,
        SessionState::WaitingDateSelection => handle_date_selection(session, message),
        SessionState::WaitingTimeSelection => handle_time_selection(state, session, message),
    };

    finish_turn(state, session, message, &reply);
    Ok(reply)
}

fn finish_turn(state: &AppState, mut session: Session, user: &str, reply: &BotReply) {
    session.history.push(SessionTurn {
        user: user.to_string(),
        bot: reply.message.clone(),
        at: Utc::now().naive_utc(),
    });
    state.sessions.put(session);
}

// ── State handlers ──

fn handle_greeting(mut session: Session, message: &str) -> (Session, BotReply) {
    let lower = message.to_lowercase();

    if lower.contains("check") && lower.contains("booking") {
        session.state = SessionState::WaitingCode;
        let reply = BotReply::text_input(
            "Please enter your 8-digit unique code to access your booking details:",
            "Enter 8-digit code",
        );
        (session, reply)
    } else if lower.contains("book") && lower.contains("appointment") {
        session.state = SessionState::WaitingName;
        session.draft = PatientDraft::default();
        let reply = BotReply::text_input(
            "Great! Let's book your appointment. Please enter your full name:",
            "Enter your full name",
        );
        (session, reply)
    } else {
        (session, BotReply::menu(MENU_TEXT))
    }
}

fn handle_code(state: &AppState, mut session: Session, message: &str) -> anyhow::Result<(Session, BotReply)> {
    let code = message.trim();

    if code.len() != 8 || !code.chars().all(|c| c.is_ascii_digit()) {
        // Malformed input re-prompts in place.
        let reply = BotReply::text_input(
            "Invalid code format. Please enter an 8-digit code:",
            "Enter 8-digit code",
        );
        return Ok((session, reply));
    }

    // Side branch over: back to the menu whatever the outcome.
    session.state = SessionState::Greeting;

    match booking::lookup_by_code(state.store.as_ref(), code)? {
        Some(view) => {
            let text = format!(
                "Booking details for code {code}:\n\n\
                 Patient: {} ({} years, {})\n\
                 Blood group: {}\nContact: {}\n\n\
                 Doctor: {} ({})\n\
                 Date: {}\nTime: {}\nStatus: {}\n\n\
                 Type 'menu' to return to the main menu.",
                view.patient.name,
                view.patient.age,
                view.patient.gender,
                view.patient.blood_group,
                view.patient.contact,
                view.doctor.name,
                view.doctor.specialty,
                view.appointment.date,
                view.appointment.time,
                view.appointment.status,
            );
            Ok((session, BotReply::booking_details(text, view)))
        }
        None => {
            let reply = BotReply::error(
                "Code not found. Please check your code and try again.\n\nType 'menu' to return to the main menu.",
            );
            Ok((session, reply))
        }
    }
}

fn handle_name(mut session: Session, message: &str) -> (Session, BotReply) {
    match validate_name(message) {
        Ok(name) => {
            session.state = SessionState::WaitingBloodGroup;
            let reply = BotReply::blood_group_selection(
                format!("Hello {name}! Please select your blood group:"),
                BLOOD_GROUPS.iter().map(|g| g.to_string()).collect(),
            );
            session.draft.name = Some(name);
            (session, reply)
        }
        Err(e) => {
            let reply = BotReply::text_input(
                format!("{e}\nPlease enter your full name:"),
                "Enter your full name",
            );
            (session, reply)
        }
    }
}

fn handle_blood_group(mut session: Session, message: &str) -> (Session, BotReply) {
    match validate_blood_group(message) {
        Ok(group) => {
            session.state = SessionState::WaitingAge;
            let reply = BotReply::text_input(
                format!("Blood group: {group}\n\nPlease enter your age:"),
                "Enter your age",
            );
            session.draft.blood_group = Some(group);
            (session, reply)
        }
        Err(e) => {
            let reply = BotReply::blood_group_selection(
                e.to_string(),
                BLOOD_GROUPS.iter().map(|g| g.to_string()).collect(),
            );
            (session, reply)
        }
    }
}

fn handle_age(mut session: Session, message: &str) -> (Session, BotReply) {
    match validate_age(message) {
        Ok(age) => {
            session.draft.age = Some(age);
            session.state = SessionState::WaitingGender;
            let reply = BotReply::gender_selection(
                format!("Age: {age}\n\nPlease select your gender:"),
                GENDERS.iter().map(|g| g.to_string()).collect(),
            );
            (session, reply)
        }
        Err(e) => {
            let reply = BotReply::text_input(e.to_string(), "Enter your age");
            (session, reply)
        }
    }
}

fn handle_gender(mut session: Session, message: &str) -> (Session, BotReply) {
    match validate_gender(message) {
        Ok(gender) => {
            session.state = SessionState::WaitingContact;
            let reply = BotReply::text_input(
                format!("Gender: {gender}\n\nPlease enter your contact number:"),
                "Enter your contact number",
            );
            session.draft.gender = Some(gender);
            (session, reply)
        }
        Err(e) => {
            let reply = BotReply::gender_selection(
                e.to_string(),
                GENDERS.iter().map(|g| g.to_string()).collect(),
            );
            (session, reply)
        }
    }
}

fn handle_contact(mut session: Session, message: &str) -> (Session, BotReply) {
    match validate_contact(message) {
        Ok(contact) => {
            session.state = SessionState::WaitingSymptoms;
            session.draft.symptoms.clear();
            let reply = BotReply::text_input(
                format!(
                    "Contact: {contact}\n\nPlease describe your symptoms (e.g., fever, headache, blocked nose, cough).\n\nYou can type multiple symptoms separated by commas."
                ),
                "Describe your symptoms",
            );
            session.draft.contact = Some(contact);
            (session, reply)
        }
        Err(e) => {
            let reply = BotReply::text_input(e.to_string(), "Enter your contact number");
            (session, reply)
        }
    }
}

fn handle_symptoms(
    state: &AppState,
    mut session: Session,
    message: &str,
) -> anyhow::Result<(Session, BotReply)> {
    let entered: Vec<String> = message
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if entered.is_empty() {
        let reply = BotReply::text_input(
            "Please describe at least one symptom (e.g., fever, headache, cough):",
            "Describe your symptoms",
        );
        return Ok((session, reply));
    }

    session.draft.symptoms.extend(entered.iter().cloned());

    let report = symptoms::analyze(&session.draft.symptoms, state.lemmatizer.as_ref());
    session.draft.matched_symptoms = report.matched.clone();
    session.draft.possible_conditions = report.conditions.clone();

    let doctors = state.store.list_doctors()?;
    session.offered_doctors = doctors.clone();
    session.state = SessionState::WaitingDoctorSelection;

    let matched_label = if report.matched.is_empty() {
        "General symptoms detected".to_string()
    } else {
        report.matched.join(", ")
    };
    let mut text = format!(
        "Recorded symptoms: {}\n\nMatched symptoms: {matched_label}\n",
        entered.join(", "),
    );
    if !report.conditions.is_empty() {
        text.push_str(&format!("Possible conditions: {}\n", report.conditions_label()));
    }
    text.push_str("\nAvailable doctors:\nPlease select a doctor from the options below:");

    Ok((session, BotReply::doctor_selection(text, doctors)))
}

fn handle_doctor_selection(
    state: &AppState,
    mut session: Session,
    message: &str,
) -> anyhow::Result<(Session, BotReply)> {
    let Some(index) = parse_selection(message, session.offered_doctors.len()) else {
        let reply = reoffer_doctors(&session);
        return Ok((session, reply));
    };

    let doctor = session.offered_doctors[index].clone();
    let today = Utc::now().date_naive();
    let days = availability::upcoming_days(state.store.as_ref(), &doctor, today)?;

    // Presentation choice: fully-booked days are offered nowhere.
    let open_days: Vec<DaySlot> = days.into_iter().filter(|d| d.open_slots > 0).collect();

    session.draft.doctor = Some(doctor.clone());
    session.offered_dates = open_days.clone();
    session.state = SessionState::WaitingDateSelection;

    let text = format!(
        "Selected doctor: {} ({}, {})\nWorking hours: {}\n\nAvailable appointment dates:\nPlease select a date from the options below:",
        doctor.name,
        doctor.specialty,
        doctor.qualification,
        doctor.hours_label(),
    );
    Ok((session, BotReply::date_selection(text, open_days)))
}

fn handle_date_selection(mut session: Session, message: &str) -> (Session, BotReply) {
    let Some(index) = parse_selection(message, session.offered_dates.len()) else {
        let reply = reoffer_dates(&session);
        return (session, reply);
    };

    let day = session.offered_dates[index].clone();

    // Booked slots are filtered out before the user ever sees them.
    let open_slots: Vec<TimeSlot> = day
        .time_slots
        .iter()
        .copied()
        .filter(|s| !s.booked)
        .collect();

    session.draft.date = Some(day.date);
    session.offered_slots = open_slots.clone();
    session.state = SessionState::WaitingTimeSelection;

    let text = format!(
        "Selected date: {}\n\nAvailable time slots:\nPlease select a time slot from the options below:",
        day.display_name,
    );
    (session, BotReply::time_selection(text, open_slots))
}

fn handle_time_selection(
    state: &AppState,
    mut session: Session,
    message: &str,
) -> (Session, BotReply) {
    let Some(index) = parse_selection(message, session.offered_slots.len()) else {
        let reply = reoffer_slots(&session);
        return (session, reply);
    };

    let slot = session.offered_slots[index];
    session.draft.time = Some(slot.label());

    match booking::complete_booking(state.store.as_ref(), &session.draft) {
        Ok(outcome) => {
            let draft = &session.draft;
            let text = format!(
                "Appointment confirmed!\n\n\
                 Your unique code: {}\n\
                 Save this code to check your booking details anytime.\n\n\
                 Patient: {}\nContact: {}\nDoctor: {}\nDate: {}\nTime slot: {}\n\n\
                 Type 'menu' to return to the main menu.",
                outcome.code,
                draft.name.as_deref().unwrap_or(""),
                draft.contact.as_deref().unwrap_or(""),
                draft.doctor.as_ref().map(|d| d.name.as_str()).unwrap_or(""),
                draft
                    .date
                    .map(|d| d.format("%A, %B %-d, %Y").to_string())
                    .unwrap_or_default(),
                slot.label(),
            );
            let reply = BotReply::booking_confirmed(text, &outcome.code);
            (session.reset(), reply)
        }
        Err(e) => {
            // Fail closed: the draft cannot be salvaged mid-failure, so the
            // session goes back to the menu either way.
            tracing::error!(error = %e, session = %session.id, "booking transaction failed");
            let reply = BotReply::error(format!(
                "Booking failed: {e}\n\nPlease try again or contact support.\n\nType 'menu' to return to the main menu."
            ));
            (session.reset(), reply)
        }
    }
}

// ── Selection helpers ──

/// 1-based ordinal into the most recent offer; anything else is a
/// rejection. Returns the 0-based index.
fn parse_selection(message: &str, len: usize) -> Option<usize> {
    let n: usize = message.trim().parse().ok()?;
    if n >= 1 && n <= len {
        Some(n - 1)
    } else {
        None
    }
}

fn reoffer_doctors(session: &Session) -> BotReply {
    BotReply::doctor_selection(
        "Invalid selection. Please select a doctor from the options below:",
        session.offered_doctors.clone(),
    )
}

fn reoffer_dates(session: &Session) -> BotReply {
    BotReply::date_selection(
        "Invalid selection. Please select a date from the options below:",
        session.offered_dates.clone(),
    )
}

fn reoffer_slots(session: &Session) -> BotReply {
    BotReply::time_selection(
        "Invalid selection. Please select a time slot from the options below:",
        session.offered_slots.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::ReplyKind;
    use crate::services::nlp::Passthrough;
    use crate::services::sessions::SessionStore;
    use crate::services::store::DemoStore;

    fn test_state() -> AppState {
        AppState {
            config: AppConfig {
                port: 3000,
                database_url: ":memory:".to_string(),
                lexicon_path: "data/lemmas.txt".to_string(),
            },
            store: Box::new(DemoStore::new()),
            sessions: SessionStore::new(),
            lemmatizer: Box::new(Passthrough),
        }
    }

    fn send(state: &AppState, msg: &str) -> BotReply {
        process_message(state, "s-1", msg).unwrap()
    }

    fn current_state(state: &AppState) -> SessionState {
        state.sessions.get("s-1").unwrap().state
    }

    #[test]
    fn test_unrecognized_greeting_shows_menu() {
        let state = test_state();
        let reply = send(&state, "hello");
        assert_eq!(reply.kind, ReplyKind::Menu);
        assert_eq!(current_state(&state), SessionState::Greeting);
    }

    #[test]
    fn test_booking_intent_starts_intake() {
        let state = test_state();
        let reply = send(&state, "I want to book an appointment");
        assert_eq!(reply.kind, ReplyKind::TextInput);
        assert_eq!(current_state(&state), SessionState::WaitingName);
    }

    #[test]
    fn test_invalid_age_does_not_advance() {
        let state = test_state();
        send(&state, "book appointment");
        send(&state, "Asha Mehta");
        send(&state, "B+");
        let reply = send(&state, "150");
        assert_eq!(reply.kind, ReplyKind::TextInput);
        assert_eq!(current_state(&state), SessionState::WaitingAge);

        // A valid age then advances.
        send(&state, "30");
        assert_eq!(current_state(&state), SessionState::WaitingGender);
    }

    #[test]
    fn test_menu_override_discards_draft() {
        let state = test_state();
        send(&state, "book appointment");
        send(&state, "Asha Mehta");
        let reply = send(&state, "menu");
        assert_eq!(reply.kind, ReplyKind::Menu);
        let session = state.sessions.get("s-1").unwrap();
        assert_eq!(session.state, SessionState::Greeting);
        assert!(session.draft.name.is_none());
    }

    #[test]
    fn test_end_override_does_not_mutate_state() {
        let state = test_state();
        send(&state, "book appointment");
        let reply = send(&state, "end");
        assert_eq!(reply.kind, ReplyKind::EndConfirmation);
        assert_eq!(current_state(&state), SessionState::WaitingName);
    }

    #[test]
    fn test_selection_out_of_range_reoffers_unchanged() {
        let state = test_state();
        walk_to_doctor_selection(&state);

        let offered_before = state.sessions.get("s-1").unwrap().offered_doctors.len();
        for bad in ["0", "4", "abc", "-1", ""] {
            let reply = send(&state, bad);
            assert_eq!(reply.kind, ReplyKind::DoctorSelection, "input: {bad:?}");
            assert_eq!(current_state(&state), SessionState::WaitingDoctorSelection);
            assert_eq!(
                state.sessions.get("s-1").unwrap().offered_doctors.len(),
                offered_before
            );
        }
    }

    #[test]
    fn test_full_happy_path_books_and_resets() {
        let state = test_state();
        walk_to_doctor_selection(&state);

        let reply = send(&state, "1");
        assert_eq!(reply.kind, ReplyKind::DateSelection);
        assert!(!reply.dates.as_ref().unwrap().is_empty());

        let reply = send(&state, "1");
        assert_eq!(reply.kind, ReplyKind::TimeSelection);
        assert!(!reply.time_slots.as_ref().unwrap().is_empty());

        let reply = send(&state, "1");
        assert_eq!(reply.kind, ReplyKind::BookingConfirmed);
        let code = reply.unique_code.clone().unwrap();
        assert_eq!(code.len(), 8);

        let session = state.sessions.get("s-1").unwrap();
        assert_eq!(session.state, SessionState::Greeting);
        assert!(session.draft.name.is_none());

        // The booking is retrievable through the code side-branch.
        send(&state, "check my booking");
        assert_eq!(current_state(&state), SessionState::WaitingCode);
        let reply = send(&state, &code);
        assert_eq!(reply.kind, ReplyKind::BookingDetails);
        let view = reply.booking.unwrap();
        assert_eq!(view.patient.name, "Asha Mehta");
        assert_eq!(current_state(&state), SessionState::Greeting);
    }

    #[test]
    fn test_booked_slot_not_offered_again() {
        let state = test_state();
        walk_to_doctor_selection(&state);
        send(&state, "1");
        send(&state, "1");
        let first = send(&state, "1");
        assert_eq!(first.kind, ReplyKind::BookingConfirmed);

        // Second run for the same doctor and date.
        walk_to_doctor_selection(&state);
        send(&state, "1");
        let reply = send(&state, "1");
        let slots = reply.time_slots.unwrap();
        assert!(slots.iter().all(|s| !s.booked));
        // One slot fewer than the doctor's full day.
        let doctor = crate::services::store::demo::demo_doctors().remove(0);
        let full = availability::generate_slots(&doctor.hours_start, &doctor.hours_end);
        assert_eq!(slots.len(), full.len() - 1);
    }

    #[test]
    fn test_code_side_branch_not_found_returns_to_menu() {
        let state = test_state();
        send(&state, "check booking");
        let reply = send(&state, "00000000");
        assert_eq!(reply.kind, ReplyKind::Error);
        assert_eq!(current_state(&state), SessionState::Greeting);
    }

    #[test]
    fn test_malformed_code_reprompts_in_place() {
        let state = test_state();
        send(&state, "check booking");
        let reply = send(&state, "12ab");
        assert_eq!(reply.kind, ReplyKind::TextInput);
        assert_eq!(current_state(&state), SessionState::WaitingCode);
    }

    fn walk_to_doctor_selection(state: &AppState) {
        send(state, "book appointment");
        send(state, "Asha Mehta");
        send(state, "B+");
        send(state, "30");
        send(state, "female");
        send(state, "+919876543210");
        let reply = send(state, "fever, blocked nose");
        assert_eq!(reply.kind, ReplyKind::DoctorSelection);
        assert_eq!(current_state(state), SessionState::WaitingDoctorSelection);
    }
}
