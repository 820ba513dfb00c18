use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{BookingRecord, BookingStatus, Doctor, PatientRecord};

const DATE_FMT: &str = "%Y-%m-%d";
const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

fn parse_timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FMT).unwrap_or_else(|_| Utc::now().date_naive())
}

// ── Doctors ──

pub fn list_doctors(conn: &Connection) -> anyhow::Result<Vec<Doctor>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, specialty, qualification, hours_start, hours_end
         FROM doctors ORDER BY name ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Doctor {
            id: row.get(0)?,
            name: row.get(1)?,
            specialty: row.get(2)?,
            qualification: row.get(3)?,
            hours_start: row.get(4)?,
            hours_end: row.get(5)?,
        })
    })?;

    let mut doctors = vec![];
    for row in rows {
        doctors.push(row?);
    }
    Ok(doctors)
}

pub fn find_doctor(conn: &Connection, id: &str) -> anyhow::Result<Option<Doctor>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, specialty, qualification, hours_start, hours_end
         FROM doctors WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id], |row| {
        Ok(Doctor {
            id: row.get(0)?,
            name: row.get(1)?,
            specialty: row.get(2)?,
            qualification: row.get(3)?,
            hours_start: row.get(4)?,
            hours_end: row.get(5)?,
        })
    });

    match result {
        Ok(doctor) => Ok(Some(doctor)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Patients ──

pub fn code_exists(conn: &Connection, code: &str) -> anyhow::Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM patients WHERE code = ?1",
        params![code],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn insert_patient(conn: &Connection, patient: &PatientRecord) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO patients (id, name, age, gender, blood_group, contact, code, symptoms, matched_symptoms, possible_conditions, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            patient.id,
            patient.name,
            patient.age as i64,
            patient.gender,
            patient.blood_group,
            patient.contact,
            patient.code,
            serde_json::to_string(&patient.symptoms)?,
            serde_json::to_string(&patient.matched_symptoms)?,
            serde_json::to_string(&patient.possible_conditions)?,
            patient.created_at.format(TIMESTAMP_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn find_patient_by_code(conn: &Connection, code: &str) -> anyhow::Result<Option<PatientRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, age, gender, blood_group, contact, code, symptoms, matched_symptoms, possible_conditions, created_at
         FROM patients WHERE code = ?1",
    )?;

    let result = stmt.query_row(params![code], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
            row.get::<_, String>(7)?,
            row.get::<_, String>(8)?,
            row.get::<_, String>(9)?,
            row.get::<_, String>(10)?,
        ))
    });

    match result {
        Ok((id, name, age, gender, blood_group, contact, code, symptoms, matched, conditions, created_at)) => {
            Ok(Some(PatientRecord {
                id,
                name,
                age: age.clamp(0, u8::MAX as i64) as u8,
                gender,
                blood_group,
                contact,
                code,
                symptoms: serde_json::from_str(&symptoms).unwrap_or_default(),
                matched_symptoms: serde_json::from_str(&matched).unwrap_or_default(),
                possible_conditions: serde_json::from_str(&conditions).unwrap_or_default(),
                created_at: parse_timestamp(&created_at),
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Confirmations ──

pub fn insert_confirmation(conn: &Connection, record: &BookingRecord) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO confirmations (id, patient_id, doctor_id, doctor_name, date, time, status, code, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            record.id,
            record.patient_id,
            record.doctor_id,
            record.doctor_name,
            record.date.format(DATE_FMT).to_string(),
            record.time,
            record.status.as_str(),
            record.code,
            record.created_at.format(TIMESTAMP_FMT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn find_confirmation_for_patient(
    conn: &Connection,
    patient_id: &str,
) -> anyhow::Result<Option<BookingRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, doctor_id, doctor_name, date, time, status, code, created_at
         FROM confirmations WHERE patient_id = ?1 ORDER BY created_at ASC",
    )?;

    let result = stmt.query_row(params![patient_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
            row.get::<_, String>(7)?,
            row.get::<_, String>(8)?,
        ))
    });

    match result {
        Ok((id, patient_id, doctor_id, doctor_name, date, time, status, code, created_at)) => {
            Ok(Some(BookingRecord {
                id,
                patient_id,
                doctor_id,
                doctor_name,
                date: parse_date(&date),
                time,
                status: BookingStatus::from_str(&status),
                code,
                created_at: parse_timestamp(&created_at),
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Booked slots ──

pub fn reserve_slot(
    conn: &Connection,
    doctor_id: &str,
    date: NaiveDate,
    time: &str,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO booked_slots (doctor_id, date, time) VALUES (?1, ?2, ?3)",
        params![doctor_id, date.format(DATE_FMT).to_string(), time],
    )?;
    Ok(())
}

pub fn booked_times(
    conn: &Connection,
    doctor_id: &str,
    date: NaiveDate,
) -> anyhow::Result<HashSet<String>> {
    let mut stmt =
        conn.prepare("SELECT time FROM booked_slots WHERE doctor_id = ?1 AND date = ?2")?;

    let rows = stmt.query_map(
        params![doctor_id, date.format(DATE_FMT).to_string()],
        |row| row.get::<_, String>(0),
    )?;

    let mut times = HashSet::new();
    for row in rows {
        times.insert(row?);
    }
    Ok(times)
}
