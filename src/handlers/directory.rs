use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{DaySlot, Doctor};
use crate::services::availability;
use crate::state::AppState;

#[derive(Serialize)]
pub struct DoctorsResponse {
    pub doctors: Vec<Doctor>,
}

// GET /api/doctors
pub async fn get_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DoctorsResponse>, AppError> {
    let doctors = state.store.list_doctors()?;
    Ok(Json(DoctorsResponse { doctors }))
}

#[derive(Deserialize)]
pub struct DatesQuery {
    pub doctor_id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Serialize)]
pub struct DatesResponse {
    pub dates: Vec<DaySlot>,
}

// GET /api/dates
//
// With a doctor id, that doctor's stored working hours win and booked
// slots are flagged. Without one, the explicit window is used (falling
// back to the default slot list when absent or unparsable) and every slot
// is open.
pub async fn get_dates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DatesQuery>,
) -> Result<Json<DatesResponse>, AppError> {
    let today = Utc::now().date_naive();

    let dates = match &query.doctor_id {
        Some(id) => {
            let doctor = state
                .store
                .find_doctor(id)?
                .ok_or_else(|| AppError::NotFound(format!("doctor {id}")))?;
            availability::upcoming_days(state.store.as_ref(), &doctor, today)?
        }
        None => availability::upcoming_days_for_window(
            query.start.as_deref().unwrap_or(""),
            query.end.as_deref().unwrap_or(""),
            today,
        ),
    };

    Ok(Json(DatesResponse { dates }))
}
