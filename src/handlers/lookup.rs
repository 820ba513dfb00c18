use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::BookingView;
use crate::services::booking;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CheckBookingRequest {
    pub code: String,
}

#[derive(Serialize)]
pub struct CheckBookingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_details: Option<BookingView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// POST /api/check-booking
pub async fn check_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckBookingRequest>,
) -> Result<Json<CheckBookingResponse>, AppError> {
    let code = req.code.trim();
    if code.len() != 8 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::MalformedCode);
    }

    match booking::lookup_by_code(state.store.as_ref(), code)? {
        Some(view) => Ok(Json(CheckBookingResponse {
            success: true,
            booking_details: Some(view),
            error: None,
        })),
        None => Ok(Json(CheckBookingResponse {
            success: false,
            booking_details: None,
            error: Some("Code not found. Please check your code and try again.".to_string()),
        })),
    }
}
