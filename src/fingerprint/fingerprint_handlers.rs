use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    state::AppState,
    user::FingerprintStatus,
};
use super::sensor::SensorEnrollmentStatus;

/// Start fingerprint enrollment for a user
#[utoipa::path(
    post,
    path = "/api/fingerprints/enroll/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User to enroll")
    ),
    responses(
        (status = 200, description = "Enrollment started"),
        (status = 400, description = "User already has a fingerprint enrolled"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 503, description = "Cannot connect to fingerprint sensor")
    ),
    tag = "fingerprints",
    security(("bearer_auth" = []))
)]
pub async fn trigger_fingerprint_enrollment(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let user = state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.fingerprint_status == FingerprintStatus::Enrolled.as_str() {
        return Err(AppError::BadRequest(
            "User already has a fingerprint enrolled".to_string(),
        ));
    }

    let user = state
        .user_repository
        .update_fingerprint_status(user_id, FingerprintStatus::Pending.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    state.sensor.trigger_enrollment().await?;

    Ok(Json(json!({
        "message": "Fingerprint enrollment started",
        "user_id": user.id,
        "fingerprint_status": user.fingerprint_status,
    })))
}

/// Poll the sensor for enrollment progress
#[utoipa::path(
    get,
    path = "/api/fingerprints/enrollment-status/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "User being enrolled")
    ),
    responses(
        (status = 200, description = "Current enrollment progress", body = SensorEnrollmentStatus),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 503, description = "Cannot connect to fingerprint sensor")
    ),
    tag = "fingerprints",
    security(("bearer_auth" = []))
)]
pub async fn get_enrollment_status(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<SensorEnrollmentStatus>> {
    state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let sensor_status = state.sensor.enrollment_status().await?;

    // Fold the terminal outcomes back into the user record.
    match sensor_status.status.as_str() {
        "success" => {
            state
                .user_repository
                .update_fingerprint_status(user_id, FingerprintStatus::Enrolled.as_str())
                .await?;
        }
        "failed" => {
            state
                .user_repository
                .update_fingerprint_status(user_id, FingerprintStatus::Failed.as_str())
                .await?;
        }
        _ => {}
    }

    Ok(Json(sensor_status))
}
