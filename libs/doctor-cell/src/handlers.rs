use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::PageRequest;
use shared_models::error::AppError;

use crate::models::{AvailabilityQuery, DoctorRegistration, DoctorUpdate};
use crate::router::DoctorState;

#[axum::debug_handler]
pub async fn register_doctor(
    State(state): State<Arc<DoctorState>>,
    Json(request): Json<DoctorRegistration>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let doctor = state.doctors.register(request).await?;
    Ok((StatusCode::CREATED, Json(json!(doctor))))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<DoctorState>>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Value>, AppError> {
    let doctors = state.doctors.list(page).await?;

    Ok(Json(json!({
        "doctors": doctors,
        "page": page.page,
        "size": page.limit(),
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctor = state.doctors.get(doctor_id).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<Uuid>,
    Json(update): Json<DoctorUpdate>,
) -> Result<Json<Value>, AppError> {
    let doctor = state.doctors.update(doctor_id, update).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn deactivate_doctor(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.doctors.deactivate(doctor_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn find_available_doctor(
    State(state): State<Arc<DoctorState>>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let doctor = state
        .availability
        .pick_available_doctor(query.specialty, query.at)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No {} doctor available at {}", query.specialty, query.at))
        })?;

    Ok(Json(json!(doctor)))
}
