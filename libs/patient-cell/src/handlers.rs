use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::PageRequest;
use shared_models::error::AppError;

use crate::models::{PatientRegistration, PatientUpdate};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn register_patient(
    State(service): State<Arc<PatientService>>,
    Json(request): Json<PatientRegistration>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let patient = service.register(request).await?;
    Ok((StatusCode::CREATED, Json(json!(patient))))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(service): State<Arc<PatientService>>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Value>, AppError> {
    let patients = service.list(page).await?;

    Ok(Json(json!({
        "patients": patients,
        "page": page.page,
        "size": page.limit(),
    })))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(service): State<Arc<PatientService>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let patient = service.get(patient_id).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(service): State<Arc<PatientService>>,
    Path(patient_id): Path<Uuid>,
    Json(update): Json<PatientUpdate>,
) -> Result<Json<Value>, AppError> {
    let patient = service.update(patient_id, update).await?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn deactivate_patient(
    State(service): State<Arc<PatientService>>,
    Path(patient_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.deactivate(patient_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
