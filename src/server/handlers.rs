use crate::core::catalog::{DEFAULT_PATIENT_THRESHOLD, DEFAULT_TOP_SPECIALTIES};
use crate::core::registry::Registry;
use crate::core::{Catalog, Doctor, DoctorKey, DoctorUpdate};
use crate::utils::error::{ClinicError, ErrorCategory};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

pub type SharedRegistry = Arc<Registry>;

#[derive(Debug)]
pub enum ApiError {
    Clinic(ClinicError),
    BadRequest(String),
}

impl From<ClinicError> for ApiError {
    fn from(err: ClinicError) -> Self {
        ApiError::Clinic(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Clinic(err) => match err.category() {
                ErrorCategory::Validation => (StatusCode::BAD_REQUEST, err.user_friendly_message()),
                ErrorCategory::NotFound => (StatusCode::NOT_FOUND, err.user_friendly_message()),
                ErrorCategory::Storage | ErrorCategory::Configuration => {
                    tracing::error!("Request failed: {}", err);
                    (StatusCode::INTERNAL_SERVER_ERROR, err.user_friendly_message())
                }
            },
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub message: String,
    pub removed: usize,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    #[serde(alias = "last_name", alias = "lastName")]
    pub surname: String,
    #[serde(alias = "first_name", alias = "firstName")]
    pub name: String,
    #[serde(default)]
    pub updates: DoctorUpdate,
}

#[derive(Debug, Default, Deserialize)]
pub struct ThresholdParams {
    pub threshold: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopParams {
    pub top_n: Option<usize>,
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "clinic-registry",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn add_doctor(
    State(registry): State<SharedRegistry>,
    payload: Result<Json<Doctor>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(doctor) = payload?;
    registry.add_doctor(doctor).await?;
    Ok(MessageResponse::new("Doctor added successfully"))
}

pub async fn remove_doctor(
    State(registry): State<SharedRegistry>,
    payload: Result<Json<DoctorKey>, JsonRejection>,
) -> Result<Json<RemoveResponse>, ApiError> {
    let Json(key) = payload?;
    let removed = registry.delete_doctor(&key.surname, &key.name).await?;
    Ok(Json(RemoveResponse {
        message: "Doctor removed successfully".to_string(),
        removed,
    }))
}

pub async fn edit_doctor(
    State(registry): State<SharedRegistry>,
    payload: Result<Json<EditRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;
    registry
        .edit_doctor(&request.surname, &request.name, &request.updates)
        .await?;
    Ok(MessageResponse::new("Doctor updated successfully"))
}

pub async fn doctors_by_specialty(
    State(registry): State<SharedRegistry>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    let Path(specialty) = path?;
    Ok(Json(registry.list_by_specialty(&specialty).await?))
}

pub async fn doctors_by_patient(
    State(registry): State<SharedRegistry>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    let Path(surname) = path?;
    Ok(Json(registry.list_by_patient(&surname).await?))
}

pub async fn doctors_by_office(
    State(registry): State<SharedRegistry>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    let Path(room) = path?;
    Ok(Json(registry.list_by_room(room).await?))
}

pub async fn offices_by_specialty(
    State(registry): State<SharedRegistry>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<BTreeSet<i64>>, ApiError> {
    let Path(specialty) = path?;
    Ok(Json(registry.list_rooms_by_specialty(&specialty).await?))
}

pub async fn top_specialties(
    State(registry): State<SharedRegistry>,
    query: Result<Query<TopParams>, QueryRejection>,
) -> Result<Json<Vec<(String, usize)>>, ApiError> {
    let Query(params) = query?;
    let top_n = params.top_n.unwrap_or(DEFAULT_TOP_SPECIALTIES);
    Ok(Json(registry.top_specialties_by_patients(top_n).await?))
}

pub async fn top_doctors(
    State(registry): State<SharedRegistry>,
    query: Result<Query<ThresholdParams>, QueryRejection>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    let Query(params) = query?;
    let threshold = params.threshold.unwrap_or(DEFAULT_PATIENT_THRESHOLD);
    Ok(Json(registry.list_by_patient_count(threshold).await?))
}

pub async fn least_busy(
    State(registry): State<SharedRegistry>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    Ok(Json(registry.least_busy_per_specialty().await?))
}

pub async fn get_db(State(registry): State<SharedRegistry>) -> Result<Json<Catalog>, ApiError> {
    Ok(Json(registry.catalog().await?))
}

/// Replaces the whole catalog. The body must be a JSON array of doctors.
pub async fn set_db(
    State(registry): State<SharedRegistry>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(value) = payload?;
    if !value.is_array() {
        return Err(ApiError::BadRequest(
            "Invalid data format. Expected a list.".to_string(),
        ));
    }

    let doctors: Catalog = serde_json::from_value(value)
        .map_err(|e| ApiError::BadRequest(format!("Invalid doctor record: {}", e)))?;
    registry.replace_catalog(doctors).await?;
    Ok(MessageResponse::new("Database updated successfully."))
}
