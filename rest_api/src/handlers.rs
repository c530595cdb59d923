// rest_api/src/handlers.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use models::{
    Appointment, Doctor, HealthTip, NewAppointment, NewDoctor, NewHealthTip, NewSymptom,
    PopulatedAppointment, Symptom,
};
use serde_json::{json, Map, Value};

use crate::extract::ApiJson;
use crate::{ApiResult, AppState, RestApiError};

type Created<T> = (StatusCode, Json<T>);

// Doctors

pub async fn list_doctors(State(state): State<AppState>) -> ApiResult<Json<Vec<Doctor>>> {
    Ok(Json(state.doctors().await?.list().await?))
}

pub async fn create_doctor(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewDoctor>,
) -> ApiResult<Created<Doctor>> {
    let doctor = state
        .doctors()
        .await?
        .create(payload)
        .await
        .map_err(RestApiError::WriteRejected)?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

pub async fn get_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Doctor>> {
    Ok(Json(state.doctors().await?.get(&id).await?))
}

pub async fn patch_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<Map<String, Value>>,
) -> ApiResult<Json<Doctor>> {
    let patched = state
        .doctors()
        .await?
        .patch(&id, &payload)
        .await
        .map_err(RestApiError::WriteRejected)?;
    Ok(Json(patched))
}

pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.doctors().await?.delete(&id).await?;
    Ok(Json(json!({ "message": "Doctor deleted" })))
}

// Appointments

pub async fn list_appointments(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PopulatedAppointment>>> {
    Ok(Json(state.appointments().await?.list().await?))
}

pub async fn create_appointment(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewAppointment>,
) -> ApiResult<Created<Appointment>> {
    let appointment = state
        .appointments()
        .await?
        .create(payload)
        .await
        .map_err(RestApiError::WriteRejected)?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PopulatedAppointment>> {
    Ok(Json(state.appointments().await?.get(&id).await?))
}

pub async fn patch_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<Map<String, Value>>,
) -> ApiResult<Json<Appointment>> {
    let patched = state
        .appointments()
        .await?
        .patch(&id, &payload)
        .await
        .map_err(RestApiError::WriteRejected)?;
    Ok(Json(patched))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.appointments().await?.delete(&id).await?;
    Ok(Json(json!({ "message": "Appointment deleted" })))
}

// Symptoms

pub async fn list_symptoms(State(state): State<AppState>) -> ApiResult<Json<Vec<Symptom>>> {
    Ok(Json(state.symptoms().await?.list().await?))
}

pub async fn create_symptom(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewSymptom>,
) -> ApiResult<Created<Symptom>> {
    let symptom = state
        .symptoms()
        .await?
        .create(payload)
        .await
        .map_err(RestApiError::WriteRejected)?;
    Ok((StatusCode::CREATED, Json(symptom)))
}

pub async fn get_symptom(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Symptom>> {
    Ok(Json(state.symptoms().await?.get(&id).await?))
}

// Health tips

pub async fn list_health_tips(State(state): State<AppState>) -> ApiResult<Json<Vec<HealthTip>>> {
    Ok(Json(state.health_tips().await?.list().await?))
}

pub async fn create_health_tip(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewHealthTip>,
) -> ApiResult<Created<HealthTip>> {
    let tip = state
        .health_tips()
        .await?
        .create(payload)
        .await
        .map_err(RestApiError::WriteRejected)?;
    Ok((StatusCode::CREATED, Json(tip)))
}

pub async fn get_health_tip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<HealthTip>> {
    Ok(Json(state.health_tips().await?.get(&id).await?))
}
