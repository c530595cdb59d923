// rest_api/tests/api.rs

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use lib::{ConnectionManager, ConnectionState, StorageConfig};
use rest_api::serverless::ServerlessHandler;
use rest_api::{build_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let connection = Arc::new(ConnectionManager::new(StorageConfig::temporary()));
    build_router(AppState::new(connection))
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request(method, uri, body)).await.unwrap();
    read(response).await
}

fn doctor_body(email: &str) -> Value {
    json!({
        "name": "Dr. A",
        "specialty": "Cardiology",
        "experience": "10 years",
        "available": "Mon-Fri",
        "email": email,
        "phone": "555-0100",
        "qualifications": ["MBBS", "MD"]
    })
}

fn appointment_body(doctor_id: &str) -> Value {
    json!({
        "patientName": "Jane Doe",
        "age": 34,
        "phone": "555-0199",
        "email": "jane@example.com",
        "symptoms": "Chest pain",
        "date": "2024-06-01",
        "time": "10:30",
        "doctorId": doctor_id
    })
}

async fn create_doctor(app: &Router, email: &str) -> Value {
    let (status, doctor) = send(app, Method::POST, "/api/doctors", Some(doctor_body(email))).await;
    assert_eq!(status, StatusCode::CREATED);
    doctor
}

#[tokio::test]
async fn booking_scenario() {
    let app = app();

    let doctor = create_doctor(&app, "a@clinic.com").await;
    let doctor_id = doctor["_id"].as_str().unwrap().to_string();
    assert_eq!(doctor["rating"], 0.0);
    assert_eq!(doctor["qualifications"], json!(["MBBS", "MD"]));
    assert!(doctor["createdAt"].is_string());

    let (status, appointment) = send(
        &app,
        Method::POST,
        "/api/appointments",
        Some(appointment_body(&doctor_id)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(appointment["status"], "pending");
    assert_eq!(appointment["doctor"], doctor_id.as_str());

    let uri = format!("/api/appointments/{}", appointment["_id"].as_str().unwrap());
    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["doctor"]["name"], "Dr. A");
    assert_eq!(fetched["doctor"]["_id"], doctor_id.as_str());
}

#[tokio::test]
async fn duplicate_doctor_email_is_a_bad_request() {
    let app = app();
    create_doctor(&app, "a@clinic.com").await;
    create_doctor(&app, "b@clinic.com").await;

    let (status, body) =
        send(&app, Method::POST, "/api/doctors", Some(doctor_body("a@clinic.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("a@clinic.com"));

    let (_, doctors) = send(&app, Method::GET, "/api/doctors", None).await;
    assert_eq!(doctors.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn missing_fields_are_reported() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/doctors",
        Some(json!({ "name": "Dr. B", "email": "b@clinic.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Doctor validation failed: missing required field(s): specialty, experience, available, phone"
    );
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/symptoms")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = read(app.oneshot(request).await.unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app();
    for path in ["doctors", "appointments", "symptoms", "health-tips"] {
        let (status, body) = send(&app, Method::GET, &format!("/api/{}/missing", path), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
        assert!(body["message"].as_str().unwrap().ends_with("not found"));
    }

    let (status, body) = send(&app, Method::DELETE, "/api/doctors/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Doctor not found");

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/appointments/missing",
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_doctor_is_gone_and_appointments_survive() {
    let app = app();
    let doctor = create_doctor(&app, "a@clinic.com").await;
    let doctor_id = doctor["_id"].as_str().unwrap();
    let (_, appointment) = send(
        &app,
        Method::POST,
        "/api/appointments",
        Some(appointment_body(doctor_id)),
    )
    .await;

    let doctor_uri = format!("/api/doctors/{}", doctor_id);
    let (status, body) = send(&app, Method::DELETE, &doctor_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Doctor deleted" }));

    let (status, _) = send(&app, Method::GET, &doctor_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, appointments) = send(&app, Method::GET, "/api/appointments", None).await;
    assert_eq!(status, StatusCode::OK);
    let appointments = appointments.as_array().unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0]["_id"], appointment["_id"]);
    assert!(appointments[0]["doctor"].is_null());

    // The email can be registered again.
    create_doctor(&app, "a@clinic.com").await;
}

#[tokio::test]
async fn doctor_patch_only_changes_given_fields() {
    let app = app();
    let doctor = create_doctor(&app, "a@clinic.com").await;
    let uri = format!("/api/doctors/{}", doctor["_id"].as_str().unwrap());

    let (status, patched) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "rating": 4.5, "isAdmin": true, "_id": "hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["rating"], 4.5);
    assert!(patched.get("isAdmin").is_none());

    let (_, stored) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(stored["_id"], doctor["_id"]);
    assert_eq!(stored["rating"], 4.5);
    for field in ["name", "specialty", "experience", "available", "email", "phone", "qualifications", "createdAt"] {
        assert_eq!(stored[field], doctor[field], "{}", field);
    }
}

#[tokio::test]
async fn appointment_patch_only_changes_status() {
    let app = app();
    let doctor = create_doctor(&app, "a@clinic.com").await;
    let (_, appointment) = send(
        &app,
        Method::POST,
        "/api/appointments",
        Some(appointment_body(doctor["_id"].as_str().unwrap())),
    )
    .await;
    let uri = format!("/api/appointments/{}", appointment["_id"].as_str().unwrap());

    let (status, patched) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({ "status": "confirmed", "patientName": "Mallory", "age": 99 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["status"], "confirmed");
    assert_eq!(patched["patientName"], "Jane Doe");
    assert_eq!(patched["age"], 34);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "status": "lost" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Appointment validation failed: `lost` is not a valid value for status, expected one of: pending, confirmed, completed, cancelled"
    );

    // A blank status is treated like an absent one.
    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "status": "" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");

    // No transition guard: a cancelled appointment can go back to pending.
    for next in ["cancelled", "pending"] {
        let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "status": next }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], next);
    }

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Appointment deleted" }));
}

#[tokio::test]
async fn appointment_with_unknown_doctor_reads_back_null() {
    let app = app();
    let (status, appointment) = send(
        &app,
        Method::POST,
        "/api/appointments",
        Some(appointment_body("no-such-doctor")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/appointments/{}", appointment["_id"].as_str().unwrap());
    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(fetched["doctor"].is_null());
}

#[tokio::test]
async fn symptom_and_health_tip_defaults() {
    let app = app();

    let (status, symptom) = send(
        &app,
        Method::POST,
        "/api/symptoms",
        Some(json!({ "name": "Fever", "description": "High temperature", "advice": "Rest" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(symptom["severity"], "low");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/symptoms",
        Some(json!({ "name": "Fever", "description": "Again", "advice": "Rest" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, tip) = send(
        &app,
        Method::POST,
        "/api/health-tips",
        Some(json!({ "title": "Walk", "content": "30 minutes a day" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tip["category"], "general");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/health-tips",
        Some(json!({ "title": "Walk", "content": "Daily", "category": "sleep" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/health-tips/{}", tip["_id"].as_str().unwrap());
    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, tip);

    let (_, tips) = send(&app, Method::GET, "/api/health-tips", None).await;
    assert_eq!(tips, json!([tip]));
    let (_, symptoms) = send(&app, Method::GET, "/api/symptoms", None).await;
    assert_eq!(symptoms, json!([symptom]));
}

#[tokio::test]
async fn root_reports_status() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "doctor-consultation-backend");
    assert!(body["time"].is_string());
}

#[tokio::test]
async fn router_errors_carry_a_message() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/prescriptions", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Not Found" }));

    let (status, body) = send(&app, Method::DELETE, "/api/symptoms", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "message": "Method Not Allowed" }));
}

#[tokio::test]
async fn serverless_connects_lazily_and_reuses_the_store() {
    let handler = ServerlessHandler::new(StorageConfig::temporary());
    assert_eq!(handler.connection_state(), ConnectionState::Uninitialized);

    let response = handler
        .invoke(request(Method::POST, "/api/doctors", Some(doctor_body("a@clinic.com"))))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(handler.connection_state(), ConnectionState::Ready);

    let (status, doctors) = read(handler.invoke(request(Method::GET, "/api/doctors", None)).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doctors.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn serverless_connection_failure_is_a_500() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let handler = ServerlessHandler::new(StorageConfig::sled(file.path().join("db")));

    let (status, body) = read(handler.invoke(request(Method::GET, "/api/doctors", None)).await).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Internal Server Error" }));
    assert!(matches!(handler.connection_state(), ConnectionState::Failed(_)));
}
