mod appointments;
pub mod auth;
mod dashboard;
mod doctor_dashboard;
mod doctors;
pub mod error;
mod invoices;
mod patient_dashboard;
mod patients;
pub mod validation;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::gate;
use crate::AppState;

pub use dashboard::{sections, DashboardResponse};

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-out", post(auth::sign_out))
        .route("/session", get(auth::session))
        .route("/demo-accounts", get(auth::demo_accounts));

    let admin_routes = Router::new()
        .route("/summary", get(dashboard::admin_summary))
        // Appointments
        .route(
            "/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route(
            "/appointments/:id",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        // Doctors
        .route("/doctors", get(doctors::list_doctors).post(doctors::create_doctor))
        .route(
            "/doctors/:id",
            get(doctors::get_doctor)
                .put(doctors::update_doctor)
                .delete(doctors::delete_doctor),
        )
        // Patients
        .route("/patients", get(patients::list_patients).post(patients::create_patient))
        .route(
            "/patients/:id",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        // Billing
        .route("/invoices", get(invoices::list_invoices).post(invoices::create_invoice))
        .route(
            "/invoices/:id",
            get(invoices::get_invoice)
                .put(invoices::update_invoice)
                .delete(invoices::delete_invoice),
        )
        .route("/invoices/:id/paid", put(invoices::mark_paid))
        .layer(middleware::from_fn_with_state(state.clone(), gate::require_admin));

    let doctor_routes = Router::new()
        .route("/agenda", get(doctor_dashboard::agenda))
        .route("/patients", get(doctor_dashboard::list_patients))
        .route("/patients/:id", get(doctor_dashboard::patient_history))
        .route(
            "/patients/:id/prescriptions",
            get(doctor_dashboard::list_prescriptions).post(doctor_dashboard::create_prescription),
        )
        .route(
            "/patients/:id/prescriptions/:rx_id",
            put(doctor_dashboard::update_prescription).delete(doctor_dashboard::delete_prescription),
        )
        .layer(middleware::from_fn_with_state(state.clone(), gate::require_doctor));

    let patient_routes = Router::new()
        .route("/doctors", get(patient_dashboard::list_doctors))
        .route(
            "/appointments",
            get(patient_dashboard::list_appointments).post(patient_dashboard::book_appointment),
        )
        .route(
            "/appointments/:id",
            put(patient_dashboard::reschedule_appointment).delete(patient_dashboard::delete_appointment),
        )
        .route("/appointments/:id/cancel", post(patient_dashboard::cancel_appointment))
        .route("/records", get(patient_dashboard::medical_records))
        .layer(middleware::from_fn_with_state(state.clone(), gate::require_patient));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/dashboard", get(dashboard::dashboard))
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/doctor", doctor_routes)
        .nest("/api/patient", patient_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::storage::{LocalStore, DEMO_USER_KEY};

    async fn app() -> (Router, Arc<AppState>) {
        let store = LocalStore::in_memory().await.unwrap();
        let state = Arc::new(AppState::new(Config::default(), store).await.unwrap());
        (create_router(state.clone()), state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, Method::GET, uri, None).await
    }

    async fn sign_in(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            "/api/auth/sign-in",
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    fn ids(list: &Value) -> Vec<String> {
        list.as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = app().await;
        let (status, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("OK"));
    }

    #[tokio::test]
    async fn test_signed_out_dashboard_shows_sign_in() {
        let (app, _) = app().await;
        let (status, body) = get_json(&app, "/api/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "sign_in");
        assert_eq!(body["demo_accounts"].as_array().unwrap().len(), 3);

        for uri in ["/api/admin/summary", "/api/doctor/agenda", "/api/patient/doctors"] {
            let (status, body) = get_json(&app, uri).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["error"]["code"], "unauthorized");
        }
    }

    #[tokio::test]
    async fn test_each_demo_account_reaches_only_its_dashboard() {
        let (app, _) = app().await;
        let areas = [
            ("admin", "/api/admin/summary"),
            ("doctor", "/api/doctor/agenda"),
            ("patient", "/api/patient/doctors"),
        ];

        for account in crate::auth::DEMO_ACCOUNTS.iter() {
            let (status, body) = sign_in(&app, account.email, account.password).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["profile"]["role"], account.role.as_str());

            let (_, dashboard) = get_json(&app, "/api/dashboard").await;
            assert_eq!(dashboard["view"], "dashboard");
            assert_eq!(dashboard["dashboard"], account.role.as_str());

            for (role, uri) in areas {
                let (status, _) = get_json(&app, uri).await;
                if role == account.role.as_str() {
                    assert_eq!(status, StatusCode::OK, "{role} on {uri}");
                } else {
                    assert_eq!(status, StatusCode::FORBIDDEN, "{} on {uri}", account.role);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let (app, _) = app().await;
        let (status, body) = sign_in(&app, "admin@demo.test", "nope").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid credentials");

        let (_, session) = get_json(&app, "/api/auth/session").await;
        assert!(session["profile"].is_null());
    }

    #[tokio::test]
    async fn test_sign_up_sign_out_flow() {
        let (app, state) = app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/sign-up",
            Some(json!({
                "email": "dr.new@example.com",
                "password": "secret1",
                "full_name": "Dr. New",
                "role": "doctor"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["profile"]["role"], "doctor");

        let (status, _) = get_json(&app, "/api/doctor/agenda").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::POST, "/api/auth/sign-out", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.auth.current().is_none());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/sign-up",
            Some(json!({
                "email": "DR.NEW@example.com",
                "password": "secret1",
                "full_name": "Someone",
                "role": "patient"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["message"], "An account with this email already exists");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/sign-up",
            Some(json!({
                "email": "x@example.com",
                "password": "secret1",
                "full_name": "X",
                "role": "superuser"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["details"]["role"].is_array());
    }

    #[tokio::test]
    async fn test_malformed_stored_session_shows_sign_in() {
        let (app, state) = app().await;
        sign_in(&app, "admin@demo.test", "admin123").await;

        state.store.set_item(DEMO_USER_KEY, "{broken").await.unwrap();
        state.auth.restore().await.unwrap();

        let (_, body) = get_json(&app, "/api/dashboard").await;
        assert_eq!(body["view"], "sign_in");
        let (status, _) = get_json(&app, "/api/admin/summary").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_then_delete_appointment_leaves_list_unchanged() {
        let (app, _) = app().await;
        sign_in(&app, "admin@demo.test", "admin123").await;

        let (_, before) = get_json(&app, "/api/admin/appointments").await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/admin/appointments",
            Some(json!({
                "patientName": "Zara Ahmed",
                "doctorName": "Dr. Sara Khan",
                "doctorId": "1",
                "date": "2025-11-02",
                "time": "10:30"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "scheduled");
        let id = created["id"].as_str().unwrap().to_string();

        let (_, during) = get_json(&app, "/api/admin/appointments").await;
        assert!(ids(&during).contains(&id));

        let (status, _) = send(&app, Method::DELETE, &format!("/api/admin/appointments/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, after) = get_json(&app, "/api/admin/appointments").await;
        assert_eq!(after, before);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/admin/appointments/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_edit_appointment_keeps_id_and_other_fields() {
        let (app, _) = app().await;
        sign_in(&app, "admin@demo.test", "admin123").await;

        let (_, original) = get_json(&app, "/api/admin/appointments/a1").await;
        let (status, edited) = send(
            &app,
            Method::PUT,
            "/api/admin/appointments/a1",
            Some(json!({ "time": "11:15", "status": "completed", "patientName": "John A. Doe" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // request bodies use the same keys as the returned record
        let mut expected = original.clone();
        expected["time"] = json!("11:15");
        expected["status"] = json!("completed");
        expected["patientName"] = json!("John A. Doe");
        assert_eq!(edited, expected);
        assert_eq!(edited["id"], "a1");
    }

    #[tokio::test]
    async fn test_appointment_form_validation() {
        let (app, _) = app().await;
        sign_in(&app, "admin@demo.test", "admin123").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/admin/appointments",
            Some(json!({ "patientName": "Zara Ahmed", "date": "2025-11-02" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please fill patient, doctor and date/time.");
    }

    #[tokio::test]
    async fn test_appointment_filters() {
        let (app, _) = app().await;
        sign_in(&app, "admin@demo.test", "admin123").await;

        let (_, cancelled) = get_json(&app, "/api/admin/appointments?status=cancelled").await;
        assert_eq!(ids(&cancelled), vec!["a5"]);

        let (_, khan) = get_json(&app, "/api/admin/appointments?q=KHAN").await;
        assert!(khan
            .as_array()
            .unwrap()
            .iter()
            .all(|a| a["doctorName"] == "Dr. Sara Khan" || a["patientName"] == "Ayesha Khan"));
    }

    #[tokio::test]
    async fn test_doctor_and_patient_directory() {
        let (app, _) = app().await;
        sign_in(&app, "admin@demo.test", "admin123").await;

        let (status, doctor) = send(
            &app,
            Method::POST,
            "/api/admin/doctors",
            Some(json!({ "first_name": "Imran", "last_name": "Shah", "speciality": "Neurology" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(doctor["id"], 4);
        assert_eq!(doctor["availability"][0]["day"], "Mon");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/admin/doctors/4",
            Some(json!({ "availability": [{ "day": "Tue", "from": "17:00", "to": "09:00" }] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/admin/patients",
            Some(json!({ "first_name": "", "last_name": "Khan", "email": "bad" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["details"]["first_name"].is_array());
        assert!(body["error"]["details"]["email"].is_array());

        let (_, found) = get_json(&app, "/api/admin/patients?q=ayesha").await;
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["email"], "ayesha@example.com");
    }

    #[tokio::test]
    async fn test_invoices() {
        let (app, _) = app().await;
        sign_in(&app, "admin@demo.test", "admin123").await;

        let (_, first) = get_json(&app, "/api/admin/invoices/1").await;
        assert_eq!(first["total"], 2900);
        assert_eq!(first["currency"], "PKR");

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/admin/invoices",
            Some(json!({
                "patient_name": "Omar Siddiqui",
                "items": [
                    { "id": 1, "description": "Consultation", "qty": 2, "unit": 1000 },
                    { "id": 2, "description": "Dressing", "qty": 1, "unit": 250 }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 3);
        assert_eq!(created["total"], 2250);
        assert_eq!(created["paid"], false);
        assert!(created["invoice_no"].as_str().unwrap().starts_with("INV-"));

        let (_, paid) = send(&app, Method::PUT, "/api/admin/invoices/3/paid", Some(json!({ "paid": true }))).await;
        assert_eq!(paid["paid"], true);

        let (_, summary) = get_json(&app, "/api/admin/summary").await;
        assert_eq!(summary["billing"]["invoices"], 3);
        assert_eq!(summary["billing"]["collected"], 1600 + 2250);
        assert_eq!(summary["billing"]["outstanding"], 2900);
    }

    #[tokio::test]
    async fn test_invoice_with_overflowing_amount_is_rejected() {
        let (app, _) = app().await;
        sign_in(&app, "admin@demo.test", "admin123").await;

        let (_, before) = get_json(&app, "/api/admin/invoices").await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/admin/invoices",
            Some(json!({
                "patient_name": "Omar Siddiqui",
                "items": [{ "id": 1, "description": "Surgery", "qty": 2, "unit": u64::MAX }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["details"]["items"].is_array());

        let (_, after) = get_json(&app, "/api/admin/invoices").await;
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_patient_booking_flow() {
        let (app, _) = app().await;
        sign_in(&app, "patient@demo.test", "patient123").await;

        let (_, doctors) = get_json(&app, "/api/patient/doctors").await;
        assert!(doctors[0]["open_slots"]["2026-01-15"].is_array());

        let (_, mine) = get_json(&app, "/api/patient/appointments").await;
        assert_eq!(ids(&mine), vec!["p1", "p2"]);

        let (status, booked) = send(
            &app,
            Method::POST,
            "/api/patient/appointments",
            Some(json!({ "doctorId": 1, "slotId": "2", "reason": "Follow-up" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(booked["date"], "2026-01-15");
        assert_eq!(booked["time"], "14:00");
        assert_eq!(booked["patientId"], "patient@demo.test");
        assert_eq!(booked["doctorName"], "Dr. Sara Khan");
        let id = booked["id"].as_str().unwrap().to_string();

        let (status, moved) = send(
            &app,
            Method::PUT,
            &format!("/api/patient/appointments/{id}"),
            Some(json!({ "slotId": "3" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(moved["id"], id.as_str());
        assert_eq!(moved["date"], "2026-01-16");
        assert_eq!(moved["reason"], "Follow-up");

        let (_, cancelled) = send(
            &app,
            Method::POST,
            &format!("/api/patient/appointments/{id}/cancel"),
            None,
        )
        .await;
        assert_eq!(cancelled["status"], "cancelled");

        let (status, _) = send(&app, Method::DELETE, &format!("/api/patient/appointments/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, mine) = get_json(&app, "/api/patient/appointments").await;
        assert_eq!(ids(&mine), vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_patient_cannot_touch_others_appointments() {
        let (app, _) = app().await;
        sign_in(&app, "patient@demo.test", "patient123").await;

        let (status, _) = send(&app, Method::POST, "/api/patient/appointments/a1/cancel", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::DELETE, "/api/patient/appointments/a1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/patient/appointments",
            Some(json!({ "doctorId": 1, "slotId": "99", "reason": "Checkup" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["details"]["slotId"].is_array());
    }

    #[tokio::test]
    async fn test_doctor_prescriptions() {
        let (app, _) = app().await;
        sign_in(&app, "doctor@demo.test", "doctor123").await;

        let (_, found) = get_json(&app, "/api/doctor/patients?q=2").await;
        assert_eq!(found[0]["name"], "Ayesha Raza");

        let (_, history) = get_json(&app, "/api/doctor/patients/1").await;
        assert_eq!(history["last_visit"], "2025-10-10");

        for meds in ["Aspirin 75mg", "Atorvastatin 10mg"] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/api/doctor/patients/1/prescriptions",
                Some(json!({ "meds": meds })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, list) = get_json(&app, "/api/doctor/patients/1/prescriptions").await;
        assert_eq!(list[0]["meds"], "Atorvastatin 10mg");
        let rx_id = list[1]["id"].as_str().unwrap().to_string();

        let (_, edited) = send(
            &app,
            Method::PUT,
            &format!("/api/doctor/patients/1/prescriptions/{rx_id}"),
            Some(json!({ "notes": "After meals" })),
        )
        .await;
        assert_eq!(edited["id"], rx_id.as_str());
        assert_eq!(edited["meds"], "Aspirin 75mg");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/doctor/patients/1/prescriptions",
            Some(json!({ "meds": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(&app, "/api/doctor/patients/999/prescriptions").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
