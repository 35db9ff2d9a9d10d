//! Integration tests for the dashboard API over HTTP

mod common;

use axum::http::StatusCode;
use common::*;
use frontdesk_core::context_error::{Result, ResultExt};
use serde_json::json;

/// Test server startup and the health probes
#[tokio::test]
async fn test_server_startup_and_health_probes() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().build();
    let (base_url, server_handle) = spawn_server(config).await?;
    let client = create_test_client();

    let (status, health) = get_json(&client, &format!("{base_url}/health")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "frontdesk-api");

    let (status, ready) = get_json(&client, &format!("{base_url}/ready")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ready["ready"], true);

    let (status, report) = get_json(&client, &format!("{base_url}/health/detailed")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["checks"]["stores"]["calls"], 5);
    assert_eq!(report["checks"]["stores"]["appointments"], 5);
    assert_eq!(report["checks"]["receptionist"]["healthy"], true);

    // Stop server
    server_handle.abort();

    Ok(())
}

/// Test that a chat turn answers from the rule table
#[tokio::test]
async fn test_chat_turn_matches_the_hours_rule() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().without_seed().build();
    let (base_url, server_handle) = spawn_server(config).await?;
    let client = create_test_client();

    let (status, reply) = send_chat(&client, &base_url, "What are your hours?", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        reply["response"],
        "Our business hours are Monday through Friday, 9 AM to 6 PM, and Saturday 9 AM to 3 PM. \
         We're closed on Sundays. Is there anything else I can help you with?"
    );
    assert_eq!(reply["intent"], "business_hours");
    assert!((reply["confidence"].as_f64().unwrap() - 0.92).abs() < 1e-6);
    assert_eq!(reply["badge_style"], "bg-purple-100 text-purple-800");
    assert_eq!(reply["state"], "initial");

    let sid = reply["session_id"].as_str().unwrap().to_string();
    assert!(sid.starts_with("sess_"));

    // Case folding lands the shouted version on the same rule
    let (status, shouted) =
        send_chat(&client, &base_url, "WHAT ARE YOUR HOURS?", Some(&sid)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shouted["intent"], "business_hours");
    assert_eq!(shouted["session_id"], sid.as_str());

    server_handle.abort();

    Ok(())
}

/// Test session inspection and reset over HTTP
#[tokio::test]
async fn test_sessions_persist_and_reset() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().without_seed().build();
    let (base_url, server_handle) = spawn_server(config).await?;
    let client = create_test_client();

    let (_, first) = send_chat(&client, &base_url, "hello there", None).await?;
    let sid = first["session_id"].as_str().unwrap().to_string();
    send_chat(&client, &base_url, "do you do haircuts?", Some(&sid)).await?;

    let session_url = format!("{base_url}/api/voice/sessions/{sid}");
    let (status, session) = get_json(&client, &session_url).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["data"]["session_id"], sid.as_str());
    // Greeting plus two exchanges of caller turn and reply
    assert_eq!(session["data"]["turn_count"], 5);

    // Reset keeps the id and restarts the transcript at the greeting
    let response = client
        .delete(&session_url)
        .send()
        .await
        .with_context(|| "session reset failed")?;
    assert_eq!(response.status(), StatusCode::OK);
    let reset: serde_json::Value = response
        .json()
        .await
        .with_context(|| "decoding reset body")?;
    assert_eq!(reset["message"], "Session reset");
    assert_eq!(reset["data"]["turn_count"], 1);
    assert_eq!(reset["data"]["state"], "initial");

    let (status, _) = get_json(&client, &session_url).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, missing) =
        get_json(&client, &format!("{base_url}/api/voice/sessions/sess_missing")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["code"], "SESSION_NOT_FOUND");

    server_handle.abort();

    Ok(())
}

/// Test that a chat booking lands in the appointment book and call log
#[tokio::test]
async fn test_booking_over_http_lands_in_the_stores() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().without_seed().build();
    let (base_url, server_handle) = spawn_server(config).await?;
    let client = create_test_client();

    let (_, opened) =
        send_chat(&client, &base_url, "I'd like to book an appointment", None).await?;
    let sid = opened["session_id"].as_str().unwrap().to_string();

    for utterance in [
        "I need a consultation",
        "John Smith",
        "555-123-4567",
        "tomorrow afternoon",
    ] {
        let (status, _) = send_chat(&client, &base_url, utterance, Some(&sid)).await?;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, done) = send_chat(&client, &base_url, "yes, book it", Some(&sid)).await?;
    assert_eq!(done["state"], "completed");

    // The confirmed booking became an appointment
    let (status, book) = get_json(&client, &format!("{base_url}/api/appointments")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["total"], 1);
    let appointment = &book["appointments"][0];
    assert_eq!(appointment["customer_name"], "John Smith");
    assert_eq!(appointment["service_type"], "Consultation");
    assert_eq!(appointment["status"], "scheduled");
    assert_eq!(appointment["notes"], "Requested: tomorrow at afternoon");

    // The conversation became a completed call with the booking flags set
    let (_, calls) = get_json(&client, &format!("{base_url}/api/phone/calls")).await?;
    assert_eq!(calls["total"], 1);
    let call = &calls["calls"][0];
    assert_eq!(call["session_id"], sid.as_str());
    assert_eq!(call["status"], "completed");
    assert_eq!(call["appointment_booked"], true);
    assert_eq!(call["lead_qualified"], true);
    assert_eq!(
        call["conversation_summary"],
        "Customer booked a consultation appointment for tomorrow at afternoon."
    );

    let (_, stats) = get_json(&client, &format!("{base_url}/api/dashboard/stats")).await?;
    assert_eq!(stats["data"]["total_calls"], 1);
    assert_eq!(stats["data"]["appointments_booked"], 1);
    assert_eq!(stats["data"]["leads_generated"], 1);

    server_handle.abort();

    Ok(())
}

/// Test call log listing, filtering, fetching and export
#[tokio::test]
async fn test_call_log_endpoints() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().build();
    let (base_url, server_handle) = spawn_server(config).await?;
    let client = create_test_client();

    let (status, page) = get_json(&client, &format!("{base_url}/api/phone/calls")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 5);
    assert_eq!(page["calls"][0]["session_id"], "sess_001");

    let (_, failed) =
        get_json(&client, &format!("{base_url}/api/phone/calls?status=failed")).await?;
    assert_eq!(failed["total"], 1);
    assert_eq!(failed["calls"][0]["session_id"], "sess_005");

    let call_id = page["calls"][0]["id"].as_str().unwrap().to_string();
    let (status, single) =
        get_json(&client, &format!("{base_url}/api/phone/calls/{call_id}")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["data"]["id"], call_id.as_str());

    let (status, missing) = get_json(
        &client,
        &format!("{base_url}/api/phone/calls/{}", uuid::Uuid::new_v4()),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["code"], "CALL_NOT_FOUND");

    // Export returns a CSV attachment with one row per call
    let response = client
        .get(format!("{base_url}/api/phone/calls/export"))
        .send()
        .await
        .with_context(|| "export request failed")?;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));
    let csv = response.text().await.with_context(|| "reading export body")?;
    assert_eq!(csv.lines().count(), 6);
    assert!(csv.starts_with("id,session_id,"));
    assert!(csv.contains("sess_001"));

    server_handle.abort();

    Ok(())
}

/// Test the appointment lifecycle over HTTP
#[tokio::test]
async fn test_appointment_lifecycle() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().build();
    let (base_url, server_handle) = spawn_server(config).await?;
    let client = create_test_client();

    let (status, book) = get_json(&client, &format!("{base_url}/api/appointments")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["total"], 5);
    assert_eq!(book["appointments"][0]["customer_name"], "Robert Brown");

    // Book a new visit
    let visit_date = (chrono::Utc::now().date_naive() + chrono::Duration::days(10)).to_string();
    let response = client
        .post(format!("{base_url}/api/appointments"))
        .json(&json!({
            "customer_name": "Alice Green",
            "customer_phone": "(555) 777-8888",
            "customer_email": "alice@example.com",
            "service_type": "Treatment",
            "scheduled_date": visit_date,
            "scheduled_time": "11:00:00"
        }))
        .send()
        .await
        .with_context(|| "create appointment failed")?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: serde_json::Value = response
        .json()
        .await
        .with_context(|| "decoding created appointment")?;
    assert_eq!(created["data"]["status"], "scheduled");
    assert_eq!(created["data"]["duration_minutes"], 60);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (_, grown) = get_json(&client, &format!("{base_url}/api/appointments")).await?;
    assert_eq!(grown["total"], 6);

    // Walk the booking through its lifecycle
    let status_url = format!("{base_url}/api/appointments/{id}/status");
    let response = client
        .patch(&status_url)
        .json(&json!({ "status": "confirmed" }))
        .send()
        .await
        .with_context(|| "confirm failed")?;
    assert_eq!(response.status(), StatusCode::OK);
    let confirmed: serde_json::Value = response
        .json()
        .await
        .with_context(|| "decoding confirm body")?;
    assert_eq!(confirmed["message"], "Appointment status updated");
    assert_eq!(confirmed["data"]["status"], "confirmed");

    // Moving back to scheduled is not a legal transition
    let response = client
        .patch(&status_url)
        .json(&json!({ "status": "scheduled" }))
        .send()
        .await
        .with_context(|| "illegal transition request failed")?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let rejected: serde_json::Value = response
        .json()
        .await
        .with_context(|| "decoding rejection body")?;
    assert_eq!(rejected["code"], "INVALID_STATUS_TRANSITION");

    let response = client
        .patch(format!(
            "{base_url}/api/appointments/{}/status",
            uuid::Uuid::new_v4()
        ))
        .json(&json!({ "status": "confirmed" }))
        .send()
        .await
        .with_context(|| "unknown appointment request failed")?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Invalid email is caught by validation
    let response = client
        .post(format!("{base_url}/api/appointments"))
        .json(&json!({
            "customer_name": "Bad Email",
            "customer_email": "not-an-email",
            "service_type": "Consultation",
            "scheduled_date": visit_date,
            "scheduled_time": "11:00:00"
        }))
        .send()
        .await
        .with_context(|| "invalid email request failed")?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    server_handle.abort();

    Ok(())
}

/// Test the schedule views and the slot grid
#[tokio::test]
async fn test_schedule_views_and_availability() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().build();
    let (base_url, server_handle) = spawn_server(config).await?;
    let client = create_test_client();

    let (status, today) = get_json(&client, &format!("{base_url}/api/appointments/today")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(today["data"].as_array().unwrap().len(), 1);
    assert_eq!(today["data"][0]["customer_name"], "Robert Brown");

    let (_, upcoming) =
        get_json(&client, &format!("{base_url}/api/appointments/upcoming")).await?;
    assert_eq!(upcoming["data"].as_array().unwrap().len(), 3);
    assert_eq!(upcoming["data"][0]["customer_name"], "John Smith");

    let (_, availability) =
        get_json(&client, &format!("{base_url}/api/appointments/availability")).await?;
    assert_eq!(availability["data"]["total"], 36);
    let slots = availability["data"]["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 36);
    assert!(slots[0].as_str().unwrap().contains("09:00"));

    server_handle.abort();

    Ok(())
}

/// Test reading and editing the business settings
#[tokio::test]
async fn test_settings_round_trip() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().build();
    let (base_url, server_handle) = spawn_server(config).await?;
    let client = create_test_client();
    let settings_url = format!("{base_url}/api/settings");

    let (status, settings) = get_json(&client, &settings_url).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["data"]["business_name"], "Your Business Name");

    let response = client
        .put(&settings_url)
        .json(&json!({
            "business_name": "Sunrise Dental",
            "tagline": "We answer every call"
        }))
        .send()
        .await
        .with_context(|| "settings update failed")?;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: serde_json::Value = response
        .json()
        .await
        .with_context(|| "decoding settings body")?;
    assert_eq!(updated["message"], "Settings updated");
    assert_eq!(updated["data"]["business_name"], "Sunrise Dental");
    // The unknown key became a new row
    assert_eq!(updated["data"]["tagline"], "We answer every call");

    let response = client
        .put(&settings_url)
        .json(&json!({}))
        .send()
        .await
        .with_context(|| "empty settings update failed")?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    server_handle.abort();

    Ok(())
}

/// Test the dashboard snapshot over the seeded demo data
#[tokio::test]
async fn test_dashboard_stats_reflect_the_seed() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().build();
    let (base_url, server_handle) = spawn_server(config).await?;
    let client = create_test_client();

    let (status, stats) = get_json(&client, &format!("{base_url}/api/dashboard/stats")).await?;
    assert_eq!(status, StatusCode::OK);

    let data = &stats["data"];
    assert_eq!(data["total_calls"], 5);
    assert_eq!(data["appointments_booked"], 1);
    assert_eq!(data["leads_generated"], 2);
    assert_eq!(data["appointments_today"], 1);
    assert_eq!(data["upcoming_appointments"], 3);
    assert_eq!(data["daily"].as_array().unwrap().len(), 7);
    assert_eq!(data["recent_calls"].as_array().unwrap().len(), 5);
    assert_eq!(data["recent_calls"][0]["session_id"], "sess_001");
    assert!(data["average_call_duration"].is_string());

    server_handle.abort();

    Ok(())
}

/// Test the intent legend and the docs catalogue
#[tokio::test]
async fn test_intent_legend_and_docs() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().build();
    let (base_url, server_handle) = spawn_server(config).await?;
    let client = create_test_client();

    let (status, intents) = get_json(&client, &format!("{base_url}/api/intents")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(intents["data"]["intents"].as_array().unwrap().len(), 10);
    assert_eq!(intents["data"]["suggestions"].as_array().unwrap().len(), 8);
    assert_eq!(
        intents["data"]["default_badge_style"],
        "bg-gray-100 text-gray-800"
    );

    let (_, root) = get_json(&client, &base_url).await?;
    assert_eq!(root["status"], "operational");

    let (_, docs) = get_json(&client, &format!("{base_url}/api/docs")).await?;
    assert_eq!(docs["endpoints"].as_array().unwrap().len(), 19);

    server_handle.abort();

    Ok(())
}

/// Test API error handling for bad routes and bad bodies
#[tokio::test]
async fn test_api_error_handling() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().build();
    let (base_url, server_handle) = spawn_server(config).await?;
    let client = create_test_client();

    let (status, body) = get_json(&client, &format!("{base_url}/api/nonexistent")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ROUTE_NOT_FOUND");

    // Blank and oversized chat messages are rejected
    let (status, _) = send_chat(&client, &base_url, "   ", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let oversized = "x".repeat(2001);
    let (status, rejected) = send_chat(&client, &base_url, &oversized, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected["code"], "INVALID_PARAMETERS");

    // A body without the message field never reaches the handler
    let response = client
        .post(format!("{base_url}/api/voice/text-chat"))
        .json(&json!({ "wrong": true }))
        .send()
        .await
        .with_context(|| "malformed chat request failed")?;
    assert!(response.status().is_client_error());

    // Zero limit fails query validation
    let (status, _) = get_json(&client, &format!("{base_url}/api/phone/calls?limit=0")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    server_handle.abort();

    Ok(())
}

/// Test CORS headers on cross-origin requests
#[tokio::test]
async fn test_cors_headers() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().build();
    let (base_url, server_handle) = spawn_server(config).await?;
    let client = create_test_client();

    let response = client
        .get(format!("{base_url}/health"))
        .header("Origin", "http://localhost:5173")
        .send()
        .await
        .with_context(|| "cross-origin request failed")?;
    assert_eq!(response.status(), StatusCode::OK);

    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok());
    assert_eq!(allow_origin, Some("*"));

    server_handle.abort();

    Ok(())
}

/// Test concurrent chat requests against one server
#[tokio::test]
async fn test_concurrent_chat_requests() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().without_seed().build();
    let (base_url, server_handle) = spawn_server(config).await?;
    let client = create_test_client();

    let mut handles = Vec::new();
    for n in 0..6 {
        let client = client.clone();
        let base_url = base_url.clone();
        handles.push(tokio::spawn(async move {
            send_chat(&client, &base_url, &format!("hello from caller {n}"), None).await
        }));
    }

    for handle in handles {
        let (status, reply) = handle.await.unwrap()?;
        assert_eq!(status, StatusCode::OK);
        assert!(reply["session_id"].as_str().unwrap().starts_with("sess_"));
    }

    // Every caller got its own session
    let (_, report) = get_json(&client, &format!("{base_url}/health/detailed")).await?;
    assert_eq!(report["checks"]["sessions"]["live"], 6);
    assert_eq!(report["checks"]["receptionist"]["total_requests"], 6);

    server_handle.abort();

    Ok(())
}
