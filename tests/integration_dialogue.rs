//! Integration tests for the dialogue engine behind the application state
#![forbid(unsafe_code)]

mod common;

use common::*;
use frontdesk_api::AppState;
use frontdesk_core::context_error::Result;
use frontdesk_dialogue::{DialogueError, DialogueStage, ReceptionistService};
use frontdesk_nlu::{APOLOGY_RESPONSE, RULE_TABLE, WELCOME_RESPONSE};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::time::sleep;

fn empty_state() -> Result<AppState> {
    Ok(AppState::new(TestConfigBuilder::new().without_seed().build())?)
}

/// Test that the receptionist built by the state answers from the rule table
#[tokio::test]
async fn test_receptionist_is_wired_from_configuration() -> Result<()> {
    init_test_logging();

    let state = empty_state()?;
    let reply = state
        .receptionist
        .respond(None, "what are your hours?")
        .await
        .unwrap();

    assert!(reply.session_id.starts_with("sess_"));
    assert_eq!(reply.response, RULE_TABLE[1].response);
    assert!((reply.confidence - 0.92).abs() < f32::EPSILON);
    assert_eq!(reply.state, DialogueStage::Initial);

    // Matching folds case, so a shouted question lands on the same rule
    let shouted = state
        .receptionist
        .respond(Some(&reply.session_id), "WHAT ARE YOUR HOURS?!")
        .await
        .unwrap();
    assert_eq!(shouted.response, RULE_TABLE[1].response);

    let info = state.sessions.get_info(&reply.session_id).unwrap();
    // Greeting plus two exchanges of caller turn and reply
    assert_eq!(info.turn_count, 5);

    Ok(())
}

/// Test that a completed booking is handed off without touching the stores
#[tokio::test]
async fn test_booking_handoff_stays_out_of_the_stores() -> Result<()> {
    init_test_logging();

    let state = empty_state()?;
    let opened = state
        .receptionist
        .respond(None, "I'd like to book an appointment")
        .await
        .unwrap();
    let sid = opened.session_id;

    for utterance in [
        "I need a consultation",
        "John Smith",
        "555-123-4567",
        "tomorrow afternoon",
    ] {
        state
            .receptionist
            .respond(Some(&sid), utterance)
            .await
            .unwrap();
    }

    let done = state
        .receptionist
        .respond(Some(&sid), "yes, book it")
        .await
        .unwrap();
    assert_eq!(done.state, DialogueStage::Completed);

    let request = done.booking.unwrap();
    assert_eq!(request.customer_name, "John Smith");
    assert_eq!(request.service_type, "Consultation");

    // Persistence belongs to the HTTP layer, not the dialogue engine
    assert!(state.appointments.is_empty());
    assert!(state.calls.is_empty());

    let info = state.sessions.get_info(&sid).unwrap();
    assert_eq!(info.state, DialogueStage::Completed);
    assert_eq!(info.turn_count, 13);

    Ok(())
}

/// Test that the configured failure mode produces retryable errors
#[tokio::test]
async fn test_configured_failures_surface_as_retryable_errors() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new().without_seed().with_failures().build();
    let state = AppState::new(config)?;
    let sid = state.sessions.ensure(None);

    let err = state
        .receptionist
        .respond(Some(&sid), "hello there")
        .await
        .unwrap_err();
    assert!(matches!(err, DialogueError::ResponderUnavailable { .. }));
    assert!(err.is_retryable());

    // The apology still lands in the transcript
    let info = state.sessions.get_info(&sid).unwrap();
    let last = info.history.last().unwrap();
    assert_eq!(last.content, APOLOGY_RESPONSE);
    assert_eq!(last.intent.as_deref(), Some("error"));
    // Greeting, caller turn, apology
    assert_eq!(info.turn_count, 3);

    let health = state.receptionist.health_check().await;
    assert!(!health.healthy);

    Ok(())
}

/// Test that session expiry follows the configured maximum age
#[tokio::test]
async fn test_session_expiry_follows_the_configured_age() -> Result<()> {
    init_test_logging();

    let config = TestConfigBuilder::new()
        .without_seed()
        .with_instant_session_expiry()
        .build();
    let state = AppState::new(config)?;

    let reply = state.receptionist.respond(None, "hello").await.unwrap();
    assert_eq!(state.sessions.len(), 1);

    // Zero maximum age, so any elapsed time past the last turn expires it
    sleep(Duration::from_millis(5)).await;
    assert_eq!(state.sessions.cleanup_expired(), 1);
    assert!(state.sessions.is_empty());
    assert!(state.sessions.get_info(&reply.session_id).is_none());

    Ok(())
}

/// Test that resetting a session restarts the transcript under the same id
#[tokio::test]
async fn test_reset_restarts_a_session_in_place() -> Result<()> {
    init_test_logging();

    let state = empty_state()?;
    let opened = state
        .receptionist
        .respond(None, "book an appointment")
        .await
        .unwrap();
    let sid = opened.session_id;
    state
        .receptionist
        .respond(Some(&sid), "a consultation")
        .await
        .unwrap();

    let info = state.sessions.reset(&sid).unwrap();
    assert_eq!(info.session_id, sid);
    assert_eq!(info.state, DialogueStage::Initial);
    assert_eq!(info.turn_count, 1);
    assert_eq!(info.history[0].content, WELCOME_RESPONSE);

    // The reset session keeps taking turns under the same id
    let next = state
        .receptionist
        .respond(Some(&sid), "what services do you offer?")
        .await
        .unwrap();
    assert_eq!(next.session_id, sid);
    assert_eq!(state.sessions.get_info(&sid).unwrap().turn_count, 3);

    Ok(())
}

/// Test that the transcript cap comes from the session configuration
#[tokio::test]
async fn test_transcript_cap_comes_from_configuration() -> Result<()> {
    init_test_logging();

    let mut config = TestConfigBuilder::new().without_seed().build();
    config.session.max_history_turns = 4;
    let state = AppState::new(config)?;

    let opened = state.receptionist.respond(None, "hello").await.unwrap();
    let sid = opened.session_id;
    for _ in 0..4 {
        state
            .receptionist
            .respond(Some(&sid), "what are your hours?")
            .await
            .unwrap();
    }

    let info = state.sessions.get_info(&sid).unwrap();
    assert_eq!(info.turn_count, 4);
    // The greeting was trimmed long ago
    assert!(info.history.iter().all(|turn| turn.content != WELCOME_RESPONSE));

    Ok(())
}
