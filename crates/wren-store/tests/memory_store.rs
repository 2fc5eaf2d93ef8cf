//! Integration tests for the in-memory session store.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::{json, Value};

use wren_core::{
    ActionPayload, Message, MessageMetadata, RobotAction, SensorReading, Session, SessionStatus,
};
use wren_store::{EmotionFeed, MemoryStore, NewSession, SessionStore, StoreError};

fn new_session(child_id: &str) -> NewSession {
    NewSession {
        session_id: Session::generate_id(),
        child_id: child_id.to_string(),
        child_name: "Mina".to_string(),
        clinician_id: "clin-1".to_string(),
        metadata: HashMap::new(),
    }
}

#[tokio::test]
async fn session_numbers_are_monotonic_per_child() {
    let store = MemoryStore::new();

    let first = store.create_session(new_session("child-a")).await.unwrap();
    let second = store.create_session(new_session("child-a")).await.unwrap();
    let other = store.create_session(new_session("child-b")).await.unwrap();

    assert_eq!(first.session_number, 1);
    assert_eq!(second.session_number, 2);
    assert_eq!(other.session_number, 1);

    // Ending a session never frees its number for reuse.
    store.end_session(&second.session_id).await.unwrap();
    let third = store.create_session(new_session("child-a")).await.unwrap();
    assert_eq!(third.session_number, 3);
}

#[tokio::test]
async fn created_sessions_start_active_with_child_ready_false() {
    let store = MemoryStore::new();
    let session = store.create_session(new_session("c")).await.unwrap();
    assert_eq!(session.status, SessionStatus::Active);
    assert!(!session.child_ready());
}

#[tokio::test]
async fn find_active_session_prefers_newest() {
    let store = MemoryStore::new();
    let old = store.create_session(new_session("c")).await.unwrap();
    store.end_session(&old.session_id).await.unwrap();
    let fresh = store.create_session(new_session("c")).await.unwrap();

    let active = store.find_active_session().await.unwrap().unwrap();
    assert_eq!(active.session_id, fresh.session_id);
}

#[tokio::test]
async fn metadata_updates_merge_instead_of_overwrite() {
    let store = MemoryStore::new();
    let mut new = new_session("c");
    new.metadata.insert("child_age".to_string(), json!(5));
    let session = store.create_session(new).await.unwrap();

    let mut updates = HashMap::new();
    updates.insert("child_ready".to_string(), Value::Bool(true));
    store
        .update_metadata(&session.session_id, updates)
        .await
        .unwrap();

    let session = store
        .get_session(&session.session_id)
        .await
        .unwrap()
        .unwrap();
    assert!(session.child_ready());
    assert_eq!(session.child_age(), Some(5));
}

#[tokio::test]
async fn end_session_is_idempotent_and_stamps_ended_at() {
    let store = MemoryStore::new();
    let session = store.create_session(new_session("c")).await.unwrap();

    store.end_session(&session.session_id).await.unwrap();
    let ended = store
        .get_session(&session.session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ended.status, SessionStatus::Completed);
    let first_ended_at = ended.ended_at.unwrap();

    store.end_session(&session.session_id).await.unwrap();
    let again = store
        .get_session(&session.session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.ended_at, Some(first_ended_at));
}

#[tokio::test]
async fn completed_sessions_reject_message_writes() {
    let store = MemoryStore::new();
    let session = store.create_session(new_session("c")).await.unwrap();
    store.end_session(&session.session_id).await.unwrap();

    let err = store
        .append_message(Message::user(&session.session_id, "hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::SessionCompleted { .. }));
}

#[tokio::test]
async fn messages_read_back_in_timestamp_order_with_metadata_intact() {
    let store = MemoryStore::new();
    let session = store.create_session(new_session("c")).await.unwrap();

    let greeting = Message::assistant(&session.session_id, "Hi there!").with_metadata(
        MessageMetadata {
            robot_action: Some(ActionPayload::new(RobotAction::JumpForward, "r")),
            ..Default::default()
        },
    );
    store.append_message(greeting).await.unwrap();
    store
        .append_message(Message::user(&session.session_id, "hi"))
        .await
        .unwrap();

    let messages = store.session_messages(&session.session_id).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].timestamp <= messages[1].timestamp);

    let action = messages[0]
        .metadata
        .as_ref()
        .unwrap()
        .robot_action
        .as_ref()
        .unwrap();
    assert_eq!(action.action, RobotAction::JumpForward);
    assert_eq!(action.reason, "r");
}

#[tokio::test]
async fn emotion_feed_respects_recency_window() {
    let store = MemoryStore::new();

    let mut stale = SensorReading::new("sad");
    stale.timestamp = chrono::Utc::now() - chrono::Duration::seconds(120);
    store.record_emotion("s1", stale).await.unwrap();

    assert!(store
        .current_emotion("s1", Duration::from_secs(30))
        .await
        .unwrap()
        .is_none());

    store
        .record_emotion("s1", SensorReading::new("happy"))
        .await
        .unwrap();
    let reading = store
        .current_emotion("s1", Duration::from_secs(30))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reading.emotion, "happy");
}
