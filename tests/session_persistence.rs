//! Integration tests for thread persistence across sessions.
//!
//! These tests validate the snapshot lifecycle:
//! - Session writes threads → new session restores them
//! - Filesystem and in-memory stores behave identically
//! - The compose placeholder is forced empty on restore
//! - Version mismatches and corrupt snapshots fail loudly instead of
//!   silently feeding garbage into a session
//!
//! The ledger is deliberately absent here: signatures are session-local
//! and never persisted.

use std::collections::HashMap;
use sigil::client::{ClientError, SigilClient};
use sigil::identity::{Identity, NodeId, ProcessId};
use sigil::snapshot::{
    self, BlobStore, FsBlobStore, MemoryBlobStore, SnapshotError, SNAPSHOT_KEY,
};
use sigil::threads::{ThreadMessage, COMPOSE_THREAD};
use sigil::transport::MockNotary;
use tempfile::TempDir;

// === Test Fixtures ===

fn test_identity() -> Identity {
    Identity {
        node: NodeId("alice.os".to_string()),
        process: ProcessId("sigil:sigil:template.os".to_string()),
    }
}

fn client_with_store(notary: MockNotary, store: Box<dyn BlobStore>) -> SigilClient<MockNotary> {
    SigilClient::new(notary, Some(test_identity())).with_store(store)
}

fn ok_signature(bytes: &[u8]) -> Vec<u8> {
    serde_json::to_vec(&Ok::<&[u8], String>(bytes)).unwrap()
}

// === Restore Flows ===

#[tokio::test]
async fn test_threads_survive_across_sessions_in_memory() {
    let store = MemoryBlobStore::new();

    // First session sends into a thread
    let notary = MockNotary::new();
    notary.push_reply(Ok(ok_signature(&[1])));
    let session_one = client_with_store(notary, Box::new(store.clone()));
    session_one.start_thread("bob.os").await.unwrap();
    session_one.send_message("see you next session").await.unwrap();
    drop(session_one);

    // Second session restores it
    let session_two = client_with_store(MockNotary::new(), Box::new(store));
    assert!(session_two.restore_threads().await.unwrap());

    let thread = session_two.thread("bob.os").await.unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].content, "see you next session");
}

#[tokio::test]
async fn test_threads_survive_across_sessions_on_disk() {
    let temp_dir = TempDir::new().unwrap();

    let notary = MockNotary::new();
    notary.push_reply(Ok(ok_signature(&[1])));
    let session_one =
        client_with_store(notary, Box::new(FsBlobStore::new(temp_dir.path())));
    session_one.start_thread("bob.os").await.unwrap();
    session_one.send_message("persisted").await.unwrap();
    drop(session_one);

    let session_two =
        client_with_store(MockNotary::new(), Box::new(FsBlobStore::new(temp_dir.path())));
    assert!(session_two.restore_threads().await.unwrap());
    assert_eq!(session_two.thread("bob.os").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_pushed_messages_are_persisted() {
    use sigil::wire::{NewMessage, PushEvent};

    let store = MemoryBlobStore::new();
    let session_one = client_with_store(MockNotary::new(), Box::new(store.clone()));

    session_one
        .apply_push(PushEvent::NewMessage(NewMessage {
            id: "carol.os".to_string(),
            author: "carol.os".to_string(),
            content: "pushed".to_string(),
        }))
        .await;
    drop(session_one);

    let session_two = client_with_store(MockNotary::new(), Box::new(store));
    assert!(session_two.restore_threads().await.unwrap());
    assert_eq!(session_two.thread("carol.os").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_restore_without_snapshot_reports_none() {
    let client = client_with_store(MockNotary::new(), Box::new(MemoryBlobStore::new()));

    assert!(!client.restore_threads().await.unwrap());
    assert_eq!(client.counterparties().await, vec![COMPOSE_THREAD.to_string()]);
}

#[tokio::test]
async fn test_restore_without_attached_store_is_a_noop() {
    let client = SigilClient::new(MockNotary::new(), Some(test_identity()));

    assert!(!client.restore_threads().await.unwrap());
}

// === Snapshot Hygiene ===

#[tokio::test]
async fn test_restore_forces_placeholder_empty() {
    let store = MemoryBlobStore::new();

    // A tampered snapshot that smuggles messages into the placeholder
    let mut threads = HashMap::new();
    threads.insert(
        COMPOSE_THREAD.to_string(),
        vec![ThreadMessage {
            author: "mallory.os".to_string(),
            content: "smuggled".to_string(),
        }],
    );
    threads.insert(
        "bob.os".to_string(),
        vec![ThreadMessage {
            author: "bob.os".to_string(),
            content: "legit".to_string(),
        }],
    );
    snapshot::save_threads(&store, threads).unwrap();

    let client = client_with_store(MockNotary::new(), Box::new(store));
    assert!(client.restore_threads().await.unwrap());

    assert!(client.thread(COMPOSE_THREAD).await.unwrap().is_empty());
    assert_eq!(client.thread("bob.os").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_restore_rejects_unsupported_version() {
    let store = MemoryBlobStore::new();
    store
        .put(
            SNAPSHOT_KEY,
            br#"{"version":99,"threads":{}}"#,
        )
        .unwrap();

    let client = client_with_store(MockNotary::new(), Box::new(store));
    let result = client.restore_threads().await;

    assert!(matches!(
        result,
        Err(ClientError::Snapshot(SnapshotError::UnsupportedVersion(99)))
    ));
}

#[tokio::test]
async fn test_restore_rejects_corrupt_snapshot() {
    let store = MemoryBlobStore::new();
    store.put(SNAPSHOT_KEY, b"{truncated").unwrap();

    let client = client_with_store(MockNotary::new(), Box::new(store));
    let result = client.restore_threads().await;

    assert!(matches!(
        result,
        Err(ClientError::Snapshot(SnapshotError::Decode(_)))
    ));
}

// === Persist-on-Change ===

#[tokio::test]
async fn test_every_thread_change_is_written_through() {
    let notary = MockNotary::new();
    notary.push_reply(Ok(ok_signature(&[1])));
    notary.push_reply(Ok(ok_signature(&[2])));

    let store = MemoryBlobStore::new();
    let client = client_with_store(notary, Box::new(store.clone()));

    client.start_thread("bob.os").await.unwrap();
    client.send_message("one").await.unwrap();
    client.send_message("two").await.unwrap();

    // Read the snapshot back directly, bypassing the client
    let persisted = snapshot::load_threads(&store).unwrap().unwrap();
    assert_eq!(persisted.get("bob.os").map(|t| t.len()), Some(2));
}

#[tokio::test]
async fn test_history_bootstrap_is_persisted() {
    let notary = MockNotary::new();
    notary.set_history(
        br#"{"History":{"messages":{"eve.os":[{"author":"eve.os","content":"from server"}]}}}"#
            .to_vec(),
    );

    let store = MemoryBlobStore::new();
    let client = client_with_store(notary, Box::new(store.clone()));
    client.load_history().await.unwrap();
    drop(client);

    let persisted = snapshot::load_threads(&store).unwrap().unwrap();
    assert_eq!(persisted.get("eve.os").map(|t| t.len()), Some(1));
}
