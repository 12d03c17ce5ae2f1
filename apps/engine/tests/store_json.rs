//! JSON file store: round-tripping snapshots, win accounting and the failure
//! modes around missing or corrupted documents.

use time::OffsetDateTime;
use wordchain_engine::domain::difficulty::params_for;
use wordchain_engine::domain::state::Session;
use wordchain_engine::errors::domain::{DomainError, InfraErrorKind};
use wordchain_engine::store::JsonFileStore;
use wordchain_engine::{Mode, SessionSnapshot, SnapshotStore};

fn sample_snapshot(conversation_id: &str) -> SessionSnapshot {
    let mut session = Session::new_lobby(
        conversation_id,
        "p1",
        Mode::Hard,
        params_for(Mode::Hard, 0),
        OffsetDateTime::UNIX_EPOCH,
    );
    session.players.push("p2".to_string());
    session.record_word("quartz");
    SessionSnapshot::from(&session)
}

#[tokio::test]
async fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("sessions.json"));

    assert!(store.load_all().await.unwrap().is_empty());
    assert!(store.player_stats("p1").await.unwrap().is_none());
    // Removing from an empty store is a no-op, not an error.
    store.remove("conv").await.unwrap();
}

#[tokio::test]
async fn snapshots_survive_a_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    let snapshot = sample_snapshot("room-1@g.us");

    let store = JsonFileStore::new(&path);
    store.save("room-1@g.us", &snapshot).await.unwrap();
    drop(store);

    // A fresh store over the same file sees the same document.
    let reopened = JsonFileStore::new(&path);
    let loaded = reopened.load_all().await.unwrap();
    assert_eq!(loaded, vec![("room-1@g.us".to_string(), snapshot.clone())]);

    // The snapshot rebuilds a playable session.
    let session = loaded.into_iter().next().map(|(_, s)| s.into_session());
    let session = session.unwrap();
    assert_eq!(session.chain_letter, Some('z'));
    assert!(session.used_words.contains("quartz"));

    reopened.remove("room-1@g.us").await.unwrap();
    assert!(reopened.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn wins_accumulate_across_games() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("sessions.json"));

    store.record_win("p2", 7, 4).await.unwrap();
    store.record_win("p2", 3, 2).await.unwrap();
    store.record_win("p9", 0, 1).await.unwrap();

    let stats = store.player_stats("p2").await.unwrap().unwrap();
    assert_eq!(stats.wins, 2);
    assert_eq!(stats.words_played, 10);
    assert_eq!(stats.rounds_played, 6);
    assert_eq!(store.player_stats("p9").await.unwrap().unwrap().wins, 1);
}

#[tokio::test]
async fn corrupted_document_is_reported_not_clobbered() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    tokio::fs::write(&path, b"{not json").await.unwrap();

    let store = JsonFileStore::new(&path);
    let err = store.load_all().await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Infra(InfraErrorKind::DataCorruption, _)
    ));

    // A failed save leaves the broken document in place for inspection.
    let save = store.save("conv", &sample_snapshot("conv")).await;
    assert!(save.is_err());
    let on_disk = tokio::fs::read(&path).await.unwrap();
    assert_eq!(on_disk, b"{not json");
}
