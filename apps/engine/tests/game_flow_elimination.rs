//! Timeout eliminations, the win condition and winner statistics.

use wordchain_engine::domain::SessionState;
use wordchain_engine::test_support::{
    drain_notes, note_containing, set_chain_letter, TestStateBuilder,
};
use wordchain_engine::{Mode, SnapshotStore, SubmitOutcome};

const CONV: &str = "room-1@g.us";

#[tokio::test]
async fn silent_turn_warns_then_eliminates_and_crowns_the_survivor() {
    let (service, mut rx, store) = TestStateBuilder::new().build();

    service.start(CONV, "p1", Mode::Medium).await.unwrap();
    service.join(CONV, "p2").await.unwrap();
    note_containing(&mut rx, "starting with 2 players").await;

    // Nobody submits: the countdown warnings fire, then the timeout.
    note_containing(&mut rx, "seconds left").await;
    note_containing(&mut rx, "Time's up for @p1").await;
    note_containing(&mut rx, "Winner: @p2").await;

    // Finished is terminal: the session is gone everywhere.
    assert!(service.status(CONV).await.is_err());
    assert_eq!(store.session_count(), 0);

    // Winner statistics were credited additively.
    let stats = store.player_stats("p2").await.unwrap().unwrap();
    assert_eq!(stats.wins, 1);
    assert_eq!(stats.words_played, 0);
    assert_eq!(stats.rounds_played, 1);
    assert!(store.player_stats("p1").await.unwrap().is_none());
}

#[tokio::test]
async fn elimination_passes_the_turn_without_changing_the_chain_letter() {
    let (service, mut rx, _store) = TestStateBuilder::new().build();

    service.start(CONV, "p1", Mode::Medium).await.unwrap();
    service.join(CONV, "p2").await.unwrap();
    service.join(CONV, "p3").await.unwrap();
    note_containing(&mut rx, "starting with 3 players").await;
    set_chain_letter(&service, CONV, 'q').await;

    note_containing(&mut rx, "Time's up for @p1").await;

    let status = service.status(CONV).await.unwrap();
    assert_eq!(status.state, SessionState::Active);
    assert_eq!(status.players, vec!["p2".to_string(), "p3".to_string()]);
    assert_eq!(status.current_player, Some("p2".to_string()));
    // No word was played, so the round and the required letter stand.
    assert_eq!(status.round, 0);
    let handle = service.state().registry.get(CONV).unwrap();
    assert_eq!(handle.session.lock().await.chain_letter, Some('q'));
}

#[tokio::test]
async fn an_accepted_word_cancels_the_turn_timers() {
    let (service, mut rx, _store) = TestStateBuilder::new()
        .known_words(&["cat"])
        .build();

    service.start(CONV, "p1", Mode::Easy).await.unwrap();
    service.join(CONV, "p2").await.unwrap();
    note_containing(&mut rx, "starting with 2 players").await;
    set_chain_letter(&service, CONV, 'c').await;

    assert_eq!(
        service.submit_word(CONV, "p1", "cat").await.unwrap(),
        SubmitOutcome::Accepted
    );
    drain_notes(&mut rx);

    // The next elimination, when it comes, is p2's — p1's old timer must not
    // fire after the turn it belonged to ended.
    let (_, note) = note_containing(&mut rx, "Time's up").await;
    assert!(note.text.contains("@p2"), "stale timer fired: {}", note.text);
}

#[tokio::test]
async fn exactly_one_elimination_per_expired_turn() {
    let (service, mut rx, _store) = TestStateBuilder::new().build();

    service.start(CONV, "p1", Mode::Medium).await.unwrap();
    service.join(CONV, "p2").await.unwrap();
    note_containing(&mut rx, "starting with 2 players").await;

    note_containing(&mut rx, "Winner: @p2").await;

    // Give any stray timer a chance to misfire before checking the tail.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    let eliminations = drain_notes(&mut rx)
        .into_iter()
        .filter(|(_, note)| note.text.contains("Time's up"))
        .count();
    // The only elimination notice was consumed before the winner summary.
    assert_eq!(eliminations, 0);
}
