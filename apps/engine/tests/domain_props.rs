//! Property tests for the pure domain: difficulty scaling, turn rotation and
//! the lexical word pipeline.

include!("common/proptest_prelude.rs");

use std::collections::HashSet;

use proptest::prelude::*;
use time::OffsetDateTime;
use wordchain_engine::domain::difficulty::{params_for, DEADLINE_FLOOR_UNITS};
use wordchain_engine::domain::state::Session;
use wordchain_engine::domain::words::check_word;
use wordchain_engine::{Mode, RejectReason};

fn any_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Easy), Just(Mode::Medium), Just(Mode::Hard)]
}

proptest! {
    #![proptest_config(proptest_prelude_config())]

    /// Property: the turn deadline never drops below the floor and never
    /// increases from one round to the next.
    #[test]
    fn prop_deadline_is_floored_and_nonincreasing(
        mode in any_mode(),
        round in 0u32..10_000,
    ) {
        let now = params_for(mode, round).turn_deadline_units;
        let next = params_for(mode, round + 1).turn_deadline_units;
        prop_assert!(now >= DEADLINE_FLOOR_UNITS);
        prop_assert!(next <= now, "deadline grew between rounds {round} and {}", round + 1);
    }

    /// Property: the minimum word length never shrinks as rounds pass.
    #[test]
    fn prop_min_length_is_nondecreasing(
        mode in any_mode(),
        round in 0u32..10_000,
    ) {
        let now = params_for(mode, round).min_word_length;
        let next = params_for(mode, round + 1).min_word_length;
        prop_assert!(next >= now);
    }

    /// Property: at any round, a harder mode is at least as strict as an
    /// easier one on both axes.
    #[test]
    fn prop_harder_modes_are_stricter(round in 0u32..10_000) {
        let easy = params_for(Mode::Easy, round);
        let medium = params_for(Mode::Medium, round);
        let hard = params_for(Mode::Hard, round);
        prop_assert!(medium.min_word_length >= easy.min_word_length);
        prop_assert!(hard.min_word_length >= medium.min_word_length);
        prop_assert!(medium.turn_deadline_units <= easy.turn_deadline_units);
        prop_assert!(hard.turn_deadline_units <= medium.turn_deadline_units);
    }

    /// Property: advancing the turn pointer through a full rotation reports
    /// exactly one round boundary, and the pointer stays in bounds throughout.
    #[test]
    fn prop_one_round_boundary_per_rotation(
        player_count in 1usize..=20,
        rotations in 1usize..5,
    ) {
        let mut session = Session::new_lobby(
            "conv",
            "p0",
            Mode::Medium,
            params_for(Mode::Medium, 0),
            OffsetDateTime::UNIX_EPOCH,
        );
        for i in 1..player_count {
            session.players.push(format!("p{i}"));
        }

        let mut boundaries = 0usize;
        for _ in 0..player_count * rotations {
            if session.advance_turn() {
                boundaries += 1;
            }
            prop_assert!(session.turn_index < session.players.len());
        }
        prop_assert_eq!(boundaries, rotations);
        prop_assert_eq!(session.turn_index, 0);
    }

    /// Property: any word that passed the pipeline is rejected as a duplicate
    /// when checked again with itself in the used set.
    #[test]
    fn prop_accepted_words_cannot_repeat(word in "[a-z]{3,12}") {
        let min = 3;
        let first = word.chars().next();
        if check_word(&word, &HashSet::new(), min, first).is_ok() {
            let mut used = HashSet::new();
            used.insert(word.clone());
            prop_assert_eq!(
                check_word(&word, &used, min, first),
                Err(RejectReason::AlreadyUsed)
            );
        }
    }

    /// Property: a one- or two-character unit repeated three or more times is
    /// always turned down as degenerate.
    #[test]
    fn prop_repeated_units_are_degenerate(
        unit in "[a-z]{1,2}",
        repeats in 3usize..8,
    ) {
        let word = unit.repeat(repeats);
        prop_assert_eq!(
            check_word(&word, &HashSet::new(), 1, None),
            Err(RejectReason::Degenerate)
        );
    }
}
