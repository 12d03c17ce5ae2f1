//! User-facing message formatting.
//!
//! Every text the engine emits is built here so the game reads consistently
//! and tests can match on stable phrases. Player ids are chat addresses like
//! `4915..@s.whatsapp.net`; the visible handle is the part before the `@`.

use rand::Rng;

use crate::domain::difficulty::Mode;
use crate::domain::state::{PlayerId, SessionState};
use crate::domain::words::RejectReason;
use crate::notify::Notification;
use crate::services::game_flow::StatusReport;

const PRAISES: &[&str] = &[
    "🔥 Nicely done!",
    "✅ Word accepted!",
    "🎉 Great pick!",
    "💯 On point!",
    "👏 Keep it up!",
];

fn handle(player: &str) -> &str {
    player.split('@').next().unwrap_or(player)
}

fn roster(players: &[PlayerId]) -> String {
    players
        .iter()
        .map(|p| format!("@{}", handle(p)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn lobby_open(starter: &PlayerId, mode: Mode, wait_units: f64, max_players: usize) -> Notification {
    Notification::mention(
        format!(
            "🎮 Word Chain Game started! Host: @{} — mode {mode}.\n\
             ⏳ Waiting for players to join (max {max_players}). \
             The game begins in {wait_units:.0} seconds.\n\
             Send join to enter the lobby, leave to step out.",
            handle(starter)
        ),
        starter.clone(),
    )
}

pub fn lobby_reminder(player_count: usize) -> Notification {
    Notification::broadcast(format!(
        "⏳ Still recruiting! Send join to enter. Players so far: {player_count}"
    ))
}

pub fn player_joined(player: &PlayerId, player_count: usize) -> Notification {
    Notification::mention(
        format!("✅ @{} joined the game! Players: {player_count}", handle(player)),
        player.clone(),
    )
}

pub fn player_left(player: &PlayerId, player_count: usize) -> Notification {
    Notification::broadcast(format!(
        "👋 @{} left the lobby. Players remaining: {player_count}",
        handle(player)
    ))
}

pub fn cancelled_roster_empty() -> Notification {
    Notification::broadcast("⚠️ Everyone left. Game cancelled.")
}

pub fn cancelled_not_enough_players() -> Notification {
    Notification::broadcast("⚠️ Not enough players joined. Game cancelled.")
}

pub fn game_starting(players: &[PlayerId], chain_letter: char) -> Notification {
    Notification::mention_all(
        format!(
            "🚦 The game is starting with {} players!\n{}\nFirst word must start with '{}'.",
            players.len(),
            roster(players),
            chain_letter.to_ascii_uppercase()
        ),
        players,
    )
}

pub fn turn_prompt(
    player: &PlayerId,
    round: u32,
    chain_letter: Option<char>,
    min_word_length: usize,
    deadline_units: f64,
) -> Notification {
    let letter = chain_letter.map(|c| c.to_ascii_uppercase()).unwrap_or('?');
    Notification::mention(
        format!(
            "🎯 Round {} — your turn, @{}!\n\
             🔤 Word must start with '{letter}'. 📏 Minimum length: {min_word_length}. \
             ⏳ Time: {deadline_units:.0}s.",
            round + 1,
            handle(player)
        ),
        player.clone(),
    )
}

pub fn turn_warning(player: &PlayerId, remaining_units: f64) -> Notification {
    Notification::mention(
        format!(
            "⏰ {remaining_units:.0} seconds left, @{}! Hurry up!",
            handle(player)
        ),
        player.clone(),
    )
}

pub fn word_rejected(player: &PlayerId, reason: RejectReason) -> Notification {
    let text = match reason {
        RejectReason::NotAlphabetic => "❌ Words are letters only — no spaces, digits or symbols.".to_string(),
        RejectReason::Degenerate => "❌ That's just repeated letters, try a real word!".to_string(),
        RejectReason::AlreadyUsed => "❌ Word already used, try another!".to_string(),
        RejectReason::TooShort { min } => {
            format!("❌ Word must be at least {min} letters long.")
        }
        RejectReason::WrongLetter { expected } => {
            format!("❌ Word must start with '{}'!", expected.to_ascii_uppercase())
        }
        RejectReason::NotAWord => "❌ That's not a valid English word!".to_string(),
        RejectReason::Unverifiable => {
            "❌ Couldn't verify that word right now — it doesn't count. Try again!".to_string()
        }
    };
    Notification::mention(text, player.clone())
}

pub fn word_accepted(player: &PlayerId, word: &str) -> Notification {
    let praise = PRAISES[rand::rng().random_range(0..PRAISES.len())];
    Notification::mention(
        format!("{praise} @{} used '{word}'", handle(player)),
        player.clone(),
    )
}

pub fn player_eliminated(player: &PlayerId) -> Notification {
    Notification::mention(
        format!(
            "⏰ Time's up for @{}! You missed your turn and are eliminated.",
            handle(player)
        ),
        player.clone(),
    )
}

pub fn win_summary(winner: &PlayerId, rounds_played: u32, words: &[String]) -> Notification {
    let word_list = if words.is_empty() {
        "No words were played.".to_string()
    } else {
        words.join(", ")
    };
    Notification::mention(
        format!(
            "🏆 Game over!\n👑 Winner: @{}\n🕹️ Rounds played: {rounds_played}\n\
             📜 Total words: {}\n🗒️ Words used: {word_list}",
            handle(winner),
            words.len()
        ),
        winner.clone(),
    )
}

pub fn status_report(report: &StatusReport) -> Notification {
    match report.state {
        SessionState::Lobby => Notification::broadcast(format!(
            "📋 Word Chain — recruiting, {} mode.\n👥 Players ({}): {}\nSend join to enter!",
            report.mode,
            report.players.len(),
            roster(&report.players)
        )),
        SessionState::Active => {
            let on_turn = report
                .current_player
                .as_deref()
                .map(handle)
                .unwrap_or("?");
            let text = format!(
                "📋 Word Chain — {} mode, round {}.\n👥 Players: {}\n\
                 🎯 On turn: @{on_turn}\n📏 Minimum length: {} — 📜 Words played: {}",
                report.mode,
                report.round + 1,
                roster(&report.players),
                report.min_word_length,
                report.words_played
            );
            match &report.current_player {
                Some(player) => Notification::mention(text, player.clone()),
                None => Notification::broadcast(text),
            }
        }
        SessionState::Finished => Notification::broadcast("🏁 The game has finished."),
    }
}

pub fn game_reset() -> Notification {
    Notification::broadcast("🔄 Game reset by an admin.")
}

pub fn cancelled_after_restart() -> Notification {
    Notification::broadcast("⚠️ The game was interrupted by a restart and has been cancelled. Start a new one!")
}
