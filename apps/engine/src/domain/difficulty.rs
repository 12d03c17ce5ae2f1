//! Difficulty scaling: a pure function of `(mode, round)`.
//!
//! Every mode is described by the same four constants, so both shipped
//! formulations fall out of one computation: the minimum word length grows by
//! one every `length_step_rounds`, and the turn deadline shrinks by
//! `decay_units_per_round` down to a shared floor. Deadlines are expressed in
//! abstract time units (see `EngineConfig::time_unit`).

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::DomainError;

/// Turn deadlines never drop below this many time units.
pub const DEADLINE_FLOOR_UNITS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Easy,
    Medium,
    Hard,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Medium
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            Mode::Easy => "easy",
            Mode::Medium => "medium",
            Mode::Hard => "hard",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Mode {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Mode::Easy),
            "medium" => Ok(Mode::Medium),
            "hard" => Ok(Mode::Hard),
            other => Err(DomainError::validation(format!(
                "unknown mode '{other}', expected easy, medium or hard"
            ))),
        }
    }
}

/// The four per-mode constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeParams {
    /// Minimum word length at round 0.
    pub base_length: usize,
    /// The minimum length grows by one every this many rounds.
    pub length_step_rounds: u32,
    /// Turn deadline at round 0, in time units.
    pub base_deadline_units: f64,
    /// Deadline shrink per round, in time units.
    pub decay_units_per_round: f64,
}

pub fn mode_params(mode: Mode) -> ModeParams {
    match mode {
        Mode::Easy => ModeParams {
            base_length: 3,
            length_step_rounds: 2,
            base_deadline_units: 40.0,
            decay_units_per_round: 0.5,
        },
        Mode::Medium => ModeParams {
            base_length: 4,
            length_step_rounds: 1,
            base_deadline_units: 30.0,
            decay_units_per_round: 1.0,
        },
        Mode::Hard => ModeParams {
            base_length: 5,
            length_step_rounds: 1,
            base_deadline_units: 25.0,
            decay_units_per_round: 2.0,
        },
    }
}

/// Parameters governing a single turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnParams {
    pub min_word_length: usize,
    pub turn_deadline_units: f64,
}

/// Difficulty for a given round. Round numbers are 0-based.
pub fn params_for(mode: Mode, round: u32) -> TurnParams {
    let params = mode_params(mode);
    let min_word_length = params.base_length + (round / params.length_step_rounds) as usize;
    let decayed = params.base_deadline_units - params.decay_units_per_round * f64::from(round);
    TurnParams {
        min_word_length,
        turn_deadline_units: decayed.max(DEADLINE_FLOOR_UNITS),
    }
}
