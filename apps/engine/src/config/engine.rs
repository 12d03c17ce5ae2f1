use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

/// Engine tuning knobs.
///
/// Gameplay durations are expressed in abstract *time units* (the difficulty
/// policy works in the same units); `time_unit` maps one unit onto wall-clock
/// time. Production keeps the default of one second per unit; tests shrink it
/// to a few milliseconds so timer-driven scenarios run quickly.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Wall-clock length of one time unit.
    pub time_unit: Duration,
    /// Minimum roster size required when the lobby deadline fires.
    pub min_players: usize,
    /// Roster capacity cap.
    pub max_players: usize,
    /// Recruitment window before the lobby resolves, in time units.
    pub lobby_wait_units: f64,
    /// Interval between lobby reminder notifications, in time units.
    pub lobby_reminder_units: f64,
    /// Pre-deadline warning offsets, in time units, largest first.
    /// A warning is armed only when the turn deadline exceeds its offset.
    pub warning_offset_units: Vec<f64>,
    /// Base URL of the dictionary lookup service.
    pub dictionary_url: String,
    /// Per-request timeout for dictionary lookups (wall clock, not units).
    pub dictionary_timeout: Duration,
    /// Capacity of the dictionary verdict cache.
    pub dictionary_cache_capacity: u64,
    /// Location of the JSON snapshot document.
    pub snapshot_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_unit: Duration::from_secs(1),
            min_players: 2,
            max_players: 20,
            lobby_wait_units: 50.0,
            lobby_reminder_units: 15.0,
            warning_offset_units: vec![10.0, 5.0, 3.0],
            dictionary_url: "https://api.dictionaryapi.dev/api/v2/entries/en".to_string(),
            dictionary_timeout: Duration::from_secs(6),
            dictionary_cache_capacity: 16_384,
            snapshot_path: PathBuf::from("wordchain-sessions.json"),
        }
    }
}

impl EngineConfig {
    /// Build a config from `WORDCHAIN_*` environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        Ok(Self {
            time_unit: Duration::from_millis(env_u64(
                "WORDCHAIN_TIME_UNIT_MS",
                defaults.time_unit.as_millis() as u64,
            )?),
            min_players: env_usize("WORDCHAIN_MIN_PLAYERS", defaults.min_players)?,
            max_players: env_usize("WORDCHAIN_MAX_PLAYERS", defaults.max_players)?,
            lobby_wait_units: env_f64("WORDCHAIN_LOBBY_WAIT_UNITS", defaults.lobby_wait_units)?,
            lobby_reminder_units: env_f64(
                "WORDCHAIN_LOBBY_REMINDER_UNITS",
                defaults.lobby_reminder_units,
            )?,
            warning_offset_units: env_f64_list(
                "WORDCHAIN_WARNING_OFFSET_UNITS",
                defaults.warning_offset_units,
            )?,
            dictionary_url: env::var("WORDCHAIN_DICTIONARY_URL")
                .unwrap_or(defaults.dictionary_url),
            dictionary_timeout: Duration::from_millis(env_u64(
                "WORDCHAIN_DICTIONARY_TIMEOUT_MS",
                defaults.dictionary_timeout.as_millis() as u64,
            )?),
            dictionary_cache_capacity: env_u64(
                "WORDCHAIN_DICTIONARY_CACHE_CAPACITY",
                defaults.dictionary_cache_capacity,
            )?,
            snapshot_path: env::var("WORDCHAIN_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
        })
    }

    /// Convert a duration in time units into wall-clock time.
    pub fn scaled(&self, units: f64) -> Duration {
        self.time_unit.mul_f64(units.max(0.0))
    }
}

fn env_u64(name: &str, default: u64) -> Result<u64, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{name} must be an integer, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}

fn env_usize(name: &str, default: usize) -> Result<usize, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{name} must be an integer, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}

fn env_f64(name: &str, default: f64) -> Result<f64, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{name} must be a number, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}

fn env_f64_list(name: &str, default: Vec<f64>) -> Result<Vec<f64>, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .split(',')
            .map(|part| {
                part.trim().parse().map_err(|_| {
                    AppError::config(format!(
                        "{name} must be comma-separated numbers, got '{raw}'"
                    ))
                })
            })
            .collect(),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_tuning() {
        let config = EngineConfig::default();
        assert_eq!(config.min_players, 2);
        assert_eq!(config.max_players, 20);
        assert_eq!(config.lobby_wait_units, 50.0);
        assert_eq!(config.warning_offset_units, vec![10.0, 5.0, 3.0]);
    }

    #[test]
    fn warning_offsets_parse_from_a_comma_separated_list() {
        std::env::set_var("WORDCHAIN_TEST_OFFSETS_OK", "12, 6,2.5");
        assert_eq!(
            env_f64_list("WORDCHAIN_TEST_OFFSETS_OK", Vec::new()).unwrap(),
            vec![12.0, 6.0, 2.5]
        );

        std::env::set_var("WORDCHAIN_TEST_OFFSETS_BAD", "12,x");
        assert!(env_f64_list("WORDCHAIN_TEST_OFFSETS_BAD", Vec::new()).is_err());

        assert_eq!(
            env_f64_list("WORDCHAIN_TEST_OFFSETS_UNSET", vec![3.0]).unwrap(),
            vec![3.0]
        );
    }

    #[test]
    fn scaled_maps_units_through_the_time_unit() {
        let config = EngineConfig {
            time_unit: Duration::from_millis(10),
            ..EngineConfig::default()
        };
        assert_eq!(config.scaled(3.0), Duration::from_millis(30));
        assert_eq!(config.scaled(0.5), Duration::from_millis(5));
        assert_eq!(config.scaled(-1.0), Duration::ZERO);
    }
}
