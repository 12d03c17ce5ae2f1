//! Builder for a fully wired engine with in-memory collaborators and
//! millisecond-scale timing.

use std::sync::Arc;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::services::GameFlowService;
use crate::state::AppState;
use crate::store::MemoryStore;
use crate::test_support::doubles::{ChannelSink, NoteRx, StaticDictionary};

/// One time unit in tests. Medium mode's 30-unit deadline becomes 150ms.
pub const TEST_TIME_UNIT: Duration = Duration::from_millis(5);

pub struct TestStateBuilder {
    config: EngineConfig,
    dictionary: StaticDictionary,
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestStateBuilder {
    pub fn new() -> Self {
        let config = EngineConfig {
            time_unit: TEST_TIME_UNIT,
            ..EngineConfig::default()
        };
        Self {
            config,
            dictionary: StaticDictionary::new(&[]),
        }
    }

    /// Words the dictionary will recognize.
    pub fn known_words(mut self, words: &[&str]) -> Self {
        self.dictionary = StaticDictionary::new(words);
        self
    }

    /// Make every dictionary lookup fail.
    pub fn failing_dictionary(mut self) -> Self {
        self.dictionary = StaticDictionary::failing();
        self
    }

    /// Delay dictionary answers, to provoke lookup/timeout races.
    pub fn dictionary_delay(mut self, delay: Duration) -> Self {
        self.dictionary = self.dictionary.with_delay(delay);
        self
    }

    /// Adjust timing or capacity knobs before building.
    pub fn configure(mut self, f: impl FnOnce(&mut EngineConfig)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn build(self) -> (GameFlowService, NoteRx, Arc<MemoryStore>) {
        let (sink, rx) = ChannelSink::new();
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(
            self.config,
            Arc::new(self.dictionary),
            Arc::new(sink),
            store.clone(),
        );
        (GameFlowService::new(state), rx, store)
    }
}
