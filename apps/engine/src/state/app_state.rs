use std::sync::Arc;

use crate::config::EngineConfig;
use crate::dictionary::Dictionary;
use crate::notify::NotificationSink;
use crate::services::registry::SessionRegistry;
use crate::store::SnapshotStore;

/// Shared resources for the engine: config, the session registry and the
/// external collaborators (dictionary, notification sink, snapshot store).
pub struct AppState {
    pub config: EngineConfig,
    pub registry: SessionRegistry,
    pub dictionary: Arc<dyn Dictionary>,
    pub sink: Arc<dyn NotificationSink>,
    pub store: Arc<dyn SnapshotStore>,
}

impl AppState {
    pub fn new(
        config: EngineConfig,
        dictionary: Arc<dyn Dictionary>,
        sink: Arc<dyn NotificationSink>,
        store: Arc<dyn SnapshotStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            registry: SessionRegistry::new(),
            dictionary,
            sink,
            store,
        })
    }
}
