use axum::extract::FromRef;

use crate::enrichment::EnrichmentPipeline;
use crate::song::SongStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedSongStore = Arc<dyn SongStore>;
pub type GuardedEnrichmentPipeline = Arc<EnrichmentPipeline>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub song_store: GuardedSongStore,
    pub pipeline: GuardedEnrichmentPipeline,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        song_store: GuardedSongStore,
        pipeline: GuardedEnrichmentPipeline,
    ) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            song_store,
            pipeline,
        }
    }
}

impl FromRef<ServerState> for GuardedSongStore {
    fn from_ref(input: &ServerState) -> Self {
        input.song_store.clone()
    }
}

impl FromRef<ServerState> for GuardedEnrichmentPipeline {
    fn from_ref(input: &ServerState) -> Self {
        input.pipeline.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
