use std::sync::Arc;

use crate::{
    config::Config,
    db::Cache,
    error::AppResult,
    services::{
        providers::{CoverArtArchiveClient, CoverArtProvider, MusicBrainzClient, SearchIndex},
        Recommender,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            recommender: Arc::new(recommender),
        }
    }

    /// Wires the MusicBrainz and Cover Art Archive clients around one shared cache
    pub fn from_config(config: &Config, cache: Cache) -> AppResult<Self> {
        let search: Arc<dyn SearchIndex> = Arc::new(MusicBrainzClient::new(config, cache.clone())?);
        let cover_art: Arc<dyn CoverArtProvider> =
            Arc::new(CoverArtArchiveClient::new(config, cache)?);

        Ok(Self::new(Recommender::new(search, cover_art)))
    }
}
