/// External music metadata providers
///
/// The recommendation pipeline talks to the search index and the cover-art
/// service only through these traits, so tests and alternative indexes can be
/// swapped in without touching the scoring logic.
use crate::{db::CacheKey, error::AppResult, models::TrackRecord};

pub mod cover_art;
pub mod musicbrainz;

pub use cover_art::CoverArtArchiveClient;
pub use musicbrainz::MusicBrainzClient;

/// A structured recording search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingQuery {
    /// Lucene query expression
    pub query: String,
    pub limit: u32,
    pub offset: u32,
}

impl RecordingQuery {
    pub fn new(query: impl Into<String>, limit: u32) -> Self {
        Self {
            query: query.into(),
            limit,
            offset: 0,
        }
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::Recordings {
            query: self.query.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Searchable index of recordings
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchIndex: Send + Sync {
    /// Runs a recording search
    ///
    /// A well-formed empty response is `Ok(vec![])`. Failures that persist
    /// after the provider's retry budget are returned as errors; callers
    /// decide whether to degrade.
    async fn search_recordings(&self, query: &RecordingQuery) -> AppResult<Vec<TrackRecord>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Best-effort album artwork lookup
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CoverArtProvider: Send + Sync {
    /// URL of the first image for a release group; `None` on absence or any failure
    async fn front_cover(&self, release_group_id: &str) -> Option<String>;
}
