use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Display name used when the index returns a recording without an artist credit
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Lowercased, trimmed title used for duplicate detection
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// A recording as returned by the search index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// MusicBrainz recording ID
    pub track_id: String,
    pub title: String,
    /// Name from the first artist credit; empty when the index has none
    pub artist_name: String,
    pub artist_id: Option<String>,
    /// Album-like grouping key (MusicBrainz release group)
    pub release_group_id: Option<String>,
    /// Lowercased tag names
    pub tags: BTreeSet<String>,
    /// Number of releases the recording appears on (popularity proxy)
    pub release_count: usize,
}

impl TrackRecord {
    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }

    pub fn display_artist(&self) -> &str {
        if self.artist_name.is_empty() {
            UNKNOWN_ARTIST
        } else {
            &self.artist_name
        }
    }

    /// Key used to cap recommendations per artist
    ///
    /// Prefers the stable artist ID; same-named artists without an ID share a key.
    pub fn artist_key(&self) -> &str {
        self.artist_id.as_deref().unwrap_or_else(|| self.display_artist())
    }
}

/// The resolved track a recommendation set is built around
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTrack {
    record: TrackRecord,
    normalized_title: String,
}

impl SeedTrack {
    pub fn new(record: TrackRecord) -> Self {
        let normalized_title = record.normalized_title();
        Self {
            record,
            normalized_title,
        }
    }

    pub fn record(&self) -> &TrackRecord {
        &self.record
    }

    pub fn normalized_title(&self) -> &str {
        &self.normalized_title
    }

    pub fn title(&self) -> &str {
        &self.record.title
    }

    pub fn artist_name(&self) -> &str {
        &self.record.artist_name
    }

    pub fn artist_id(&self) -> Option<&str> {
        self.record.artist_id.as_deref()
    }

    pub fn release_group_id(&self) -> Option<&str> {
        self.record.release_group_id.as_deref()
    }
}

/// A candidate with its similarity score against the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub record: TrackRecord,
    pub score: i32,
}

/// A selected track, optionally enriched with cover art
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub record: TrackRecord,
    pub cover_art: Option<String>,
}

#[cfg(test)]
pub(crate) fn track(id: &str, title: &str, artist: &str) -> TrackRecord {
    TrackRecord {
        track_id: id.to_string(),
        title: title.to_string(),
        artist_name: artist.to_string(),
        artist_id: None,
        release_group_id: None,
        tags: BTreeSet::new(),
        release_count: 0,
    }
}
