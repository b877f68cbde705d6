use std::collections::{HashMap, HashSet};

use crate::{
    error::{AppError, AppResult},
    models::{normalize_title, ScoredCandidate},
};

/// Upper bound on accepted candidates
pub const MAX_POOL_SIZE: usize = 30;

/// Below this the per-artist and per-album caps are relaxed
pub const MIN_POOL_SIZE: usize = 5;

pub const MAX_PER_ARTIST: usize = 2;
pub const MAX_PER_ALBUM: usize = 2;

/// Ranked candidates that passed diversity selection, in acceptance order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePool {
    tracks: Vec<ScoredCandidate>,
    relaxed: bool,
}

impl CandidatePool {
    pub fn tracks(&self) -> &[ScoredCandidate] {
        &self.tracks
    }

    pub fn into_tracks(self) -> Vec<ScoredCandidate> {
        self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Whether the caps were lifted to reach [`MIN_POOL_SIZE`]
    pub fn is_relaxed(&self) -> bool {
        self.relaxed
    }

    /// Checks the title invariants every pool must satisfy
    ///
    /// A violation means the selector itself is broken, so it surfaces as an
    /// internal error rather than being repaired here.
    pub fn verify(&self, seed_title: &str) -> AppResult<()> {
        let seed_title = normalize_title(seed_title);
        let mut seen = HashSet::new();

        for candidate in &self.tracks {
            let title = candidate.record.normalized_title();
            if title.is_empty() || title == seed_title {
                return Err(AppError::Internal(format!(
                    "Candidate pool contains an invalid title: {:?}",
                    candidate.record.title
                )));
            }
            if !seen.insert(title) {
                return Err(AppError::Internal(format!(
                    "Candidate pool contains a duplicate title: {:?}",
                    candidate.record.title
                )));
            }
        }

        Ok(())
    }
}

/// Per-call acceptance bookkeeping
struct Selection {
    accepted: Vec<ScoredCandidate>,
    titles: HashSet<String>,
    per_artist: HashMap<String, usize>,
    per_album: HashMap<String, usize>,
}

impl Selection {
    fn new(seed_title: &str) -> Self {
        let mut titles = HashSet::new();
        titles.insert(normalize_title(seed_title));
        Self {
            accepted: Vec::new(),
            titles,
            per_artist: HashMap::new(),
            per_album: HashMap::new(),
        }
    }

    fn title_available(&self, title: &str) -> bool {
        !title.is_empty() && !self.titles.contains(title)
    }

    fn within_caps(&self, candidate: &ScoredCandidate) -> bool {
        let artist_count = self
            .per_artist
            .get(candidate.record.artist_key())
            .copied()
            .unwrap_or(0);
        let album_count = candidate
            .record
            .release_group_id
            .as_deref()
            .and_then(|album| self.per_album.get(album).copied())
            .unwrap_or(0);

        artist_count < MAX_PER_ARTIST && album_count < MAX_PER_ALBUM
    }

    fn accept(&mut self, candidate: &ScoredCandidate, title: String) {
        self.titles.insert(title);
        *self
            .per_artist
            .entry(candidate.record.artist_key().to_string())
            .or_default() += 1;
        if let Some(album) = &candidate.record.release_group_id {
            *self.per_album.entry(album.clone()).or_default() += 1;
        }
        self.accepted.push(candidate.clone());
    }
}

/// Builds a bounded, diverse pool from candidates in ranked order
///
/// Titles are deduplicated case-insensitively and never match the seed.
/// Artists and albums contribute at most two entries each, unless fewer than
/// [`MIN_POOL_SIZE`] survive, in which case a second scan fills the pool
/// ignoring those caps.
pub fn select_pool(ranked: &[ScoredCandidate], seed_title: &str) -> CandidatePool {
    let mut selection = Selection::new(seed_title);

    for candidate in ranked {
        if selection.accepted.len() >= MAX_POOL_SIZE {
            break;
        }
        let title = candidate.record.normalized_title();
        if selection.title_available(&title) && selection.within_caps(candidate) {
            selection.accept(candidate, title);
        }
    }

    let diverse = selection.accepted.len();
    let mut relaxed = false;

    if diverse < MIN_POOL_SIZE {
        for candidate in ranked {
            if selection.accepted.len() >= MIN_POOL_SIZE {
                break;
            }
            let title = candidate.record.normalized_title();
            if selection.title_available(&title) {
                selection.accept(candidate, title);
                relaxed = true;
            }
        }
    }

    tracing::info!(
        ranked = ranked.len(),
        diverse,
        pool = selection.accepted.len(),
        relaxed,
        "Candidate pool selected"
    );

    CandidatePool {
        tracks: selection.accepted,
        relaxed,
    }
}
