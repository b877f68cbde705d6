use crate::{
    models::{SeedTrack, TrackRecord},
    services::{
        providers::{RecordingQuery, SearchIndex},
        query::build_title_artist_query,
    },
};

/// How many index results are considered when resolving a seed
pub const SEED_SEARCH_LIMIT: u32 = 10;

/// Resolves free-text input to one canonical recording
///
/// Returns `None` when nothing matches or the index cannot be reached.
pub async fn resolve_seed(
    search: &dyn SearchIndex,
    title: &str,
    artist_hint: Option<&str>,
) -> Option<SeedTrack> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    let artist_hint = artist_hint.map(str::trim).filter(|a| !a.is_empty());

    let query = RecordingQuery::new(build_title_artist_query(title, artist_hint), SEED_SEARCH_LIMIT);
    let candidates = match search.search_recordings(&query).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::warn!(
                error = %e,
                provider = search.name(),
                title = %title,
                "Seed search failed, treating as not found"
            );
            return None;
        }
    };

    let count = candidates.len();
    let best = pick_seed(candidates, artist_hint)?;

    tracing::info!(
        title = %best.title,
        artist = %best.display_artist(),
        track_id = %best.track_id,
        candidates = count,
        "Seed track resolved"
    );

    Some(SeedTrack::new(best))
}

/// Prefers exact artist matches, then the most-released recording
///
/// Ties keep the index's own order: the first of the most-released wins.
fn pick_seed(candidates: Vec<TrackRecord>, artist_hint: Option<&str>) -> Option<TrackRecord> {
    let candidates = match artist_hint {
        Some(hint) => {
            let hint = hint.to_lowercase();
            let (matching, others): (Vec<_>, Vec<_>) = candidates
                .into_iter()
                .partition(|c| c.artist_name.to_lowercase() == hint);
            if matching.is_empty() {
                others
            } else {
                matching
            }
        }
        None => candidates,
    };

    // Iterator::max_by_key would keep the last of equal maxima
    candidates.into_iter().reduce(|best, candidate| {
        if candidate.release_count > best.release_count {
            candidate
        } else {
            best
        }
    })
}
