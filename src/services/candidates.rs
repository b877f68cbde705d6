use rand::Rng;

use crate::{
    models::{Preferences, SeedTrack, TrackRecord},
    services::{
        providers::{RecordingQuery, SearchIndex},
        query::{build_artist_query, build_free_text_query, ArtistRef},
    },
};

/// Page size for candidate searches
pub const CANDIDATE_LIMIT: u32 = 50;

/// Below this many artist results the randomized fallback may run
pub const FALLBACK_THRESHOLD: usize = 10;

/// Fallback pagination offsets are drawn from `0..FALLBACK_MAX_OFFSET`
pub const FALLBACK_MAX_OFFSET: u32 = 200;

/// Gathers the raw candidate pool for a seed
///
/// Queries the seed's artist (by ID when known) excluding the seed title. When
/// that yields fewer than [`FALLBACK_THRESHOLD`] results and randomization is
/// requested, one free-text search on `input_title` at a random offset is
/// appended. Search failures contribute no candidates.
pub async fn fetch_candidates(
    search: &dyn SearchIndex,
    seed: &SeedTrack,
    input_title: &str,
    prefs: &Preferences,
) -> Vec<TrackRecord> {
    let artist = match seed.artist_id() {
        Some(id) => Some(ArtistRef::Id(id)),
        None if !seed.artist_name().is_empty() => Some(ArtistRef::Name(seed.artist_name())),
        None => None,
    };

    let mut candidates = match artist {
        Some(artist) => {
            let query = RecordingQuery::new(
                build_artist_query(artist, Some(seed.title())),
                CANDIDATE_LIMIT,
            );
            search_or_empty(search, &query).await
        }
        None => {
            tracing::debug!(seed = %seed.title(), "Seed has no artist, skipping artist search");
            Vec::new()
        }
    };

    tracing::info!(
        count = candidates.len(),
        by_artist_id = seed.artist_id().is_some(),
        "Artist candidates fetched"
    );

    if candidates.len() < FALLBACK_THRESHOLD && prefs.randomize {
        let offset = random_offset();
        let query = RecordingQuery::new(build_free_text_query(input_title), CANDIDATE_LIMIT)
            .with_offset(offset);
        let extra = search_or_empty(search, &query).await;

        tracing::info!(
            offset,
            added = extra.len(),
            "Randomized pagination fallback applied"
        );
        candidates.extend(extra);
    }

    candidates
}

fn random_offset() -> u32 {
    rand::rng().random_range(0..FALLBACK_MAX_OFFSET)
}

async fn search_or_empty(search: &dyn SearchIndex, query: &RecordingQuery) -> Vec<TrackRecord> {
    match search.search_recordings(query).await {
        Ok(tracks) => tracks,
        Err(e) => {
            tracing::warn!(
                error = %e,
                provider = search.name(),
                query = %query.query,
                "Candidate search failed, continuing without results"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::track::track;
    use crate::services::providers::MockSearchIndex;
    use mockall::{predicate::function, Sequence};

    fn seed(artist_id: Option<&str>) -> SeedTrack {
        SeedTrack::new(TrackRecord {
            artist_id: artist_id.map(str::to_string),
            ..track("seed", "Bad Guy", "Billie Eilish")
        })
    }

    fn tracks(n: usize) -> Vec<TrackRecord> {
        (0..n)
            .map(|i| track(&format!("t{}", i), &format!("Track {}", i), "Billie Eilish"))
            .collect()
    }

    fn randomized() -> Preferences {
        Preferences {
            randomize: true,
            ..Preferences::default()
        }
    }

    #[tokio::test]
    async fn test_queries_by_artist_id_when_known() {
        let mut index = MockSearchIndex::new();
        index
            .expect_search_recordings()
            .with(function(|q: &RecordingQuery| {
                q.query == r#"arid:"artist-123" AND NOT recording:"Bad Guy""#
                    && q.limit == CANDIDATE_LIMIT
                    && q.offset == 0
            }))
            .times(1)
            .returning(|_| Ok(tracks(12)));

        let result = fetch_candidates(&index, &seed(Some("artist-123")), "bad guy", &randomized()).await;
        assert_eq!(result.len(), 12);
    }

    #[tokio::test]
    async fn test_queries_by_artist_name_without_id() {
        let mut index = MockSearchIndex::new();
        index
            .expect_search_recordings()
            .with(function(|q: &RecordingQuery| {
                q.query == r#"artist:"Billie Eilish" AND NOT recording:"Bad Guy""#
            }))
            .times(1)
            .returning(|_| Ok(tracks(3)));

        let result = fetch_candidates(&index, &seed(None), "bad guy", &Preferences::default()).await;
        assert_eq!(result.len(), 3);
    }

    #[tokio::test]
    async fn test_fallback_appends_random_page() {
        let mut seq = Sequence::new();
        let mut index = MockSearchIndex::new();
        index
            .expect_search_recordings()
            .with(function(|q: &RecordingQuery| q.query.starts_with("arid:")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(tracks(4)));
        index
            .expect_search_recordings()
            .with(function(|q: &RecordingQuery| {
                q.query == "bad guy" && q.limit == CANDIDATE_LIMIT && q.offset < FALLBACK_MAX_OFFSET
            }))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![track("x", "Ocean Eyes", "Other")]));

        let result = fetch_candidates(&index, &seed(Some("artist-123")), "bad guy", &randomized()).await;
        assert_eq!(result.len(), 5);
        assert_eq!(result[4].track_id, "x");
    }

    #[tokio::test]
    async fn test_no_fallback_without_randomize() {
        let mut index = MockSearchIndex::new();
        index
            .expect_search_recordings()
            .times(1)
            .returning(|_| Ok(tracks(2)));

        let result = fetch_candidates(&index, &seed(Some("artist-123")), "bad guy", &Preferences::default()).await;
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_no_fallback_with_enough_results() {
        let mut index = MockSearchIndex::new();
        index
            .expect_search_recordings()
            .times(1)
            .returning(|_| Ok(tracks(FALLBACK_THRESHOLD)));

        let result = fetch_candidates(&index, &seed(Some("artist-123")), "bad guy", &randomized()).await;
        assert_eq!(result.len(), FALLBACK_THRESHOLD);
    }

    #[tokio::test]
    async fn test_failed_artist_search_still_allows_fallback() {
        let mut seq = Sequence::new();
        let mut index = MockSearchIndex::new();
        index
            .expect_search_recordings()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::Transient("503".to_string())));
        index
            .expect_search_recordings()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(tracks(1)));
        index.expect_name().return_const("mock");

        let result = fetch_candidates(&index, &seed(Some("artist-123")), "bad guy", &randomized()).await;
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_random_offset_in_range() {
        for _ in 0..1000 {
            assert!(random_offset() < FALLBACK_MAX_OFFSET);
        }
    }
}
