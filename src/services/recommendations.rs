use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Preferences, Recommendation, SeedTrack, TrackRecord},
    services::{
        candidates::fetch_candidates,
        diversity::select_pool,
        providers::{CoverArtProvider, SearchIndex},
        sampler::sample,
        scoring::rank,
        seed::resolve_seed,
    },
};

pub const SEED_NOT_FOUND: &str = "Track not found in MusicBrainz";
pub const NO_RECOMMENDATIONS: &str = "No suitable recommendations found";

/// Track recommendation pipeline
///
/// resolve seed → fetch candidates → score → diversity pool → sample → cover art.
/// Holds no per-request state, so one instance is shared across requests.
#[derive(Clone)]
pub struct Recommender {
    search: Arc<dyn SearchIndex>,
    cover_art: Arc<dyn CoverArtProvider>,
}

impl Recommender {
    pub fn new(search: Arc<dyn SearchIndex>, cover_art: Arc<dyn CoverArtProvider>) -> Self {
        Self { search, cover_art }
    }

    /// Resolves the seed track or fails with `NotFound`
    pub async fn resolve(&self, title: &str, prefs: &Preferences) -> AppResult<SeedTrack> {
        resolve_seed(self.search.as_ref(), title, prefs.artist_hint.as_deref())
            .await
            .ok_or_else(|| AppError::NotFound(SEED_NOT_FOUND.to_string()))
    }

    /// Up to five diverse recommendations for a seed title
    pub async fn recommend_top(
        &self,
        title: &str,
        prefs: &Preferences,
    ) -> AppResult<Vec<Recommendation>> {
        let seed = self.resolve(title, prefs).await?;

        let candidates = fetch_candidates(self.search.as_ref(), &seed, title, prefs).await;
        let ranked = rank(candidates, &seed, prefs);

        let pool = select_pool(&ranked, seed.title());
        if pool.is_empty() {
            return Err(AppError::NotFound(NO_RECOMMENDATIONS.to_string()));
        }
        pool.verify(seed.title())?;

        let picked: Vec<TrackRecord> = sample(pool.into_tracks(), prefs.randomize, prefs.seed.as_deref())
            .into_iter()
            .map(|candidate| candidate.record)
            .collect();

        tracing::info!(
            seed = %seed.title(),
            recommended = picked.len(),
            randomize = prefs.randomize,
            seeded = prefs.seed.is_some(),
            "Recommendations selected"
        );

        Ok(self.attach_cover_art(picked).await)
    }

    /// Looks up artwork concurrently, keeping the input order
    async fn attach_cover_art(&self, tracks: Vec<TrackRecord>) -> Vec<Recommendation> {
        let lookups: Vec<_> = tracks
            .iter()
            .map(|track| {
                let provider = Arc::clone(&self.cover_art);
                let release_group_id = track.release_group_id.clone();
                tokio::spawn(async move {
                    match release_group_id {
                        Some(id) => provider.front_cover(&id).await,
                        None => None,
                    }
                })
            })
            .collect();

        let mut recommendations = Vec::with_capacity(tracks.len());
        for (record, lookup) in tracks.into_iter().zip(lookups) {
            let cover_art = lookup.await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, track_id = %record.track_id, "Cover art task failed");
                None
            });
            recommendations.push(Recommendation { record, cover_art });
        }

        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::track::track;
    use crate::services::providers::{MockCoverArtProvider, MockSearchIndex, RecordingQuery};
    use mockall::predicate::function;

    fn seed_record() -> TrackRecord {
        TrackRecord {
            artist_id: Some("billie".to_string()),
            release_group_id: Some("rg-seed".to_string()),
            release_count: 10,
            ..track("seed", "Bad Guy", "Billie Eilish")
        }
    }

    fn by_billie(id: &str, title: &str, album: &str) -> TrackRecord {
        TrackRecord {
            artist_id: Some("billie".to_string()),
            release_group_id: Some(album.to_string()),
            ..track(id, title, "Billie Eilish")
        }
    }

    fn prefs(randomize: bool, seed: Option<&str>) -> Preferences {
        Preferences {
            artist_hint: Some("Billie Eilish".to_string()),
            randomize,
            seed: seed.map(str::to_string),
            ..Preferences::default()
        }
    }

    fn index_with_candidates(candidates: Vec<TrackRecord>) -> MockSearchIndex {
        let mut index = MockSearchIndex::new();
        index
            .expect_search_recordings()
            .with(function(|q: &RecordingQuery| q.query.starts_with("recording:")))
            .returning(|_| Ok(vec![seed_record()]));
        index
            .expect_search_recordings()
            .with(function(|q: &RecordingQuery| !q.query.starts_with("recording:")))
            .returning(move |_| Ok(candidates.clone()));
        index.expect_name().return_const("mock");
        index
    }

    fn art_by_album() -> MockCoverArtProvider {
        let mut art = MockCoverArtProvider::new();
        art.expect_front_cover()
            .returning(|id| Some(format!("https://art.example/{}.jpg", id)));
        art
    }

    fn recommender(index: MockSearchIndex, art: MockCoverArtProvider) -> Recommender {
        Recommender::new(Arc::new(index), Arc::new(art))
    }

    #[tokio::test]
    async fn test_same_artist_scenario() {
        let index = index_with_candidates(vec![
            by_billie("1", "Bury a Friend", "rg-a"),
            by_billie("2", "You Should See Me in a Crown", "rg-b"),
            by_billie("3", "When I Was Older", "rg-c"),
        ]);
        let recommender = recommender(index, art_by_album());

        let seed = recommender.resolve("Bad Guy", &prefs(false, None)).await.unwrap();
        assert_eq!(seed.artist_name(), "Billie Eilish");

        let picked = recommender.recommend_top("Bad Guy", &prefs(false, None)).await.unwrap();
        assert_eq!(picked.len(), 3);
        assert!(picked.iter().all(|r| r.record.normalized_title() != "bad guy"));
        assert_eq!(
            picked[0].cover_art.as_deref(),
            Some("https://art.example/rg-a.jpg")
        );
    }

    #[tokio::test]
    async fn test_unresolved_seed_skips_candidate_fetch() {
        let mut index = MockSearchIndex::new();
        index
            .expect_search_recordings()
            .times(1)
            .returning(|_| Ok(vec![]));
        let mut art = MockCoverArtProvider::new();
        art.expect_front_cover().never();

        let err = recommender(index, art)
            .recommend_top("asdfghjkl1234", &Preferences::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(msg) if msg == SEED_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_empty_pool_is_not_found() {
        let index = index_with_candidates(vec![by_billie("1", "bad guy", "rg-a")]);
        let err = recommender(index, MockCoverArtProvider::new())
            .recommend_top("Bad Guy", &prefs(false, None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(msg) if msg == NO_RECOMMENDATIONS));
    }

    #[tokio::test]
    async fn test_deterministic_requests_repeat() {
        let candidates: Vec<_> = (0..20)
            .map(|i| TrackRecord {
                artist_id: Some(format!("artist-{}", i % 7)),
                ..track(&i.to_string(), &format!("Song {}", i), &format!("Artist {}", i % 7))
            })
            .collect();
        let recommender = recommender(index_with_candidates(candidates), art_by_album());

        let ids = |recs: Vec<Recommendation>| -> Vec<String> {
            recs.into_iter().map(|r| r.record.track_id).collect()
        };
        let first = ids(recommender.recommend_top("Bad Guy", &prefs(false, None)).await.unwrap());
        let second = ids(recommender.recommend_top("Bad Guy", &prefs(false, None)).await.unwrap());

        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_seeded_randomization_repeats() {
        let candidates: Vec<_> = (0..20)
            .map(|i| TrackRecord {
                artist_id: Some(format!("artist-{}", i)),
                ..track(&i.to_string(), &format!("Song {}", i), &format!("Artist {}", i))
            })
            .collect();
        let recommender = recommender(index_with_candidates(candidates), art_by_album());

        let ids = |recs: Vec<Recommendation>| -> Vec<String> {
            recs.into_iter().map(|r| r.record.track_id).collect()
        };
        let first = ids(recommender.recommend_top("Bad Guy", &prefs(true, Some("42"))).await.unwrap());
        let second = ids(recommender.recommend_top("Bad Guy", &prefs(true, Some("42"))).await.unwrap());

        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_cover_art_order_survives_slow_lookups() {
        let candidates: Vec<_> = (0..5)
            .map(|i| TrackRecord {
                artist_id: Some(format!("artist-{}", i)),
                release_group_id: Some(format!("rg-{}", i)),
                ..track(&i.to_string(), &format!("Song {}", i), &format!("Artist {}", i))
            })
            .collect();

        let mut art = MockCoverArtProvider::new();
        art.expect_front_cover().returning(|id| match id {
            "rg-1" => None,
            _ => Some(id.to_string()),
        });

        let picked = recommender(index_with_candidates(candidates), art)
            .recommend_top("Bad Guy", &prefs(false, None))
            .await
            .unwrap();

        let art: Vec<Option<&str>> = picked.iter().map(|r| r.cover_art.as_deref()).collect();
        assert_eq!(
            art,
            vec![Some("rg-0"), None, Some("rg-2"), Some("rg-3"), Some("rg-4")]
        );
    }
}
