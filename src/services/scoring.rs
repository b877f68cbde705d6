//! Heuristic similarity scoring between a candidate and the seed.
//!
//! Scores are a pure function of (candidate, seed, preferences). Each signal
//! is evaluated in a fixed order so the breakdown reads the same every time.

use std::cmp::Reverse;

use crate::models::{Preferences, ScoredCandidate, SeedTrack, TrackRecord};

/// One contribution to a candidate's score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Artist name equals the seed's, ignoring case
    SameArtist,
    /// Shares the seed's release group
    SameAlbum,
    /// Tagged with the requested genre
    GenreTag,
    /// Tagged with a genre associated with the requested mood (first match only)
    MoodGenreTag(&'static str),
    /// Requested genre appears in the title
    GenreInTitle,
    /// Same title as the seed
    DuplicateTitle,
}

impl Signal {
    pub fn weight(self) -> i32 {
        match self {
            Signal::SameArtist => 5,
            Signal::SameAlbum => 3,
            Signal::GenreTag => 2,
            Signal::MoodGenreTag(_) => 2,
            Signal::GenreInTitle => 1,
            Signal::DuplicateTitle => -10,
        }
    }
}

/// Signals that apply to a candidate, in evaluation order
pub fn explain(candidate: &TrackRecord, seed: &SeedTrack, prefs: &Preferences) -> Vec<Signal> {
    let mut signals = Vec::new();
    let title = candidate.normalized_title();
    let artist = candidate.artist_name.to_lowercase();

    if !artist.is_empty() && artist == seed.artist_name().to_lowercase() {
        signals.push(Signal::SameArtist);
    }

    if let (Some(album), Some(seed_album)) =
        (candidate.release_group_id.as_deref(), seed.release_group_id())
    {
        if album == seed_album {
            signals.push(Signal::SameAlbum);
        }
    }

    let genre = prefs.genre.as_deref();
    if let Some(genre) = genre {
        if candidate.tags.contains(genre) {
            signals.push(Signal::GenreTag);
        }
    }

    if let Some(mood_genre) = prefs
        .mood_genres()
        .iter()
        .find(|g| candidate.tags.contains(**g))
    {
        signals.push(Signal::MoodGenreTag(*mood_genre));
    }

    if let Some(genre) = genre {
        if title.contains(genre) {
            signals.push(Signal::GenreInTitle);
        }
    }

    if title == seed.normalized_title() {
        signals.push(Signal::DuplicateTitle);
    }

    signals
}

pub fn score(candidate: &TrackRecord, seed: &SeedTrack, prefs: &Preferences) -> i32 {
    explain(candidate, seed, prefs)
        .into_iter()
        .map(Signal::weight)
        .sum()
}

/// Scores and sorts candidates by descending score
///
/// The sort is stable, so equal scores keep the index's order.
pub fn rank(
    candidates: Vec<TrackRecord>,
    seed: &SeedTrack,
    prefs: &Preferences,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|record| {
            let score = score(&record, seed, prefs);
            ScoredCandidate { record, score }
        })
        .collect();

    scored.sort_by_key(|c| Reverse(c.score));

    if let Some(top) = scored.first() {
        tracing::debug!(
            candidates = scored.len(),
            top_title = %top.record.title,
            top_score = top.score,
            signals = ?explain(&top.record, seed, prefs),
            "Candidates ranked"
        );
    }

    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::track::track;

    fn seed() -> SeedTrack {
        SeedTrack::new(TrackRecord {
            release_group_id: Some("rg1".to_string()),
            ..track("seed", "Bad Guy", "Billie Eilish")
        })
    }

    fn tagged(title: &str, artist: &str, tags: &[&str]) -> TrackRecord {
        TrackRecord {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..track(title, title, artist)
        }
    }

    fn prefs(genre: Option<&str>, mood: Option<&str>) -> Preferences {
        Preferences {
            genre: genre.map(str::to_string),
            mood: mood.map(str::to_string),
            ..Preferences::default()
        }
    }

    #[test]
    fn test_same_artist_is_case_insensitive() {
        let candidate = track("t1", "Bury a Friend", "BILLIE EILISH");
        assert_eq!(score(&candidate, &seed(), &Preferences::default()), 5);
    }

    #[test]
    fn test_missing_artist_never_matches() {
        let no_artist_seed = SeedTrack::new(track("seed", "Bad Guy", ""));
        let candidate = track("t1", "Other", "");
        assert_eq!(score(&candidate, &no_artist_seed, &Preferences::default()), 0);
    }

    #[test]
    fn test_same_album_requires_both_ids() {
        let mut candidate = track("t1", "Xanny", "Someone Else");
        assert_eq!(score(&candidate, &seed(), &Preferences::default()), 0);

        candidate.release_group_id = Some("rg1".to_string());
        assert_eq!(score(&candidate, &seed(), &Preferences::default()), 3);

        let seed_without_album = SeedTrack::new(track("seed", "Bad Guy", "Billie Eilish"));
        assert_eq!(score(&candidate, &seed_without_album, &Preferences::default()), 0);
    }

    #[test]
    fn test_genre_and_mood_bonuses_stack() {
        let candidate = tagged("Therefore I Am", "Someone Else", &["pop", "edm"]);
        let signals = explain(&candidate, &seed(), &prefs(Some("pop"), Some("energetic")));

        assert_eq!(signals, vec![Signal::GenreTag, Signal::MoodGenreTag("edm")]);
        assert_eq!(score(&candidate, &seed(), &prefs(Some("pop"), Some("energetic"))), 4);
    }

    #[test]
    fn test_only_first_mood_genre_counts() {
        let candidate = tagged("Song", "Someone Else", &["hip-hop", "trap", "pop"]);
        let signals = explain(&candidate, &seed(), &prefs(None, Some("energetic")));
        assert_eq!(signals, vec![Signal::MoodGenreTag("hip-hop")]);
    }

    #[test]
    fn test_genre_in_title() {
        let candidate = track("t1", "Pop Song Deluxe", "Someone Else");
        assert_eq!(score(&candidate, &seed(), &prefs(Some("pop"), None)), 1);
    }

    #[test]
    fn test_duplicate_title_penalty_can_go_negative() {
        let candidate = track("t1", "bad guy", "Cover Band");
        assert_eq!(score(&candidate, &seed(), &Preferences::default()), -10);

        let same_artist = track("t2", "BAD GUY", "Billie Eilish");
        assert_eq!(score(&same_artist, &seed(), &Preferences::default()), -5);
    }

    #[test]
    fn test_score_is_independent_of_list_order() {
        let a = tagged("Bury a Friend", "Billie Eilish", &["pop"]);
        let b = track("t2", "Ocean Eyes", "Finneas");
        let p = prefs(Some("pop"), None);

        let forward = rank(vec![a.clone(), b.clone()], &seed(), &p);
        let backward = rank(vec![b, a.clone()], &seed(), &p);

        let score_of = |ranked: &[ScoredCandidate]| {
            ranked.iter().find(|c| c.record == a).map(|c| c.score)
        };
        assert_eq!(score_of(&forward), Some(7));
        assert_eq!(score_of(&forward), score_of(&backward));
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let candidates = vec![
            track("a", "First", "Nobody"),
            track("b", "Same Artist", "Billie Eilish"),
            track("c", "Second", "Nobody"),
            track("d", "Third", "Nobody"),
        ];

        let ids: Vec<String> = rank(candidates, &seed(), &Preferences::default())
            .into_iter()
            .map(|c| c.record.track_id)
            .collect();
        assert_eq!(ids, vec!["b", "a", "c", "d"]);
    }
}
