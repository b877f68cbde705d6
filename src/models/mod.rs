pub mod musicbrainz;
pub mod preferences;
pub mod track;

pub use musicbrainz::{CoverArtListing, MbRecording};
pub use preferences::{genres_for_mood, Preferences, PreferencesPayload};
pub use track::{
    normalize_title, Recommendation, ScoredCandidate, SeedTrack, TrackRecord, UNKNOWN_ARTIST,
};
