use serde::{Deserialize, Deserializer};

/// Mood label → associated genres, checked in order when scoring
const MOOD_GENRES: &[(&str, &[&str])] = &[
    ("happy", &["pop", "dance", "electronic", "funk"]),
    ("sad", &["acoustic", "indie", "piano", "alternative"]),
    ("angry", &["rock", "metal", "punk", "trap"]),
    ("chill", &["lo-fi", "ambient", "jazz", "r&b"]),
    ("romantic", &["r&b", "soul", "ballad", "pop"]),
    ("energetic", &["edm", "hip-hop", "pop", "trap"]),
];

/// Genres associated with a mood; unknown moods map to nothing
pub fn genres_for_mood(mood: &str) -> &'static [&'static str] {
    MOOD_GENRES
        .iter()
        .find(|(label, _)| *label == mood)
        .map(|(_, genres)| *genres)
        .unwrap_or(&[])
}

/// Listener preferences as sent by the client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesPayload {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub randomize: Option<bool>,
    /// Accepts a string or a number
    #[serde(default, deserialize_with = "deserialize_seed")]
    pub seed: Option<String>,
}

fn deserialize_seed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seed {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Seed>::deserialize(deserializer)?.map(|seed| match seed {
        Seed::Text(text) => text,
        Seed::Number(number) => number.to_string(),
    }))
}

/// Normalized preferences; absent fields mean no bias
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    /// Lowercased genre hint
    pub genre: Option<String>,
    /// Lowercased mood label
    pub mood: Option<String>,
    pub artist_hint: Option<String>,
    pub randomize: bool,
    pub seed: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<PreferencesPayload> for Preferences {
    fn from(payload: PreferencesPayload) -> Self {
        Self {
            genre: non_blank(payload.genre).map(|g| g.to_lowercase()),
            mood: non_blank(payload.mood).map(|m| m.to_lowercase()),
            artist_hint: non_blank(payload.artist),
            randomize: payload.randomize.unwrap_or(false),
            seed: payload.seed,
        }
    }
}

impl Preferences {
    pub fn mood_genres(&self) -> &'static [&'static str] {
        self.mood.as_deref().map(genres_for_mood).unwrap_or(&[])
    }
}
