//! Lucene query construction for the MusicBrainz recording index.
//!
//! User-supplied values are always escaped before they are embedded, either
//! inside a quoted field expression (`field:"value"`) or as bare free text.

/// Characters with syntactic meaning in an unquoted Lucene query
const LUCENE_SPECIAL: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
    '/',
];

/// How the seed's artist is identified when querying for candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtistRef<'a> {
    /// MusicBrainz artist ID; disambiguates same-named artists
    Id(&'a str),
    Name(&'a str),
}

/// Escapes a value for use inside a double-quoted field expression
pub fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn quoted_field(field: &str, value: &str) -> String {
    format!("{}:\"{}\"", field, escape_quoted(value))
}

/// `recording:"title"`, plus `AND artist:"hint"` when a hint is given
pub fn build_title_artist_query(title: &str, artist_hint: Option<&str>) -> String {
    let mut query = quoted_field("recording", title.trim());
    if let Some(artist) = artist_hint.map(str::trim).filter(|a| !a.is_empty()) {
        query.push_str(" AND ");
        query.push_str(&quoted_field("artist", artist));
    }
    query
}

/// Recordings by one artist, optionally excluding a title
pub fn build_artist_query(artist: ArtistRef<'_>, exclude_title: Option<&str>) -> String {
    let mut query = match artist {
        ArtistRef::Id(id) => quoted_field("arid", id.trim()),
        ArtistRef::Name(name) => quoted_field("artist", name.trim()),
    };
    if let Some(title) = exclude_title.map(str::trim).filter(|t| !t.is_empty()) {
        query.push_str(" AND NOT ");
        query.push_str(&quoted_field("recording", title));
    }
    query
}

/// Free-text search over the index's default fields
///
/// Every Lucene operator character is escaped and bare `AND`/`OR`/`NOT`
/// words are lowercased so the text is matched literally.
pub fn build_free_text_query(text: &str) -> String {
    text.split_whitespace()
        .map(|word| match word {
            "AND" | "OR" | "NOT" => word.to_lowercase(),
            _ => {
                let mut escaped = String::with_capacity(word.len());
                for c in word.chars() {
                    if LUCENE_SPECIAL.contains(&c) {
                        escaped.push('\\');
                    }
                    escaped.push(c);
                }
                escaped
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
