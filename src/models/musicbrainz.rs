//! Wire types for the MusicBrainz recording search and Cover Art Archive.
//!
//! Every field is optional: the index omits keys freely and occasionally
//! sends `null` where a list is expected.

use serde::Deserialize;
use std::collections::BTreeSet;

use super::TrackRecord;

/// One entry of the `recordings` array
#[derive(Debug, Clone, Deserialize)]
pub struct MbRecording {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "artist-credit", default)]
    pub artist_credit: Option<Vec<MbArtistCredit>>,
    #[serde(rename = "release-group", default)]
    pub release_group: Option<MbReleaseGroup>,
    #[serde(default)]
    pub tags: Option<Vec<MbTag>>,
    #[serde(default)]
    pub releases: Option<Vec<MbRelease>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MbArtistCredit {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artist: Option<MbArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MbArtist {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MbReleaseGroup {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MbTag {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MbRelease {
    #[serde(rename = "release-group", default)]
    pub release_group: Option<MbReleaseGroup>,
}

/// Cover Art Archive release-group listing
#[derive(Debug, Clone, Deserialize)]
pub struct CoverArtListing {
    #[serde(default)]
    pub images: Vec<CoverArtImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverArtImage {
    #[serde(default)]
    pub image: Option<String>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<MbRecording> for TrackRecord {
    fn from(rec: MbRecording) -> Self {
        let first_credit = rec.artist_credit.and_then(|credits| credits.into_iter().next());
        let (artist_name, artist_id) = match first_credit {
            Some(credit) => (
                trimmed(credit.name).unwrap_or_default(),
                trimmed(credit.artist.and_then(|a| a.id)),
            ),
            None => (String::new(), None),
        };

        let releases = rec.releases.unwrap_or_default();

        // Search results usually nest the release group inside each release
        let release_group_id = trimmed(rec.release_group.and_then(|rg| rg.id)).or_else(|| {
            releases
                .first()
                .and_then(|r| r.release_group.as_ref())
                .and_then(|rg| trimmed(rg.id.clone()))
        });

        let tags: BTreeSet<String> = rec
            .tags
            .unwrap_or_default()
            .into_iter()
            .filter_map(|t| trimmed(t.name))
            .map(|name| name.to_lowercase())
            .collect();

        TrackRecord {
            track_id: rec.id.unwrap_or_default(),
            title: trimmed(rec.title).unwrap_or_default(),
            artist_name,
            artist_id,
            release_group_id,
            tags,
            release_count: releases.len(),
        }
    }
}
