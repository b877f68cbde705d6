/// MusicBrainz recording search provider
///
/// Wraps `GET /ws/2/recording/` with a per-attempt timeout, a bounded retry
/// policy and a TTL cache keyed by the full query tuple. Every request carries
/// the configured User-Agent, which MusicBrainz requires.
use crate::{
    cached,
    config::Config,
    db::Cache,
    error::{AppError, AppResult},
    models::{MbRecording, TrackRecord},
    services::{
        providers::{RecordingQuery, SearchIndex},
        retry::RetryPolicy,
    },
};
use reqwest::{Client as HttpClient, StatusCode};
use serde_json::Value;

/// Extra entities requested with every search
const SEARCH_INCLUDES: &str = "tags+release-groups";

#[derive(Clone)]
pub struct MusicBrainzClient {
    http_client: HttpClient,
    api_url: String,
    cache: Cache,
    retry: RetryPolicy,
}

impl MusicBrainzClient {
    /// Builds a client from configuration
    pub fn new(config: &Config, cache: Cache) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(config.mb_user_agent.as_str())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self::with_client(
            http_client,
            config.musicbrainz_url.clone(),
            cache,
            RetryPolicy::new(config.max_retries, config.retry_delay()),
        ))
    }

    pub fn with_client(
        http_client: HttpClient,
        api_url: String,
        cache: Cache,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
            retry,
        }
    }

    /// One HTTP attempt, no retries
    async fn fetch_once(&self, query: &RecordingQuery) -> AppResult<Vec<TrackRecord>> {
        let url = format!("{}/recording/", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", query.query.as_str()),
                ("fmt", "json"),
                ("inc", SEARCH_INCLUDES),
            ])
            .query(&[("limit", query.limit), ("offset", query.offset)])
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Transient(format!(
                "MusicBrainz returned status {}: {}",
                status, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "MusicBrainz returned status {}: {}",
                status, body
            )));
        }

        let body: Value = response.json().await?;
        let tracks = parse_recordings(body);

        tracing::info!(
            query = %query.query,
            limit = query.limit,
            offset = query.offset,
            results = tracks.len(),
            provider = "musicbrainz",
            "Recording search completed"
        );

        Ok(tracks)
    }
}

/// Converts a search response body, dropping entries that fail to decode
pub(crate) fn parse_recordings(body: Value) -> Vec<TrackRecord> {
    let items = match body {
        Value::Object(mut map) => match map.remove("recordings") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    let total = items.len();
    let tracks: Vec<TrackRecord> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<MbRecording>(item).ok())
        .map(TrackRecord::from)
        .collect();

    if tracks.len() < total {
        tracing::debug!(
            dropped = total - tracks.len(),
            "Skipped malformed recordings in MusicBrainz response"
        );
    }

    tracks
}

#[async_trait::async_trait]
impl SearchIndex for MusicBrainzClient {
    async fn search_recordings(&self, query: &RecordingQuery) -> AppResult<Vec<TrackRecord>> {
        if query.query.trim().is_empty() {
            return Ok(Vec::new());
        }

        cached!(
            self.cache,
            query.cache_key(),
            self.cache.ttl(),
            async move {
                self.retry
                    .run("musicbrainz recording search", || self.fetch_once(query))
                    .await
            }
        )
    }

    fn name(&self) -> &'static str {
        "musicbrainz"
    }
}
