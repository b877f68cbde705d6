/// Cover Art Archive lookup by release group
///
/// Enrichment only: every failure degrades to "no cover art".
use crate::{
    cached,
    config::Config,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::CoverArtListing,
    services::providers::CoverArtProvider,
};
use reqwest::{Client as HttpClient, StatusCode};

#[derive(Clone)]
pub struct CoverArtArchiveClient {
    http_client: HttpClient,
    api_url: String,
    cache: Cache,
}

impl CoverArtArchiveClient {
    pub fn new(config: &Config, cache: Cache) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(config.mb_user_agent.as_str())
            .timeout(config.cover_art_timeout())
            .build()?;

        Ok(Self::with_client(http_client, config.cover_art_url.clone(), cache))
    }

    pub fn with_client(http_client: HttpClient, api_url: String, cache: Cache) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// Cached lookup; a release group without artwork is cached as `None`
    async fn lookup(&self, release_group_id: &str) -> AppResult<Option<String>> {
        cached!(
            self.cache,
            CacheKey::CoverArt(release_group_id.to_string()),
            self.cache.ttl(),
            async move { self.fetch(release_group_id).await }
        )
    }

    async fn fetch(&self, release_group_id: &str) -> AppResult<Option<String>> {
        let url = format!("{}/release-group/{}", self.api_url, release_group_id);
        let response = self.http_client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Cover Art Archive returned status {}",
                response.status()
            )));
        }

        let listing: CoverArtListing = response.json().await?;
        Ok(listing.images.into_iter().next().and_then(|image| image.image))
    }
}

#[async_trait::async_trait]
impl CoverArtProvider for CoverArtArchiveClient {
    async fn front_cover(&self, release_group_id: &str) -> Option<String> {
        let release_group_id = release_group_id.trim();
        if release_group_id.is_empty() {
            return None;
        }

        match self.lookup(release_group_id).await {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    release_group_id = %release_group_id,
                    "Cover art lookup failed"
                );
                None
            }
        }
    }
}
