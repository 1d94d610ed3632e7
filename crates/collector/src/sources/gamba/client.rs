use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::json;
use storage::RaceSnapshot;
use tracing::debug;

use super::models::ApiResponse;
use crate::config::SourceConfig;
use crate::error::{CollectorError, Result};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";

pub struct GambaClient {
    base_url: String,
    persisted_query_hash: String,
    client: reqwest::Client,
}

impl GambaClient {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("*/*"));
        if let Some(token) = &config.auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|e| CollectorError::Config(format!("invalid auth token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.base_url,
            persisted_query_hash: config.persisted_query_hash,
            client,
        })
    }

    pub async fn fetch_race(&self, race_id: i64) -> Result<ApiResponse> {
        let variables = json!({ "raceId": race_id }).to_string();
        let extensions = json!({
            "persistedQuery": { "version": 1, "sha256Hash": self.persisted_query_hash }
        })
        .to_string();

        debug!(race_id, "Requesting race");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("operationName", "getRaceById"),
                ("variables", variables.as_str()),
                ("extensions", extensions.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let data = serde_json::from_str::<ApiResponse>(&body)?;

        Ok(data)
    }
}

#[async_trait::async_trait]
impl crate::traits::RaceSource for GambaClient {
    async fn fetch_race_by_id(&self, race_id: i64) -> Result<Option<RaceSnapshot>> {
        self.fetch_race(race_id).await?.into_race()
    }
}
