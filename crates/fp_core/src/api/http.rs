//! Blocking HTTP client for the card service.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{
    ApiError, CardApi, CardEntry, CardListResponse, CreateCardRequest, CreateCardResponse,
    CreatedCard, HealthResponse,
};
use crate::config::PlannerConfig;

pub struct HttpCardApi {
    client: Client,
    api_url: String,
    random_players_url: String,
}

impl HttpCardApi {
    pub fn new(
        api_url: impl Into<String>,
        random_players_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            random_players_url: random_players_url.into(),
        })
    }

    pub fn from_config(config: &PlannerConfig) -> Result<Self, ApiError> {
        Self::new(
            config.api_url.clone(),
            config.random_players_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or(body);
            warn!(status = status.as_u16(), %message, "card service error");
            return Err(ApiError::Status { status: status.as_u16(), message });
        }
        Ok(response.json()?)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl CardApi for HttpCardApi {
    fn get_cards(&self) -> Result<Vec<CardEntry>, ApiError> {
        let url = self.endpoint("get-cards");
        debug!(%url, "fetching cards");
        let response = self.client.get(&url).send()?;
        let cards = Self::read_json::<CardListResponse>(response)?.into_cards()?;
        info!(count = cards.len(), "cards loaded");
        Ok(cards)
    }

    fn random_players(&self, count: usize) -> Result<Vec<CardEntry>, ApiError> {
        debug!(url = %self.random_players_url, count, "fetching random players");
        let response = self
            .client
            .get(&self.random_players_url)
            .query(&[("count", count)])
            .send()?;
        let cards = Self::read_json::<CardListResponse>(response)?.into_cards()?;
        info!(count = cards.len(), "random players loaded");
        Ok(cards)
    }

    fn create_card(&self, request: &CreateCardRequest) -> Result<CreatedCard, ApiError> {
        request.validate()?;
        let url = self.endpoint("create-card");
        debug!(%url, player = %request.name, "creating card");
        let response = self.client.post(&url).json(request).send()?;
        let created = Self::read_json::<CreateCardResponse>(response)?.into_created()?;
        info!(filename = %created.filename, "card created");
        Ok(created)
    }

    fn health(&self) -> Result<HealthResponse, ApiError> {
        let response = self.client.get(self.endpoint("health")).send()?;
        Self::read_json(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create::Preset;

    #[test]
    fn test_endpoints_strip_trailing_slash() {
        let api = HttpCardApi::new(
            "http://localhost:5000/api/",
            "http://localhost:5000/api/random-players",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(api.api_url(), "http://localhost:5000/api");
        assert_eq!(api.endpoint("get-cards"), "http://localhost:5000/api/get-cards");
    }

    #[test]
    fn test_create_validates_before_sending() {
        // Nothing listens on port 9; validation must fail first.
        let api = HttpCardApi::new("http://127.0.0.1:9/api", "http://127.0.0.1:9/r", Duration::from_millis(200))
            .unwrap();
        let mut request = Preset::Salah.request();
        request.overall = 120;
        assert!(matches!(api.create_card(&request), Err(ApiError::Invalid(_))));
    }
}
