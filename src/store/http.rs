use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{EventStore, ListQuery, StorePage};
use crate::config::AppConfig;
use crate::error::StoreError;
use crate::models::Event;

const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

pub struct HttpStore {
    base_url: String,
    client: Client,
}

impl HttpStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vive-medellin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| StoreError::Http(err.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/eventos", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/eventos/{}", self.base_url, id)
    }
}

fn status_error(status: StatusCode) -> StoreError {
    StoreError::Status {
        status: status.as_u16(),
        text: status.canonical_reason().unwrap_or_default().to_string(),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let body = response
        .text()
        .await
        .map_err(|err| StoreError::Http(err.to_string()))?;
    serde_json::from_str(&body).map_err(|err| StoreError::Decode(err.to_string()))
}

fn total_count(response: &Response) -> u64 {
    response
        .headers()
        .get(TOTAL_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

#[async_trait]
impl EventStore for HttpStore {
    async fn list(&self, query: &ListQuery) -> Result<StorePage, StoreError> {
        let url = self.collection_url();
        tracing::debug!(%url, ?query, "listing events");
        let response = self
            .client
            .get(&url)
            .query(&query.to_pairs())
            .send()
            .await
            .map_err(|err| StoreError::Http(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }
        let total = total_count(&response);
        let events: Vec<Event> = decode(response).await?;
        Ok(StorePage { events, total })
    }

    async fn get(&self, id: &str) -> Result<Event, StoreError> {
        let url = self.item_url(id);
        tracing::debug!(%url, "fetching event");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| StoreError::Http(err.to_string()))?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(id.to_string())),
            status if !status.is_success() => Err(status_error(status)),
            _ => decode(response).await,
        }
    }

    async fn create(&self, event: &Event) -> Result<Event, StoreError> {
        let url = self.collection_url();
        tracing::debug!(%url, id = %event.id, "creating event");
        let response = self
            .client
            .post(&url)
            .json(event)
            .send()
            .await
            .map_err(|err| StoreError::Http(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }
        decode(response).await
    }

    async fn patch(&self, id: &str, body: &Value) -> Result<Event, StoreError> {
        let url = self.item_url(id);
        tracing::debug!(%url, "patching event");
        let response = self
            .client
            .patch(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| StoreError::Http(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }
        decode(response).await
    }
}
