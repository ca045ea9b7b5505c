//! reqwest-backed ticket service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::ApiConfig;
use crate::ticket::{
    ClassificationSuggestion, NewTicket, Ticket, TicketPatch, TicketStats,
};

use super::{ApiError, TicketApi, TicketQuery};

/// Longest slice of an error body kept in `ApiError::Status`.
const ERROR_BODY_MAX_CHARS: usize = 200;

/// HTTP implementation of [`TicketApi`].
pub struct HttpTicketApi {
    client: Client,
    /// `{base_url}/api`, without trailing slash.
    api_root: String,
}

impl HttpTicketApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_root: format!("{}/api", config.base_url.trim_end_matches('/')),
        })
    }

    fn tickets_url(&self) -> String {
        format!("{}/tickets/", self.api_root)
    }

    fn list_url(&self, query: &TicketQuery) -> String {
        if query.is_empty() {
            self.tickets_url()
        } else {
            format!("{}?{}", self.tickets_url(), query.to_query_string())
        }
    }

    fn ticket_url(&self, id: i64) -> String {
        format!("{}/tickets/{}/", self.api_root, id)
    }

    fn stats_url(&self) -> String {
        format!("{}/tickets/stats/", self.api_root)
    }

    fn classify_url(&self) -> String {
        format!("{}/tickets/classify/", self.api_root)
    }
}

fn map_send_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_connect() {
        ApiError::ConnectionFailed(e.to_string())
    } else {
        ApiError::ConnectionFailed(format!("Request failed: {}", e))
    }
}

/// Reject non-2xx replies, keeping a short excerpt of the body.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status,
        body: body.chars().take(ERROR_BODY_MAX_CHARS).collect(),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Reply of the classification endpoint; either field may be missing.
#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    #[serde(default)]
    suggested_category: Option<String>,
    #[serde(default)]
    suggested_priority: Option<String>,
}

impl ClassifyResponse {
    /// A suggestion only when both fields name known values.
    fn into_suggestion(self) -> Option<ClassificationSuggestion> {
        let category = self.suggested_category?.parse().ok()?;
        let priority = self.suggested_priority?.parse().ok()?;
        Some(ClassificationSuggestion { category, priority })
    }
}

#[async_trait]
impl TicketApi for HttpTicketApi {
    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, ApiError> {
        let url = self.list_url(query);
        debug!(url = %url, "Fetching tickets");

        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        let tickets: Vec<Ticket> = decode(ensure_success(response).await?).await?;

        debug!(count = tickets.len(), "Fetched tickets");
        Ok(tickets)
    }

    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, ApiError> {
        debug!(title = %ticket.title, "Creating ticket");

        let response = self
            .client
            .post(self.tickets_url())
            .json(ticket)
            .send()
            .await
            .map_err(map_send_error)?;

        decode(ensure_success(response).await?).await
    }

    async fn update_ticket(&self, id: i64, patch: &TicketPatch) -> Result<Ticket, ApiError> {
        debug!(ticket_id = id, "Updating ticket");

        let response = self
            .client
            .patch(self.ticket_url(id))
            .json(patch)
            .send()
            .await
            .map_err(map_send_error)?;

        decode(ensure_success(response).await?).await
    }

    async fn fetch_stats(&self) -> Result<TicketStats, ApiError> {
        let response = self
            .client
            .get(self.stats_url())
            .send()
            .await
            .map_err(map_send_error)?;

        decode(ensure_success(response).await?).await
    }

    async fn classify(
        &self,
        description: &str,
    ) -> Result<Option<ClassificationSuggestion>, ApiError> {
        let response = self
            .client
            .post(self.classify_url())
            .json(&serde_json::json!({ "description": description }))
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Classification unavailable");
            return Ok(None);
        }

        let reply: ClassifyResponse = decode(response).await?;
        Ok(reply.into_suggestion())
    }
}
