//! Contract with the ticket HTTP service.

use async_trait::async_trait;
use thiserror::Error;

use crate::ticket::{ClassificationSuggestion, NewTicket, Ticket, TicketPatch, TicketStats};

/// Errors that can occur when talking to the ticket service.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Ticket service connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Ticket service request timed out")]
    Timeout,

    #[error("Ticket service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode ticket service response: {0}")]
    Decode(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Query parameters for listing tickets.
///
/// Holds only the dimensions that actually constrain the result, in a stable
/// order. An empty query lists every ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketQuery {
    params: Vec<(&'static str, String)>,
}

impl TicketQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter; empty values are dropped.
    pub fn push(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.params.push((name, value));
        }
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Percent-encoded `k=v&k=v` form, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Client side of the ticket service.
///
/// Implementations report transport and HTTP failures as `ApiError`; callers
/// decide which failures are visible.
#[async_trait]
pub trait TicketApi: Send + Sync {
    /// `GET /api/tickets/` filtered by `query`, in server order.
    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, ApiError>;

    /// `POST /api/tickets/`.
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, ApiError>;

    /// `PATCH /api/tickets/{id}/`.
    async fn update_ticket(&self, id: i64, patch: &TicketPatch) -> Result<Ticket, ApiError>;

    /// `GET /api/tickets/stats/`.
    async fn fetch_stats(&self) -> Result<TicketStats, ApiError>;

    /// `POST /api/tickets/classify/`.
    ///
    /// `Ok(None)` when the service has no suggestion, including a non-2xx
    /// reply or a reply missing either field.
    async fn classify(&self, description: &str)
        -> Result<Option<ClassificationSuggestion>, ApiError>;
}
