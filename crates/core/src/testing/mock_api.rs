//! Mock ticket service for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::api::{ApiError, TicketApi, TicketQuery};
use crate::ticket::{
    Category, ClassificationSuggestion, NewTicket, Priority, Status, Ticket, TicketPatch,
    TicketStats,
};

/// Endpoint selector for error injection and simulated latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    List,
    Create,
    Update,
    Stats,
    Classify,
}

/// A recorded call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    List(TicketQuery),
    Create(NewTicket),
    Update { id: i64, patch: TicketPatch },
    Stats,
    Classify(String),
}

impl RecordedCall {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            RecordedCall::List(_) => Endpoint::List,
            RecordedCall::Create(_) => Endpoint::Create,
            RecordedCall::Update { .. } => Endpoint::Update,
            RecordedCall::Stats => Endpoint::Stats,
            RecordedCall::Classify(_) => Endpoint::Classify,
        }
    }
}

/// Mock implementation of the TicketApi trait.
///
/// Behaves like a small in-memory ticket service:
/// - Lists apply the query server-side (search matches title or description)
/// - Creates assign ids and the `open` status
/// - Calls are recorded for assertions
/// - Errors and per-call delays can be injected per endpoint
///
/// # Example
///
/// ```rust,ignore
/// use helpdesk_core::testing::{fixtures, MockTicketApi, Endpoint};
///
/// let api = MockTicketApi::with_tickets(vec![fixtures::ticket(1, "Login broken")]);
/// api.push_delay(Endpoint::List, Duration::from_millis(300)).await;
///
/// let tickets = api.list_tickets(&TicketQuery::new()).await?;
/// assert_eq!(api.call_count(Endpoint::List).await, 1);
/// ```
pub struct MockTicketApi {
    /// Server-side ticket store.
    tickets: Arc<RwLock<Vec<Ticket>>>,
    /// Recorded calls, in arrival order.
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    /// One-shot errors per endpoint.
    next_errors: Arc<RwLock<HashMap<Endpoint, ApiError>>>,
    /// Queued per-call delays per endpoint.
    delays: Arc<RwLock<HashMap<Endpoint, VecDeque<Duration>>>>,
    /// Suggestion returned by `classify`.
    classification: Arc<RwLock<Option<ClassificationSuggestion>>>,
}

impl std::fmt::Debug for MockTicketApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTicketApi")
            .field("tickets", &"<tickets>")
            .field("calls", &"<calls>")
            .field("next_errors", &"<next_errors>")
            .field("delays", &"<delays>")
            .field("classification", &"<classification>")
            .finish()
    }
}

impl Default for MockTicketApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTicketApi {
    /// Create a mock service with no tickets and no classification.
    pub fn new() -> Self {
        Self::with_tickets(Vec::new())
    }

    /// Create a mock service holding `tickets`, listed in the given order.
    pub fn with_tickets(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: Arc::new(RwLock::new(tickets)),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_errors: Arc::new(RwLock::new(HashMap::new())),
            delays: Arc::new(RwLock::new(HashMap::new())),
            classification: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the stored tickets.
    pub async fn set_tickets(&self, tickets: Vec<Ticket>) {
        *self.tickets.write().await = tickets;
    }

    /// Snapshot of the stored tickets.
    pub async fn tickets(&self) -> Vec<Ticket> {
        self.tickets.read().await.clone()
    }

    /// Set the suggestion returned by `classify` (`None` = no suggestion).
    pub async fn set_classification(&self, suggestion: Option<ClassificationSuggestion>) {
        *self.classification.write().await = suggestion;
    }

    /// Make the next call to `endpoint` fail with `error`.
    pub async fn set_next_error(&self, endpoint: Endpoint, error: ApiError) {
        self.next_errors.write().await.insert(endpoint, error);
    }

    /// Delay the next not-yet-delayed call to `endpoint` by `delay`.
    ///
    /// Delays queue up: the first call waits for the first pushed delay, and
    /// so on. Calls with no queued delay complete immediately.
    pub async fn push_delay(&self, endpoint: Endpoint, delay: Duration) {
        self.delays
            .write()
            .await
            .entry(endpoint)
            .or_default()
            .push_back(delay);
    }

    /// Get recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Get recorded calls to one endpoint.
    pub async fn calls_to(&self, endpoint: Endpoint) -> Vec<RecordedCall> {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.endpoint() == endpoint)
            .cloned()
            .collect()
    }

    /// Number of calls made to `endpoint`.
    pub async fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls_to(endpoint).await.len()
    }

    /// Clear recorded calls.
    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    /// Record the call, wait out any queued delay, then take any injected error.
    async fn enter(&self, call: RecordedCall) -> Result<(), ApiError> {
        let endpoint = call.endpoint();
        self.calls.write().await.push(call);

        let delay = self
            .delays
            .write()
            .await
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_errors.write().await.remove(&endpoint) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn matches_query(ticket: &Ticket, query: &TicketQuery) -> bool {
    let field_matches = |name: &str, value: &str| query.get(name).is_none_or(|v| v == value);

    let search_matches = query.get("search").is_none_or(|needle| {
        let needle = needle.to_lowercase();
        ticket.title.to_lowercase().contains(&needle)
            || ticket.description.to_lowercase().contains(&needle)
    });

    field_matches("category", ticket.category.as_str())
        && field_matches("priority", ticket.priority.as_str())
        && field_matches("status", ticket.status.as_str())
        && search_matches
}

#[async_trait]
impl TicketApi for MockTicketApi {
    async fn list_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, ApiError> {
        self.enter(RecordedCall::List(query.clone())).await?;

        Ok(self
            .tickets
            .read()
            .await
            .iter()
            .filter(|t| matches_query(t, query))
            .cloned()
            .collect())
    }

    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, ApiError> {
        self.enter(RecordedCall::Create(ticket.clone())).await?;

        let mut tickets = self.tickets.write().await;
        let id = tickets.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let created = Ticket {
            id,
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            category: ticket.category,
            priority: ticket.priority,
            status: Status::Open,
            created_at: Utc::now(),
        };
        // Newest first, like the real service.
        tickets.insert(0, created.clone());
        Ok(created)
    }

    async fn update_ticket(&self, id: i64, patch: &TicketPatch) -> Result<Ticket, ApiError> {
        self.enter(RecordedCall::Update {
            id,
            patch: patch.clone(),
        })
        .await?;

        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                body: r#"{"error": "Not found"}"#.to_string(),
            })?;

        if let Some(title) = &patch.title {
            ticket.title = title.clone();
        }
        if let Some(description) = &patch.description {
            ticket.description = description.clone();
        }
        if let Some(category) = patch.category {
            ticket.category = category;
        }
        if let Some(priority) = patch.priority {
            ticket.priority = priority;
        }
        if let Some(status) = patch.status {
            ticket.status = status;
        }
        Ok(ticket.clone())
    }

    async fn fetch_stats(&self) -> Result<TicketStats, ApiError> {
        self.enter(RecordedCall::Stats).await?;

        let tickets = self.tickets.read().await;
        let mut priority_breakdown: BTreeMap<Priority, u64> =
            Priority::ALL.iter().map(|p| (*p, 0)).collect();
        let mut category_breakdown: BTreeMap<Category, u64> =
            Category::ALL.iter().map(|c| (*c, 0)).collect();
        for ticket in tickets.iter() {
            *priority_breakdown.entry(ticket.priority).or_default() += 1;
            *category_breakdown.entry(ticket.category).or_default() += 1;
        }

        Ok(TicketStats {
            total_tickets: tickets.len() as u64,
            open_tickets: tickets.iter().filter(|t| t.status == Status::Open).count() as u64,
            avg_tickets_per_day: tickets.len() as f64,
            priority_breakdown,
            category_breakdown,
        })
    }

    async fn classify(
        &self,
        description: &str,
    ) -> Result<Option<ClassificationSuggestion>, ApiError> {
        self.enter(RecordedCall::Classify(description.to_string()))
            .await?;
        Ok(*self.classification.read().await)
    }
}
