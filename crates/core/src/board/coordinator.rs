//! Ticket list view: filters, search, refetching, and status advancement.
//!
//! Structured filters refetch immediately. Free-text search is echoed at
//! once but only reaches the filters after the search quiet period.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, TicketApi};
use crate::config::TimingConfig;
use crate::debounce::Debouncer;
use crate::sequence::RequestSeq;
use crate::ticket::{Category, Priority, Status, Ticket, TicketPatch};

use super::filter::FilterState;
use super::list::TicketList;

const SEARCH_KEY: &str = "search";

/// Completions delivered back to the board.
#[derive(Debug)]
pub enum BoardMessage {
    /// Search input has been quiet for the search delay.
    SearchSettled(String),
    /// A list fetch finished.
    Fetched {
        seq: u64,
        result: Result<Vec<Ticket>, ApiError>,
    },
    /// A status update finished.
    StatusUpdated {
        id: i64,
        result: Result<Ticket, ApiError>,
    },
}

/// Why a ticket cannot be advanced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdvanceError {
    #[error("Ticket #{0} is not in the list")]
    UnknownTicket(i64),

    #[error("Ticket #{0} is already closed")]
    AlreadyClosed(i64),
}

/// Owns the filters and the visible ticket collection.
pub struct TicketBoard {
    api: Arc<dyn TicketApi>,
    search_delay: Duration,

    filters: FilterState,
    search_input: String,
    tickets: TicketList,
    loading: bool,
    fetches: RequestSeq,

    debouncer: Debouncer<&'static str>,
    tx: mpsc::UnboundedSender<BoardMessage>,
    rx: mpsc::UnboundedReceiver<BoardMessage>,
}

impl TicketBoard {
    pub fn new(api: Arc<dyn TicketApi>, timing: &TimingConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            search_delay: timing.search_delay(),
            filters: FilterState::default(),
            search_input: String::new(),
            tickets: TicketList::new(),
            loading: false,
            fetches: RequestSeq::new(),
            debouncer: Debouncer::new(),
            tx,
            rx,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Search text as typed, ahead of the applied filter.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn tickets(&self) -> &TicketList {
        &self.tickets
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_category_filter(&mut self, category: Option<Category>) {
        if self.filters.category != category {
            self.filters.category = category;
            self.refresh();
        }
    }

    pub fn set_priority_filter(&mut self, priority: Option<Priority>) {
        if self.filters.priority != priority {
            self.filters.priority = priority;
            self.refresh();
        }
    }

    pub fn set_status_filter(&mut self, status: Option<Status>) {
        if self.filters.status != status {
            self.filters.status = status;
            self.refresh();
        }
    }

    /// Echo a search keystroke and restart the search quiet period.
    ///
    /// An empty search clears the search filter once it settles.
    pub fn set_search_input(&mut self, text: impl Into<String>) {
        self.search_input = text.into();

        let tx = self.tx.clone();
        let text = self.search_input.clone();
        self.debouncer.schedule(SEARCH_KEY, self.search_delay, move || {
            let _ = tx.send(BoardMessage::SearchSettled(text));
        });
    }

    /// Fetch the list for the current filters.
    ///
    /// Fetches already in flight are left to finish; only the newest reply
    /// that has arrived is ever shown.
    pub fn refresh(&mut self) {
        let seq = self.fetches.issue();
        let query = self.filters.to_query();
        self.loading = true;
        debug!(seq, query = %query.to_query_string(), "Refreshing ticket list");

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.list_tickets(&query).await;
            let _ = tx.send(BoardMessage::Fetched { seq, result });
        });
    }

    /// Ask the service to move a ticket to its next status.
    ///
    /// Returns the requested status. The list is updated when the reply
    /// arrives; a failed update leaves the ticket as it was.
    pub fn advance_ticket(&mut self, id: i64) -> Result<Status, AdvanceError> {
        let current = self
            .tickets
            .get(id)
            .ok_or(AdvanceError::UnknownTicket(id))?
            .status;
        let next = current.next().ok_or(AdvanceError::AlreadyClosed(id))?;

        debug!(ticket_id = id, from = %current, to = %next, "Advancing ticket");
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.update_ticket(id, &TicketPatch::status(next)).await;
            let _ = tx.send(BoardMessage::StatusUpdated { id, result });
        });
        Ok(next)
    }

    /// Wait for the next completion.
    pub async fn next_message(&mut self) -> Option<BoardMessage> {
        self.rx.recv().await
    }

    /// Take a completion if one is already queued.
    pub fn try_next_message(&mut self) -> Option<BoardMessage> {
        self.rx.try_recv().ok()
    }

    /// Apply a completion.
    pub fn handle(&mut self, message: BoardMessage) {
        match message {
            BoardMessage::SearchSettled(text) => {
                let search = (!text.is_empty()).then_some(text);
                if self.filters.search != search {
                    self.filters.search = search;
                    self.refresh();
                }
            }
            BoardMessage::Fetched { seq, result } => self.finish_fetch(seq, result),
            BoardMessage::StatusUpdated { id, result } => match result {
                Ok(ticket) => {
                    info!(ticket_id = id, status = %ticket.status, "Ticket status updated");
                    self.tickets.apply_update(ticket);
                }
                Err(e) => {
                    warn!(ticket_id = id, error = %e, "Status update failed");
                }
            },
        }
    }

    fn finish_fetch(&mut self, seq: u64, result: Result<Vec<Ticket>, ApiError>) {
        if self.fetches.is_latest(seq) {
            self.loading = false;
        }

        match result {
            Ok(tickets) => {
                if self.fetches.accept(seq) {
                    debug!(seq, count = tickets.len(), "Applying ticket list");
                    self.tickets.replace_all(tickets);
                } else {
                    debug!(seq, "Discarding stale ticket list");
                }
            }
            Err(e) => {
                self.fetches.reject(seq);
                warn!(seq, error = %e, "Ticket list fetch failed");
            }
        }
    }
}
