//! Aggregate dashboard statistics.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{ApiError, TicketApi};
use crate::sequence::RequestSeq;
use crate::ticket::TicketStats;

/// Completions delivered back to the stats panel.
#[derive(Debug)]
pub enum StatsMessage {
    Loaded {
        seq: u64,
        result: Result<TicketStats, ApiError>,
    },
}

/// Holds the last statistics snapshot fetched from the service.
pub struct StatsPanel {
    api: Arc<dyn TicketApi>,
    stats: Option<TicketStats>,
    loading: bool,
    fetches: RequestSeq,
    tx: mpsc::UnboundedSender<StatsMessage>,
    rx: mpsc::UnboundedReceiver<StatsMessage>,
}

impl StatsPanel {
    pub fn new(api: Arc<dyn TicketApi>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            stats: None,
            loading: false,
            fetches: RequestSeq::new(),
            tx,
            rx,
        }
    }

    /// Last snapshot, if any fetch has succeeded.
    pub fn stats(&self) -> Option<&TicketStats> {
        self.stats.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn refresh(&mut self) {
        let seq = self.fetches.issue();
        self.loading = true;
        debug!(seq, "Refreshing stats");

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_stats().await;
            let _ = tx.send(StatsMessage::Loaded { seq, result });
        });
    }

    pub async fn next_message(&mut self) -> Option<StatsMessage> {
        self.rx.recv().await
    }

    pub fn try_next_message(&mut self) -> Option<StatsMessage> {
        self.rx.try_recv().ok()
    }

    /// Apply a completion. Failures keep the previous snapshot.
    pub fn handle(&mut self, message: StatsMessage) {
        let StatsMessage::Loaded { seq, result } = message;
        if self.fetches.is_latest(seq) {
            self.loading = false;
        }

        match result {
            Ok(stats) if self.fetches.accept(seq) => {
                self.stats = Some(stats);
            }
            Ok(_) => debug!(seq, "Discarding stale stats"),
            Err(e) => {
                self.fetches.reject(seq);
                warn!(seq, error = %e, "Stats fetch failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, Endpoint, MockTicketApi};
    use crate::ticket::{Priority, Status};
    use std::time::Duration;

    async fn pump(panel: &mut StatsPanel) {
        let message = panel.next_message().await.unwrap();
        panel.handle(message);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_loads_counts() {
        let mut urgent = fixtures::ticket(2, "Outage");
        urgent.priority = Priority::Critical;
        let api = Arc::new(MockTicketApi::with_tickets(vec![
            urgent,
            fixtures::ticket_with_status(1, "Old", Status::Closed),
        ]));
        let mut panel = StatsPanel::new(api.clone());

        panel.refresh();
        assert!(panel.is_loading());
        pump(&mut panel).await;

        let stats = panel.stats().unwrap();
        assert_eq!(stats.total_tickets, 2);
        assert_eq!(stats.open_tickets, 1);
        assert_eq!(stats.priority_breakdown.get(&Priority::Critical), Some(&1));
        assert!(!panel.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_snapshot() {
        let api = Arc::new(MockTicketApi::with_tickets(vec![fixtures::ticket(1, "A")]));
        let mut panel = StatsPanel::new(api.clone());
        panel.refresh();
        pump(&mut panel).await;

        api.set_next_error(Endpoint::Stats, ApiError::Timeout).await;
        panel.refresh();
        pump(&mut panel).await;

        assert_eq!(panel.stats().unwrap().total_tickets, 1);
        assert!(!panel.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_older_reply_is_discarded() {
        let api = Arc::new(MockTicketApi::with_tickets(vec![fixtures::ticket(1, "A")]));
        let mut panel = StatsPanel::new(api.clone());

        api.push_delay(Endpoint::Stats, Duration::from_millis(500)).await;
        panel.refresh();
        tokio::task::yield_now().await;
        api.set_tickets(vec![fixtures::ticket(1, "A"), fixtures::ticket(2, "B")])
            .await;
        panel.refresh();

        pump(&mut panel).await;
        assert_eq!(panel.stats().unwrap().total_tickets, 2);
        assert!(!panel.is_loading());

        pump(&mut panel).await;
        assert_eq!(panel.stats().unwrap().total_tickets, 2);
    }
}
