//! Ticket board lifecycle integration tests.
//!
//! Covers search debouncing, overlapping fetches, and status advancement
//! against the in-memory ticket service.

use std::sync::Arc;
use std::time::Duration;

use helpdesk_core::{
    testing::{fixtures, Endpoint, MockTicketApi, RecordedCall},
    Category, Priority, Status, TicketBoard, TimingConfig,
};

struct TestHarness {
    api: Arc<MockTicketApi>,
    board: TicketBoard,
}

impl TestHarness {
    fn new() -> Self {
        let mut billing = fixtures::ticket(3, "Refund not received");
        billing.category = Category::Billing;
        billing.priority = Priority::High;

        let api = Arc::new(MockTicketApi::with_tickets(vec![
            billing,
            fixtures::ticket(2, "VPN keeps dropping"),
            fixtures::ticket(1, "Printer offline"),
        ]));
        let board = TicketBoard::new(api.clone(), &TimingConfig::default());
        Self { api, board }
    }

    async fn pump(&mut self) {
        let message = self
            .board
            .next_message()
            .await
            .expect("board channel closed");
        self.board.handle(message);
    }

    async fn load(&mut self) {
        self.board.refresh();
        self.pump().await;
    }

    fn ids(&self) -> Vec<i64> {
        self.board.tickets().iter().map(|t| t.id).collect()
    }

    fn statuses(&self) -> Vec<Status> {
        self.board.tickets().iter().map(|t| t.status).collect()
    }
}

#[tokio::test(start_paused = true)]
async fn test_search_typing_propagates_once() {
    let mut h = TestHarness::new();

    h.board.set_search_input("abc");
    tokio::time::advance(Duration::from_millis(200)).await;
    h.board.set_search_input("abcdef");
    assert_eq!(h.board.filters().search, None);

    // Settled search, then its fetch.
    h.pump().await;
    assert_eq!(h.board.filters().search.as_deref(), Some("abcdef"));
    h.pump().await;

    let calls = h.api.calls_to(Endpoint::List).await;
    assert_eq!(calls.len(), 1);
    assert!(matches!(
        &calls[0],
        RecordedCall::List(query) if query.get("search") == Some("abcdef")
    ));
}

#[tokio::test(start_paused = true)]
async fn test_search_filters_server_side() {
    let mut h = TestHarness::new();

    h.board.set_search_input("vpn");
    h.pump().await;
    h.pump().await;

    assert_eq!(h.ids(), vec![2]);
}

#[tokio::test(start_paused = true)]
async fn test_combined_filters_build_query() {
    let mut h = TestHarness::new();

    h.board.set_category_filter(Some(Category::Billing));
    h.pump().await;
    h.board.set_priority_filter(Some(Priority::High));
    h.pump().await;
    assert_eq!(h.ids(), vec![3]);

    h.board.set_category_filter(None);
    h.pump().await;

    let calls = h.api.calls_to(Endpoint::List).await;
    let RecordedCall::List(last) = calls.last().expect("list was called") else {
        panic!("expected a list call");
    };
    assert_eq!(last.params(), &[("priority", "high".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn test_slow_older_fetch_never_overwrites_newer() {
    let mut h = TestHarness::new();

    h.api
        .push_delay(Endpoint::List, Duration::from_millis(500))
        .await;
    h.board.refresh();
    tokio::task::yield_now().await;

    h.board.set_category_filter(Some(Category::Billing));

    // The filtered fetch lands first.
    h.pump().await;
    assert_eq!(h.ids(), vec![3]);
    assert!(!h.board.is_loading());

    // The unfiltered one lands later and is dropped.
    h.pump().await;
    assert_eq!(h.ids(), vec![3]);
}

#[tokio::test(start_paused = true)]
async fn test_advance_replaces_entry_in_place() {
    let mut h = TestHarness::new();
    h.load().await;

    let requested = h.board.advance_ticket(2).expect("ticket 2 can advance");
    assert_eq!(requested, Status::InProgress);
    h.pump().await;

    assert_eq!(h.ids(), vec![3, 2, 1]);
    assert_eq!(
        h.statuses(),
        vec![Status::Open, Status::InProgress, Status::Open]
    );

    let updates = h.api.calls_to(Endpoint::Update).await;
    let RecordedCall::Update { id, patch } = &updates[0] else {
        panic!("expected an update call");
    };
    assert_eq!(*id, 2);
    assert_eq!(
        serde_json::to_value(patch).expect("patch serializes"),
        serde_json::json!({"status": "in_progress"})
    );
}

#[tokio::test(start_paused = true)]
async fn test_advance_walks_to_closed() {
    let mut h = TestHarness::new();
    h.load().await;

    for expected in [Status::InProgress, Status::Resolved, Status::Closed] {
        assert_eq!(h.board.advance_ticket(1), Ok(expected));
        h.pump().await;
    }

    assert_eq!(h.board.tickets().get(1).map(|t| t.status), Some(Status::Closed));
    assert!(h.board.advance_ticket(1).is_err());
    assert_eq!(h.api.call_count(Endpoint::Update).await, 3);
}
