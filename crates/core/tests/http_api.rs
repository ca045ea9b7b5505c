//! HTTP client integration tests against a stub ticket service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_test::{assert_err, assert_ok};

use helpdesk_core::{
    ApiConfig, ApiError, Category, HttpTicketApi, NewTicket, Priority, Status, TicketApi,
    TicketPatch, TicketQuery,
};

#[derive(Default)]
struct Stub {
    queries: Vec<Option<String>>,
    patches: HashMap<i64, Value>,
}

type Shared = Arc<Mutex<Stub>>;

fn ticket_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Ticket {id}"),
        "description": "Something is wrong",
        "category": "technical",
        "priority": "high",
        "status": status,
        "created_at": "2024-03-01T10:15:30.123456Z",
        "updated_at": "2024-03-02T08:00:00Z"
    })
}

async fn list(State(stub): State<Shared>, RawQuery(query): RawQuery) -> Json<Value> {
    stub.lock().unwrap().queries.push(query);
    Json(json!([ticket_json(2, "open"), ticket_json(1, "closed")]))
}

async fn create(Json(body): Json<Value>) -> impl IntoResponse {
    if body["title"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"title": ["This field may not be blank."]})),
        );
    }
    let mut created = ticket_json(7, "open");
    created["title"] = body["title"].clone();
    created["category"] = body["category"].clone();
    created["priority"] = body["priority"].clone();
    (StatusCode::CREATED, Json(created))
}

async fn update(
    State(stub): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if id != 2 {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."})));
    }
    stub.lock().unwrap().patches.insert(id, body.clone());
    let status = body["status"].as_str().unwrap_or("open").to_string();
    (StatusCode::OK, Json(ticket_json(id, &status)))
}

async fn stats() -> Json<Value> {
    Json(json!({
        "total_tickets": 12,
        "open_tickets": 5,
        "avg_tickets_per_day": 1.7,
        "priority_breakdown": {"low": 2, "medium": 4, "high": 5, "critical": 1},
        "category_breakdown": {"billing": 3, "technical": 6, "account": 1, "general": 2}
    }))
}

async fn classify(Json(body): Json<Value>) -> impl IntoResponse {
    let description = body["description"].as_str().unwrap_or_default();
    if description.contains("outage") {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "LLM unavailable"})),
        );
    }
    if description.contains("vague") {
        return (StatusCode::OK, Json(json!({"suggested_category": "billing"})));
    }
    if description.contains("odd") {
        return (
            StatusCode::OK,
            Json(json!({"suggested_category": "refunds", "suggested_priority": "high"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"suggested_category": "billing", "suggested_priority": "critical"})),
    )
}

/// Serve the stub on an ephemeral port; returns the client and shared state.
async fn start_stub() -> (HttpTicketApi, Shared) {
    let shared = Shared::default();
    let app = Router::new()
        .route("/api/tickets/", get(list).post(create))
        .route("/api/tickets/stats/", get(stats))
        .route("/api/tickets/classify/", post(classify))
        .route("/api/tickets/{id}/", patch(update))
        .with_state(shared.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server failed");
    });

    let api = HttpTicketApi::new(&ApiConfig {
        base_url: format!("http://{addr}/"),
        timeout_secs: 5,
    })
    .expect("Failed to build client");
    (api, shared)
}

#[tokio::test]
async fn test_list_sends_only_set_filters() {
    let (api, stub) = start_stub().await;

    let mut query = TicketQuery::new();
    query.push("category", "");
    query.push("priority", "high");
    query.push("search", "vpn drops");
    let tickets = assert_ok!(api.list_tickets(&query).await);
    assert_ok!(api.list_tickets(&TicketQuery::new()).await);

    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].id, 2);
    assert_eq!(tickets[1].status, Status::Closed);

    let queries = stub.lock().unwrap().queries.clone();
    assert_eq!(
        queries,
        vec![Some("priority=high&search=vpn%20drops".to_string()), None]
    );
}

#[tokio::test]
async fn test_create_returns_server_ticket() {
    let (api, _stub) = start_stub().await;

    let created = assert_ok!(
        api.create_ticket(&NewTicket {
            title: "Card declined".to_string(),
            description: "Payment fails at checkout".to_string(),
            category: Category::Billing,
            priority: Priority::Critical,
        })
        .await
    );

    assert_eq!(created.id, 7);
    assert_eq!(created.status, Status::Open);
    assert_eq!(created.category, Category::Billing);
    assert_eq!(created.priority, Priority::Critical);
}

#[tokio::test]
async fn test_create_rejection_is_status_error() {
    let (api, _stub) = start_stub().await;

    let err = assert_err!(
        api.create_ticket(&NewTicket {
            title: String::new(),
            description: "d".to_string(),
            category: Category::General,
            priority: Priority::Medium,
        })
        .await
    );

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("may not be blank"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_update_sends_status_only() {
    let (api, stub) = start_stub().await;

    let updated = assert_ok!(
        api.update_ticket(2, &TicketPatch::status(Status::InProgress))
            .await
    );
    assert_eq!(updated.status, Status::InProgress);
    assert_eq!(
        stub.lock().unwrap().patches.get(&2),
        Some(&json!({"status": "in_progress"}))
    );

    let err = assert_err!(api.update_ticket(99, &TicketPatch::status(Status::Closed)).await);
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_stats_decode() {
    let (api, _stub) = start_stub().await;

    let stats = assert_ok!(api.fetch_stats().await);
    assert_eq!(stats.total_tickets, 12);
    assert_eq!(stats.open_tickets, 5);
    assert_eq!(stats.priority_breakdown.get(&Priority::High), Some(&5));
    assert_eq!(stats.category_breakdown.get(&Category::Technical), Some(&6));
}

#[tokio::test]
async fn test_classify_outcomes() {
    let (api, _stub) = start_stub().await;

    let suggestion = assert_ok!(api.classify("I was billed twice this month").await);
    let suggestion = suggestion.expect("full suggestion");
    assert_eq!(suggestion.category, Category::Billing);
    assert_eq!(suggestion.priority, Priority::Critical);

    assert_eq!(assert_ok!(api.classify("total outage right now").await), None);
    assert_eq!(assert_ok!(api.classify("something vague here").await), None);
    assert_eq!(assert_ok!(api.classify("an odd category").await), None);
}

#[tokio::test]
async fn test_unreachable_service_is_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpTicketApi::new(&ApiConfig {
        base_url: format!("http://{addr}"),
        timeout_secs: 2,
    })
    .unwrap();

    let err = assert_err!(api.fetch_stats().await);
    assert!(matches!(err, ApiError::ConnectionFailed(_)));
}
