//! Testing utilities and a mock ticket service.
//!
//! Lets the coordinators be driven end to end without a running server.
//!
//! # Example
//!
//! ```rust,ignore
//! use helpdesk_core::testing::{fixtures, MockTicketApi};
//!
//! let api = Arc::new(MockTicketApi::with_tickets(vec![fixtures::ticket(1, "Login broken")]));
//! let mut board = TicketBoard::new(api.clone(), &TimingConfig::default());
//! board.refresh();
//! ```

mod mock_api;

pub use mock_api::{Endpoint, MockTicketApi, RecordedCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::ticket::{Category, NewTicket, Priority, Status, Ticket};

    /// Create an open, general, medium-priority ticket.
    pub fn ticket(id: i64, title: &str) -> Ticket {
        Ticket {
            id,
            title: title.to_string(),
            description: format!("Details about {}", title.to_lowercase()),
            category: Category::General,
            priority: Priority::Medium,
            status: Status::Open,
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
                .single()
                .unwrap_or_default()
                + chrono::Duration::minutes(id),
        }
    }

    /// Create a ticket with the given status.
    pub fn ticket_with_status(id: i64, title: &str, status: Status) -> Ticket {
        Ticket {
            status,
            ..ticket(id, title)
        }
    }

    /// Create a creation request with default category and priority.
    pub fn new_ticket(title: &str, description: &str) -> NewTicket {
        NewTicket {
            title: title.to_string(),
            description: description.to_string(),
            category: Category::General,
            priority: Priority::Medium,
        }
    }
}
