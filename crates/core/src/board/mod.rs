//! Ticket list view state.

mod coordinator;
mod filter;
mod list;

pub use coordinator::{AdvanceError, BoardMessage, TicketBoard};
pub use filter::FilterState;
pub use list::TicketList;
