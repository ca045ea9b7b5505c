//! Ticket data model and status lifecycle.

mod status;
mod types;

pub use status::next_status;
pub use types::*;
