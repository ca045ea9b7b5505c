//! Ticket service client abstraction.
//!
//! This module provides a `TicketApi` trait covering the endpoints of the
//! ticket HTTP service, and an `HttpTicketApi` implementation over reqwest.

mod http;
mod types;

pub use http::HttpTicketApi;
pub use types::*;
