//! Ticket submission form.

mod coordinator;
mod draft;

pub use coordinator::{
    FormMessage, FormNotice, SubmitError, TicketForm, SUBMIT_FAILURE_MESSAGE,
    SUBMIT_SUCCESS_MESSAGE,
};
pub use draft::{DraftError, DraftTicket};
