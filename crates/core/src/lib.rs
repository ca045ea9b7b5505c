pub mod api;
pub mod board;
pub mod config;
pub mod debounce;
pub mod form;
pub mod sequence;
pub mod shell;
pub mod stats;
pub mod testing;
pub mod ticket;

pub use api::{ApiError, HttpTicketApi, TicketApi, TicketQuery};
pub use board::{AdvanceError, BoardMessage, FilterState, TicketBoard, TicketList};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, ApiConfig, Config,
    ConfigError, TimingConfig,
};
pub use debounce::Debouncer;
pub use form::{DraftError, DraftTicket, FormMessage, FormNotice, SubmitError, TicketForm};
pub use sequence::RequestSeq;
pub use shell::{AppShell, ShellMessage, Tab};
pub use stats::{StatsMessage, StatsPanel};
pub use ticket::{
    next_status, parse_filter, truncate, Category, ClassificationSuggestion, NewTicket,
    ParseEnumError, Priority, Status, Ticket, TicketPatch, TicketStats,
};
