//! Top-level page state: tabs and the single completion loop.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::TicketApi;
use crate::board::{BoardMessage, TicketBoard};
use crate::config::TimingConfig;
use crate::debounce::Debouncer;
use crate::form::{FormMessage, TicketForm};
use crate::stats::{StatsMessage, StatsPanel};
use crate::ticket::{ParseEnumError, Ticket};

const SWITCH_TAB_KEY: &str = "switch_tab";

/// Page tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Submit,
    List,
    Dashboard,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Submit, Tab::List, Tab::Dashboard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Submit => "submit",
            Tab::List => "list",
            Tab::Dashboard => "stats",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Submit => "Submit Ticket",
            Tab::List => "All Tickets",
            Tab::Dashboard => "Dashboard",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submit" => Ok(Tab::Submit),
            "list" => Ok(Tab::List),
            "stats" | "dashboard" => Ok(Tab::Dashboard),
            other => Err(ParseEnumError {
                kind: "tab",
                value: other.to_string(),
            }),
        }
    }
}

/// Any completion the page can receive.
#[derive(Debug)]
pub enum ShellMessage {
    Form(FormMessage),
    Board(BoardMessage),
    Stats(StatsMessage),
    /// The post-submit pause elapsed for the switch armed as `generation`.
    SwitchTab { tab: Tab, generation: u64 },
}

/// Owns the form, the board, and the dashboard.
pub struct AppShell {
    active: Tab,
    refresh_count: u64,
    tab_switch_delay: Duration,
    switch_generation: u64,
    /// Generation of the automatic switch still allowed to happen.
    armed_switch: Option<u64>,

    form: TicketForm,
    board: TicketBoard,
    stats: StatsPanel,

    debouncer: Debouncer<&'static str>,
    tx: mpsc::UnboundedSender<ShellMessage>,
    rx: mpsc::UnboundedReceiver<ShellMessage>,
}

impl AppShell {
    pub fn new(api: Arc<dyn TicketApi>, timing: &TimingConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            active: Tab::default(),
            refresh_count: 0,
            tab_switch_delay: timing.tab_switch_delay(),
            switch_generation: 0,
            armed_switch: None,
            form: TicketForm::new(Arc::clone(&api), timing),
            board: TicketBoard::new(Arc::clone(&api), timing),
            stats: StatsPanel::new(api),
            debouncer: Debouncer::new(),
            tx,
            rx,
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.active
    }

    /// Number of tickets created through this page.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    /// An automatic switch to the list is waiting.
    pub fn tab_switch_pending(&self) -> bool {
        self.armed_switch.is_some()
    }

    pub fn form(&self) -> &TicketForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TicketForm {
        &mut self.form
    }

    pub fn board(&self) -> &TicketBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut TicketBoard {
        &mut self.board
    }

    pub fn stats(&self) -> &StatsPanel {
        &self.stats
    }

    /// Operator tab selection. Cancels any pending automatic switch, even
    /// one whose timer has already fired.
    pub fn select_tab(&mut self, tab: Tab) {
        self.debouncer.cancel(&SWITCH_TAB_KEY);
        self.armed_switch = None;
        self.switch_to(tab);
    }

    /// Refetch whatever the active tab shows.
    pub fn refresh_active(&mut self) {
        match self.active {
            Tab::Submit => {}
            Tab::List => self.board.refresh(),
            Tab::Dashboard => self.stats.refresh(),
        }
    }

    /// Wait for the next completion from any part of the page.
    pub async fn next_message(&mut self) -> Option<ShellMessage> {
        tokio::select! {
            Some(message) = self.form.next_message() => Some(ShellMessage::Form(message)),
            Some(message) = self.board.next_message() => Some(ShellMessage::Board(message)),
            Some(message) = self.stats.next_message() => Some(ShellMessage::Stats(message)),
            Some(message) = self.rx.recv() => Some(message),
            else => None,
        }
    }

    /// Take a completion if one is already queued.
    pub fn try_next_message(&mut self) -> Option<ShellMessage> {
        if let Some(message) = self.form.try_next_message() {
            return Some(ShellMessage::Form(message));
        }
        if let Some(message) = self.board.try_next_message() {
            return Some(ShellMessage::Board(message));
        }
        if let Some(message) = self.stats.try_next_message() {
            return Some(ShellMessage::Stats(message));
        }
        self.rx.try_recv().ok()
    }

    /// Route a completion to its owner.
    pub fn handle(&mut self, message: ShellMessage) {
        match message {
            ShellMessage::Form(message) => {
                if let Some(ticket) = self.form.handle(message) {
                    self.ticket_created(&ticket);
                }
            }
            ShellMessage::Board(message) => self.board.handle(message),
            ShellMessage::Stats(message) => self.stats.handle(message),
            ShellMessage::SwitchTab { tab, generation } => {
                if self.armed_switch != Some(generation) {
                    debug!(generation, "Dropping cancelled tab switch");
                    return;
                }
                self.armed_switch = None;
                debug!(tab = %tab, "Automatic tab switch");
                self.switch_to(tab);
            }
        }
    }

    fn ticket_created(&mut self, ticket: &Ticket) {
        self.refresh_count += 1;
        info!(ticket_id = ticket.id, refresh_count = self.refresh_count, "Ticket created");
        self.refresh_active();

        self.switch_generation += 1;
        let generation = self.switch_generation;
        self.armed_switch = Some(generation);

        let tx = self.tx.clone();
        self.debouncer
            .schedule(SWITCH_TAB_KEY, self.tab_switch_delay, move || {
                let _ = tx.send(ShellMessage::SwitchTab {
                    tab: Tab::List,
                    generation,
                });
            });
    }

    fn switch_to(&mut self, tab: Tab) {
        if tab == self.active {
            return;
        }
        debug!(from = %self.active, to = %tab, "Switching tab");
        if self.active == Tab::Submit {
            self.form.discard();
        }
        self.active = tab;
        self.refresh_active();
    }
}
