//! Operator command parsing.

use std::str::FromStr;

use thiserror::Error;

use helpdesk_core::{parse_filter, Category, Priority, Status, Tab};

pub const HELP: &str = "\
Commands:
  tab submit|list|stats                 switch tab
  title <text>                          set the draft title
  desc <text>                           set the draft description
  category <billing|technical|account|general>
  priority <low|medium|high|critical>
  submit                                send the draft
  search <text>                         search the list (empty clears)
  filter category|priority|status <value|all>
  advance <id>                          move a ticket to its next status
  refresh                               refetch the active tab
  show                                  redraw the active tab
  help                                  show this text
  quit                                  exit";

/// A structured list filter change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    Category(Option<Category>),
    Priority(Option<Priority>),
    Status(Option<Status>),
}

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tab(Tab),
    Title(String),
    Description(String),
    Category(Category),
    Priority(Priority),
    Submit,
    Search(String),
    Filter(FilterChange),
    Advance(i64),
    Refresh,
    Show,
    Help,
    Quit,
}

/// Why a line could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} (type `help` for usage)")]
pub struct CommandError(pub String);

fn invalid(message: impl Into<String>) -> CommandError {
    CommandError(message.into())
}

/// `all` and the empty string both mean "no filter".
fn filter_value<T: FromStr>(value: &str) -> Result<Option<T>, T::Err> {
    if value.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        parse_filter(value)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb {
            "tab" => rest
                .parse()
                .map(Command::Tab)
                .map_err(|e| invalid(format!("{e}"))),
            "title" => Ok(Command::Title(rest.to_string())),
            "desc" | "description" => Ok(Command::Description(rest.to_string())),
            "category" => rest
                .parse()
                .map(Command::Category)
                .map_err(|e| invalid(format!("{e}"))),
            "priority" => rest
                .parse()
                .map(Command::Priority)
                .map_err(|e| invalid(format!("{e}"))),
            "submit" => Ok(Command::Submit),
            "search" => Ok(Command::Search(rest.to_string())),
            "filter" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let value = value.trim();
                let change = match field {
                    "category" => filter_value(value).map(FilterChange::Category),
                    "priority" => filter_value(value).map(FilterChange::Priority),
                    "status" => filter_value(value).map(FilterChange::Status),
                    other => return Err(invalid(format!("Unknown filter: {other:?}"))),
                };
                change
                    .map(Command::Filter)
                    .map_err(|e| invalid(format!("{e}")))
            }
            "advance" => rest
                .trim_start_matches('#')
                .parse()
                .map(Command::Advance)
                .map_err(|_| invalid(format!("Not a ticket id: {rest:?}"))),
            "refresh" => Ok(Command::Refresh),
            "show" | "" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(invalid(format!("Unknown command: {other:?}"))),
        }
    }
}
