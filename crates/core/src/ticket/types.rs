//! Core ticket data types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum title length accepted by the server.
pub const TITLE_MAX_CHARS: usize = 200;

/// Error returned when a wire literal does not name a known variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ============================================================================
// Category
// ============================================================================

/// What area of the product a ticket concerns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Billing,
    Technical,
    Account,
    #[default]
    General,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Billing,
        Category::Technical,
        Category::Account,
        Category::General,
    ];

    /// Wire literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Billing => "billing",
            Category::Technical => "technical",
            Category::Account => "account",
            Category::General => "general",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Billing => "Billing",
            Category::Technical => "Technical",
            Category::Account => "Account",
            Category::General => "General",
        }
    }

    /// Icon shown next to the category in the dashboard breakdown.
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Billing => "💳",
            Category::Technical => "🔧",
            Category::Account => "👤",
            Category::General => "📋",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("category", s))
    }
}

// ============================================================================
// Priority
// ============================================================================

/// How urgent a ticket is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    /// Wire literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }

    /// Badge color (hex).
    pub fn color(&self) -> &'static str {
        match self {
            Priority::Low => "#6c757d",
            Priority::Medium => "#0d6efd",
            Priority::High => "#fd7e14",
            Priority::Critical => "#dc3545",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("priority", s))
    }
}

// ============================================================================
// Status
// ============================================================================

/// Lifecycle position of a ticket.
///
/// Declaration order is the lifecycle order; see [`Status::next`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Open,
        Status::InProgress,
        Status::Resolved,
        Status::Closed,
    ];

    /// Wire literal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
            Status::Closed => "Closed",
        }
    }

    /// Badge color (hex).
    pub fn color(&self) -> &'static str {
        match self {
            Status::Open => "#198754",
            Status::InProgress => "#0d6efd",
            Status::Resolved => "#6c757d",
            Status::Closed => "#212529",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("status", s))
    }
}

/// Parse an optional filter value where the empty string means "no filter".
pub fn parse_filter<T: FromStr>(value: &str) -> Result<Option<T>, T::Err> {
    if value.is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

// ============================================================================
// Tickets
// ============================================================================

/// A ticket as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    /// Server-assigned identifier.
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

/// Body of a ticket creation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TicketPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl TicketPatch {
    /// A patch that changes only the status.
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Category/priority suggested by the server for a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationSuggestion {
    pub category: Category,
    pub priority: Priority,
}

// ============================================================================
// Stats
// ============================================================================

/// Aggregate statistics shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketStats {
    pub total_tickets: u64,
    pub open_tickets: u64,
    pub avg_tickets_per_day: f64,
    #[serde(default)]
    pub priority_breakdown: BTreeMap<Priority, u64>,
    #[serde(default)]
    pub category_breakdown: BTreeMap<Category, u64>,
}

/// One bar of a dashboard breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakdownRow {
    pub label: &'static str,
    pub count: u64,
    /// Share of all tickets, 0..=100.
    pub share_percent: f64,
}

impl TicketStats {
    pub fn priority_rows(&self) -> Vec<BreakdownRow> {
        Priority::ALL
            .iter()
            .map(|p| self.row(p.as_str(), self.priority_breakdown.get(p)))
            .collect()
    }

    pub fn category_rows(&self) -> Vec<BreakdownRow> {
        Category::ALL
            .iter()
            .map(|c| self.row(c.as_str(), self.category_breakdown.get(c)))
            .collect()
    }

    fn row(&self, label: &'static str, count: Option<&u64>) -> BreakdownRow {
        let count = count.copied().unwrap_or(0);
        let share_percent = if self.total_tickets == 0 {
            0.0
        } else {
            count as f64 / self.total_tickets as f64 * 100.0
        };
        BreakdownRow {
            label,
            count,
            share_percent,
        }
    }
}

/// Cut `text` to `max_chars` characters, appending `...` when shortened.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
