//! User-adjustable ticket filters and their server query.

use crate::api::TicketQuery;
use crate::ticket::{Category, Priority, Status};

/// Which tickets the list should show. Every dimension is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub search: Option<String>,
}

impl FilterState {
    /// Server query for these filters; unset and empty fields are omitted.
    pub fn to_query(&self) -> TicketQuery {
        let mut query = TicketQuery::new();
        if let Some(category) = self.category {
            query.push("category", category.as_str());
        }
        if let Some(priority) = self.priority {
            query.push("priority", priority.as_str());
        }
        if let Some(status) = self.status {
            query.push("status", status.as_str());
        }
        if let Some(search) = &self.search {
            query.push("search", search.as_str());
        }
        query
    }

    /// True when no dimension constrains the list.
    pub fn is_unfiltered(&self) -> bool {
        self.to_query().is_empty()
    }
}
