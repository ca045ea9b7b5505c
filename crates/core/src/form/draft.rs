//! Client-side ticket draft.

use thiserror::Error;

use crate::ticket::{Category, NewTicket, Priority, TITLE_MAX_CHARS};

/// Reasons a draft cannot be submitted yet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Title is required.")]
    TitleRequired,

    #[error("Title must be at most {max} characters (got {len}).", max = TITLE_MAX_CHARS)]
    TitleTooLong { len: usize },

    #[error("Description is required.")]
    DescriptionRequired,
}

/// A ticket being composed, before the server has seen it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftTicket {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
}

impl DraftTicket {
    /// Check the draft and build the creation request.
    pub fn to_new_ticket(&self) -> Result<NewTicket, DraftError> {
        if self.title.trim().is_empty() {
            return Err(DraftError::TitleRequired);
        }
        let len = self.title.chars().count();
        if len > TITLE_MAX_CHARS {
            return Err(DraftError::TitleTooLong { len });
        }
        if self.description.trim().is_empty() {
            return Err(DraftError::DescriptionRequired);
        }

        Ok(NewTicket {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            priority: self.priority,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == DraftTicket::default()
    }
}
