//! Forward-only status lifecycle: open -> in_progress -> resolved -> closed.

use super::types::Status;

impl Status {
    /// The single legal successor, or `None` at the terminal status.
    pub fn next(self) -> Option<Status> {
        match self {
            Status::Open => Some(Status::InProgress),
            Status::InProgress => Some(Status::Resolved),
            Status::Resolved => Some(Status::Closed),
            Status::Closed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Caption for the "advance" affordance, e.g. "Mark as in progress".
    pub fn advance_label(self) -> Option<String> {
        self.next()
            .map(|next| format!("Mark as {}", next.label().to_lowercase()))
    }
}

/// Successor of a wire-level status literal; unrecognized literals have none.
pub fn next_status(current: &str) -> Option<Status> {
    current.parse::<Status>().ok().and_then(Status::next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_is_terminal() {
        assert_eq!(Status::Closed.next(), None);
        assert!(Status::Closed.is_terminal());
        assert!(!Status::Open.is_terminal());
    }

    #[test]
    fn test_each_status_has_unique_successor() {
        assert_eq!(Status::Open.next(), Some(Status::InProgress));
        assert_eq!(Status::InProgress.next(), Some(Status::Resolved));
        assert_eq!(Status::Resolved.next(), Some(Status::Closed));
    }

    #[test]
    fn test_walk_from_open_visits_full_flow() {
        let mut visited = Vec::new();
        let mut current = Status::Open;
        while let Some(next) = current.next() {
            visited.push(next);
            current = next;
        }
        assert_eq!(
            visited,
            vec![Status::InProgress, Status::Resolved, Status::Closed]
        );
        assert_eq!(current.next(), None);
    }

    #[test]
    fn test_successor_is_always_later_in_order() {
        for status in Status::ALL {
            if let Some(next) = status.next() {
                assert!(next > status);
            }
        }
    }

    #[test]
    fn test_next_status_from_literal() {
        assert_eq!(next_status("open"), Some(Status::InProgress));
        assert_eq!(next_status("closed"), None);
        assert_eq!(next_status("archived"), None);
        assert_eq!(next_status(""), None);
    }

    #[test]
    fn test_advance_label() {
        assert_eq!(
            Status::Open.advance_label().as_deref(),
            Some("Mark as in progress")
        );
        assert_eq!(Status::Closed.advance_label(), None);
    }
}
