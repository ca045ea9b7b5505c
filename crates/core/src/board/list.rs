//! The ticket collection shown by the list view.

use crate::ticket::Ticket;

/// Ordered tickets as last reported by the server.
///
/// Order is whatever the server returned; it is never re-sorted locally.
#[derive(Debug, Clone, Default)]
pub struct TicketList {
    tickets: Vec<Ticket>,
}

impl TicketList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with a fetch result.
    pub fn replace_all(&mut self, tickets: Vec<Ticket>) {
        self.tickets = tickets;
    }

    /// Swap in the server's copy of one ticket, keeping its position.
    ///
    /// Returns false if no ticket with that id is held (for example it was
    /// filtered out while the update was in flight).
    pub fn apply_update(&mut self, updated: Ticket) -> bool {
        match self.tickets.iter_mut().find(|t| t.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: i64) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    pub fn as_slice(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ticket> {
        self.tickets.iter()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use crate::ticket::Status;

    #[test]
    fn test_update_replaces_in_place() {
        let mut list = TicketList::new();
        list.replace_all(vec![fixtures::ticket(1, "A"), fixtures::ticket(2, "B")]);

        let updated = fixtures::ticket_with_status(2, "B", Status::InProgress);
        assert!(list.apply_update(updated));

        let view: Vec<_> = list.iter().map(|t| (t.id, t.status)).collect();
        assert_eq!(view, vec![(1, Status::Open), (2, Status::InProgress)]);
    }

    #[test]
    fn test_update_takes_whole_server_copy() {
        let mut list = TicketList::new();
        list.replace_all(vec![fixtures::ticket(1, "A")]);

        let mut updated = fixtures::ticket_with_status(1, "A (edited)", Status::Resolved);
        updated.description = "server side text".to_string();
        list.apply_update(updated.clone());

        assert_eq!(list.get(1), Some(&updated));
    }

    #[test]
    fn test_update_for_missing_id_is_ignored() {
        let mut list = TicketList::new();
        list.replace_all(vec![fixtures::ticket(1, "A")]);
        assert!(!list.apply_update(fixtures::ticket(9, "Z")));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_replace_all_keeps_server_order() {
        let mut list = TicketList::new();
        list.replace_all(vec![fixtures::ticket(3, "C"), fixtures::ticket(1, "A")]);
        let ids: Vec<_> = list.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1]);

        list.replace_all(Vec::new());
        assert!(list.is_empty());
    }
}
