//! Request sequencing so a late response cannot overwrite a newer render.

/// Identifies one issued load/poll request. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tickets and remembers the newest one applied.
///
/// A response is accepted only if its ticket is newer than every response
/// already applied; an older response that overtakes a newer one is still
/// accepted, since nothing newer has rendered yet.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: u64,
    applied: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Record `ticket` as applied if it is the newest seen. Returns `false` for stale tickets.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if ticket.0 > self.applied {
            self.applied = ticket.0;
            true
        } else {
            false
        }
    }

    /// Whether the most recently issued request has not been applied yet.
    pub fn is_pending(&self) -> bool {
        self.issued > self.applied
    }

    /// Treat every ticket issued so far as stale.
    pub fn invalidate(&mut self) {
        self.applied = self.issued;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_order_responses_apply() {
        let mut seq = RequestSequencer::new();
        let a = seq.issue();
        let b = seq.issue();
        assert!(seq.accept(a));
        assert!(seq.is_pending());
        assert!(seq.accept(b));
        assert!(!seq.is_pending());
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut seq = RequestSequencer::new();
        let old = seq.issue();
        let new = seq.issue();
        assert!(seq.accept(new));
        assert!(!seq.accept(old));
    }

    #[test]
    fn invalidated_tickets_are_dropped() {
        let mut seq = RequestSequencer::new();
        let in_flight = seq.issue();
        seq.invalidate();
        assert!(!seq.is_pending());
        let fresh = seq.issue();
        assert!(!seq.accept(in_flight));
        assert!(seq.accept(fresh));
    }

    #[test]
    fn replayed_ticket_is_dropped() {
        let mut seq = RequestSequencer::new();
        let t = seq.issue();
        assert!(seq.accept(t));
        assert!(!seq.accept(t));
    }
}
