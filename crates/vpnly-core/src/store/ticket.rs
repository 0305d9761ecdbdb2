// ── Fetch tickets ──
//
// Every dispatched fetch takes a ticket. A response is applied only if its
// ticket is still the latest one issued for the same key; anything older
// is discarded on arrival.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::model::ResourceId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum TicketKey {
    /// A full list reload.
    All,
    /// A point fetch of one resource.
    One(ResourceId),
}

#[derive(Debug, Clone)]
pub(crate) struct Ticket {
    key: TicketKey,
    seq: u64,
}

impl Ticket {
    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }
}

pub(crate) struct FetchTickets {
    next: AtomicU64,
    latest: DashMap<TicketKey, u64>,
}

impl FetchTickets {
    pub(crate) fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
            latest: DashMap::new(),
        }
    }

    /// Issue a ticket that supersedes every earlier ticket for `key`.
    pub(crate) fn issue(&self, key: TicketKey) -> Ticket {
        // Sequence is drawn while the key's slot is locked so that, per
        // key, the stored value only ever increases.
        let mut slot = self.latest.entry(key.clone()).or_insert(0);
        let seq = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        *slot = seq;
        Ticket { key, seq }
    }

    pub(crate) fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest
            .get(&ticket.key)
            .is_some_and(|latest| *latest == ticket.seq)
    }

    /// Run `apply` only if `ticket` is still current. Issuing for the same
    /// key blocks until `apply` returns. `apply` must not touch `self`.
    pub(crate) fn apply_if_current(&self, ticket: &Ticket, apply: impl FnOnce()) -> bool {
        match self.latest.get(&ticket.key) {
            Some(latest) if *latest == ticket.seq => {
                apply();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(id: &str) -> TicketKey {
        TicketKey::One(ResourceId::new(id))
    }

    #[test]
    fn newer_ticket_supersedes_older_for_same_key() {
        let tickets = FetchTickets::new();
        let first = tickets.issue(one("vpn-1"));
        let second = tickets.issue(one("vpn-1"));
        assert!(!tickets.is_current(&first));
        assert!(tickets.is_current(&second));
        assert!(second.seq() > first.seq());
    }

    #[test]
    fn keys_are_independent() {
        let tickets = FetchTickets::new();
        let a = tickets.issue(one("vpn-a"));
        let b = tickets.issue(one("vpn-b"));
        let all = tickets.issue(TicketKey::All);
        assert!(tickets.is_current(&a));
        assert!(tickets.is_current(&b));
        assert!(tickets.is_current(&all));
    }

    #[test]
    fn apply_runs_only_for_current_ticket() {
        let tickets = FetchTickets::new();
        let stale = tickets.issue(one("vpn-1"));
        let fresh = tickets.issue(one("vpn-1"));

        let mut applied = Vec::new();
        assert!(!tickets.apply_if_current(&stale, || applied.push("stale")));
        assert!(tickets.apply_if_current(&fresh, || applied.push("fresh")));
        assert_eq!(applied, vec!["fresh"]);
    }
}
