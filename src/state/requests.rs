// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{HashMap, HashSet};
use std::fmt;

/// One logical operation on the page. Responses compete only within a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Navigation,
    MarkPaid(i64),
    BulkMarkPaid,
    Expense,
    Meeting,
    Export,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Navigation => write!(f, "navigation"),
            Slot::MarkPaid(id) => write!(f, "mark-paid #{}", id),
            Slot::BulkMarkPaid => write!(f, "bulk mark-paid"),
            Slot::Expense => write!(f, "expense form"),
            Slot::Meeting => write!(f, "meeting form"),
            Slot::Export => write!(f, "export"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub slot: Slot,
    pub generation: u64,
    /// Issue order across all slots.
    pub seq: u64,
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: HashMap<Slot, u64>,
    in_flight: HashSet<Slot>,
    next_seq: u64,
    applied_seq: u64,
}

impl RequestTracker {
    pub fn begin(&mut self, slot: Slot) -> Ticket {
        let generation = self.latest.entry(slot).or_insert(0);
        *generation += 1;
        self.next_seq += 1;
        self.in_flight.insert(slot);
        Ticket {
            slot,
            generation: *generation,
            seq: self.next_seq,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.get(&ticket.slot) == Some(&ticket.generation)
    }

    pub fn in_flight(&self, slot: Slot) -> bool {
        self.in_flight.contains(&slot)
    }

    /// Settle a response. Returns false when a newer request for the slot exists.
    pub fn finish(&mut self, ticket: &Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight.remove(&ticket.slot);
        true
    }

    /// A snapshot may replace the current one only if it was requested later,
    /// or if it `supersedes` the view on screen (a navigation to new filters).
    pub fn accept_snapshot(&mut self, ticket: &Ticket, supersedes: bool) -> bool {
        if ticket.seq <= self.applied_seq && !supersedes {
            return false;
        }
        self.applied_seq = self.applied_seq.max(ticket.seq);
        true
    }
}
