// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use crate::models::StudentLedgerRow;
use crate::selectors::unpaid_ids;

/// Students checked for a bulk action. Paid rows never get in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<i64>,
}

impl Selection {
    /// Flip `id`; returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: i64, rows: &[StudentLedgerRow]) -> bool {
        if self.ids.remove(&id) {
            return false;
        }
        let selectable = rows.iter().any(|r| r.id == id && !r.is_paid());
        if selectable {
            self.ids.insert(id);
        }
        selectable
    }

    pub fn select_all_unpaid(&mut self, rows: &[StudentLedgerRow]) {
        self.ids = unpaid_ids(rows);
    }

    /// Header checkbox: clear when everything unpaid is already selected.
    pub fn select_all_toggle(&mut self, rows: &[StudentLedgerRow]) {
        let unpaid = unpaid_ids(rows);
        if !self.ids.is_empty() && self.ids == unpaid {
            self.ids.clear();
        } else {
            self.ids = unpaid;
        }
    }

    pub fn retain_selectable(&mut self, rows: &[StudentLedgerRow]) {
        let unpaid = unpaid_ids(rows);
        self.ids.retain(|id| unpaid.contains(id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &BTreeSet<i64> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
