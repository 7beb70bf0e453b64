// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use chrono::NaiveDate;

/// Ledger rows showing their transactions. Starts fully collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedDates {
    dates: BTreeSet<NaiveDate>,
}

impl ExpandedDates {
    /// Returns whether `date` is expanded afterwards.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.dates.remove(&date) {
            false
        } else {
            self.dates.insert(date);
            true
        }
    }

    pub fn is_expanded(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn collapse_all(&mut self) {
        self.dates.clear();
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
