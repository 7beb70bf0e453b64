// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived values over a snapshot, computed once per render pass.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{FinancialSummary, LedgerEntry, StudentLedgerRow, WeekdayStat};
use crate::state::{Selection, StatusTab};
use crate::utils::payment_rate;

pub fn unpaid_ids(rows: &[StudentLedgerRow]) -> BTreeSet<i64> {
    rows.iter().filter(|r| !r.is_paid()).map(|r| r.id).collect()
}

pub fn visible_students(rows: &[StudentLedgerRow], tab: StatusTab) -> Vec<&StudentLedgerRow> {
    rows.iter().filter(|r| tab.matches(r.status)).collect()
}

/// Header checkbox state: ticked only when every unpaid row is selected.
pub fn select_all_checked(selection: &Selection, rows: &[StudentLedgerRow]) -> bool {
    !selection.is_empty() && *selection.ids() == unpaid_ids(rows)
}

pub fn rate_badge(summary: &FinancialSummary) -> u32 {
    payment_rate(summary.paid_count, summary.unpaid_count)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceMismatch {
    pub date: NaiveDate,
    pub expected: Decimal,
    pub actual: Decimal,
}

/// Walk the ledger oldest-first and report every entry whose running balance
/// is not previous balance + income - expense.
pub fn check_running_balance(ledger: &[LedgerEntry]) -> Vec<BalanceMismatch> {
    let mut ordered: Vec<&LedgerEntry> = ledger.iter().collect();
    ordered.sort_by_key(|e| e.date);
    let mut previous = Decimal::ZERO;
    let mut out = Vec::new();
    for entry in ordered {
        let expected = previous + entry.income - entry.expense;
        if entry.balance != expected {
            out.push(BalanceMismatch {
                date: entry.date,
                expected,
                actual: entry.balance,
            });
        }
        previous = entry.balance;
    }
    out
}

/// Index of the weekday with the highest rate; the first one wins ties.
pub fn highest_rate(stats: &[WeekdayStat]) -> Option<usize> {
    let mut best: Option<(usize, Decimal)> = None;
    for (i, s) in stats.iter().enumerate() {
        match best {
            Some((_, rate)) if s.rate <= rate => {}
            _ => best = Some((i, s.rate)),
        }
    }
    best.map(|(i, _)| i)
}

pub fn weekday_highlights(stats: &[WeekdayStat]) -> Vec<bool> {
    let best = highest_rate(stats);
    (0..stats.len()).map(|i| Some(i) == best).collect()
}

/// Everything the payments table needs, derived in one go.
#[derive(Debug)]
pub struct PaymentsView<'a> {
    pub rows: Vec<&'a StudentLedgerRow>,
    pub selectable: BTreeSet<i64>,
    pub all_checked: bool,
    pub can_mark_paid: bool,
    pub rate: u32,
}

pub fn payments_view<'a>(
    rows: &'a [StudentLedgerRow],
    summary: &FinancialSummary,
    selection: &Selection,
    tab: StatusTab,
    meeting_selected: bool,
) -> PaymentsView<'a> {
    let selectable = unpaid_ids(rows);
    let all_checked = !selection.is_empty() && *selection.ids() == selectable;
    PaymentsView {
        rows: visible_students(rows, tab),
        selectable,
        all_checked,
        can_mark_paid: meeting_selected,
        rate: rate_badge(summary),
    }
}
