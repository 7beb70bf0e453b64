// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use comfy_table::Table;

use crate::backend::KasBackend;
use crate::commands::{filters_from, print_notice, today};
use crate::selectors::check_running_balance;
use crate::models::{KasSnapshot, LedgerEntry, TransactionType};
use crate::state::{ExpandedDates, KasPage};
use crate::utils::{format_rupiah, maybe_print_json, parse_date, pretty_table};

pub fn handle(backend: &dyn KasBackend, m: &clap::ArgMatches) -> Result<()> {
    let filters = filters_from(m)?;
    let mut page = KasPage::load(backend, &filters, today())?;

    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &page.snapshot().ledger)? {
        return Ok(());
    }

    if m.get_flag("expand-all") {
        let dates: Vec<_> = page.snapshot().ledger.iter().map(|e| e.date).collect();
        for d in dates {
            page.toggle_expand(d);
        }
    } else if let Some(values) = m.get_many::<String>("expand") {
        for v in values {
            let d = parse_date(v)?;
            if !page.expanded().is_expanded(d) {
                page.toggle_expand(d);
            }
        }
    }

    print_notice(&mut page);
    warn_mismatches(&page.snapshot().ledger);
    println!("{}", ledger_table(page.snapshot(), page.expanded()));
    Ok(())
}

pub fn warn_mismatches(ledger: &[LedgerEntry]) {
    for bad in check_running_balance(ledger) {
        log::warn!(
            "running balance on {} is {} but entries add up to {}",
            bad.date,
            bad.actual,
            bad.expected
        );
        eprintln!(
            "! balance on {} reads {}, expected {}",
            bad.date,
            format_rupiah(bad.actual),
            format_rupiah(bad.expected)
        );
    }
}

/// Days newest first; an expanded day is followed by its transactions.
/// The last row carries the all-time totals.
pub fn ledger_table(snapshot: &KasSnapshot, expanded: &ExpandedDates) -> Table {
    let mut rows = Vec::new();
    for e in &snapshot.ledger {
        let open = expanded.is_expanded(e.date);
        rows.push(vec![
            format!("{} {}", if open { "▾" } else { "▸" }, e.display_date),
            format_rupiah(e.income),
            format_rupiah(e.expense),
            format_rupiah(e.balance),
        ]);
        if open {
            for t in &e.transactions {
                let amount = format_rupiah(t.amount);
                let (income, expense) = match t.kind {
                    TransactionType::Income => (amount, String::new()),
                    TransactionType::Expense => (String::new(), amount),
                };
                let category = t.category.as_deref().unwrap_or("");
                rows.push(vec![
                    format!("    {} {}", t.party(), category).trim_end().to_string(),
                    income,
                    expense,
                    String::new(),
                ]);
            }
        }
    }
    let totals = &snapshot.summary;
    rows.push(vec![
        "TOTAL".to_string(),
        format_rupiah(totals.total_income),
        format_rupiah(totals.total_expense),
        format_rupiah(totals.total_balance),
    ]);
    pretty_table(&["Date", "Income", "Expense", "Balance"], rows)
}
