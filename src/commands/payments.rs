// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use comfy_table::Table;

use crate::backend::KasBackend;
use crate::commands::{filters_from, print_notice, today};
use crate::models::KasSnapshot;
use crate::state::{KasPage, StatusTab};
use crate::utils::{format_rupiah, maybe_print_json, pretty_table};

pub fn handle(backend: &dyn KasBackend, m: &clap::ArgMatches) -> Result<()> {
    let filters = filters_from(m)?;
    let status = match m.get_one::<String>("status") {
        Some(s) => s.parse::<StatusTab>().map_err(anyhow::Error::msg)?,
        None => StatusTab::All,
    };
    let mut page = KasPage::load(backend, &filters, today())?;
    page.set_status_tab(status);

    let view = page.payments_view();
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &view.rows)? {
        return Ok(());
    }
    print_notice(&mut page);
    println!("{}", summary_lines(page.snapshot()));
    println!("{}", payments_table(&page));
    Ok(())
}

pub fn summary_lines(s: &KasSnapshot) -> String {
    let sum = &s.summary;
    let meeting = s.filters.meeting.to_string();
    let mut out = format!(
        "Month {}  meeting {}  fee {}\n",
        s.filters.month,
        meeting,
        format_rupiah(s.fee_per_meeting)
    );
    out.push_str(&format!(
        "Balance {}  (income {}, expense {})\n",
        format_rupiah(sum.total_balance),
        format_rupiah(sum.total_income),
        format_rupiah(sum.total_expense)
    ));
    out.push_str(&format!(
        "This month: in {}  out {}\n",
        format_rupiah(sum.period_income),
        format_rupiah(sum.period_expense)
    ));
    out.push_str(&format!(
        "Paid {} / unpaid {}  ({}% paid)",
        sum.paid_count,
        sum.unpaid_count,
        crate::selectors::rate_badge(sum)
    ));
    out
}

/// Rows as the payments tab shows them: status tab applied, selection marked.
pub fn payments_table(page: &KasPage) -> Table {
    let view = page.payments_view();
    let rows = view
        .rows
        .iter()
        .map(|r| {
            let mark = if page.selection().contains(r.id) {
                "[x]"
            } else if view.selectable.contains(&r.id) {
                "[ ]"
            } else {
                ""
            };
            vec![
                mark.to_string(),
                r.id.to_string(),
                r.student_number.clone(),
                r.name.clone(),
                r.class_name.clone().unwrap_or_else(|| "-".into()),
                r.status.label().to_string(),
                format_rupiah(r.total_paid),
                format_rupiah(r.total_unpaid),
            ]
        })
        .collect();
    let check = if view.all_checked { "[x]" } else { "[ ]" };
    pretty_table(
        &[check, "ID", "NIM", "Name", "Class", "Status", "Paid", "Owing"],
        rows,
    )
}
