// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::backend::KasBackend;
use crate::commands::payments::summary_lines;
use crate::commands::{filters_from, opt_str, print_notice, req_str, today};
use crate::state::forms::ExpenseCategory;
use crate::state::KasPage;
use crate::utils::{format_rupiah, parse_date, parse_decimal};

pub fn handle(backend: &dyn KasBackend, m: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(req_str(m, "amount")?)?;
    let description = req_str(m, "description")?.to_string();
    let category = opt_str(m, "category")
        .unwrap_or("pengeluaran")
        .parse::<ExpenseCategory>()
        .map_err(anyhow::Error::msg)?;
    let period_date = match opt_str(m, "date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };

    let filters = filters_from(m)?;
    let mut page = KasPage::load(backend, &filters, today())?;
    page.open_expense_form();
    {
        let fields = page
            .expense_fields()
            .context("expense form did not open")?;
        fields.amount = Some(amount);
        fields.description = description;
        fields.category = category;
        fields.period_date = period_date;
    }
    page.record_expense(backend)?;
    print_notice(&mut page);
    println!(
        "Recorded {} expense of {} on {}",
        category.label(),
        format_rupiah(amount),
        period_date
    );
    println!("{}", summary_lines(page.snapshot()));
    Ok(())
}
