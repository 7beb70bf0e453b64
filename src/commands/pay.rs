// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};

use crate::backend::KasBackend;
use crate::commands::payments::{payments_table, summary_lines};
use crate::commands::{filters_from, print_notice, today};
use crate::state::KasPage;

pub fn handle(backend: &dyn KasBackend, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("one", sub)) => one(backend, sub)?,
        Some(("bulk", sub)) => bulk(backend, sub)?,
        _ => {}
    }
    Ok(())
}

fn one(backend: &dyn KasBackend, sub: &clap::ArgMatches) -> Result<()> {
    let Some(&student) = sub.get_one::<i64>("student") else {
        bail!("--student is required");
    };
    let filters = filters_from(sub)?;
    let mut page = KasPage::load(backend, &filters, today())?;
    if let Some(row) = page.snapshot().student(student) {
        if row.is_paid() {
            println!("{} has already paid for {}", row.name, filters.meeting);
            return Ok(());
        }
    }
    page.mark_paid(backend, student)?;
    print_notice(&mut page);
    println!("{}", summary_lines(page.snapshot()));
    Ok(())
}

fn bulk(backend: &dyn KasBackend, sub: &clap::ArgMatches) -> Result<()> {
    let filters = filters_from(sub)?;
    let mut page = KasPage::load(backend, &filters, today())?;
    if sub.get_flag("all-unpaid") {
        page.select_all_unpaid();
    } else if let Some(ids) = sub.get_many::<i64>("student") {
        for &id in ids {
            if !page.selection().contains(id) && !page.toggle_select(id) {
                eprintln!("! student {} is unknown or already paid; skipped", id);
            }
        }
    }
    let count = page.selection().len();
    page.bulk_mark_paid(backend)?;
    print_notice(&mut page);
    println!("Marked {} student(s) as paid for {}", count, filters.meeting);
    println!("{}", summary_lines(page.snapshot()));
    println!("{}", payments_table(&page));
    Ok(())
}
