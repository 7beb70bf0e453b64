// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::backend::KasBackend;
use crate::commands::{filters_from, print_notice, req_str, today};
use crate::state::KasPage;
use crate::utils::parse_date;

pub fn handle(backend: &dyn KasBackend, m: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(req_str(m, "date")?)?;
    let filters = filters_from(m)?;
    let mut page = KasPage::load(backend, &filters, today())?;
    page.open_meeting_form();
    page.meeting_fields()
        .context("meeting form did not open")?
        .period_date = Some(date);
    page.create_meeting(backend)?;
    print_notice(&mut page);
    println!(
        "Meetings this month: {}",
        page.snapshot()
            .meeting_dates
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}
