// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod config;
pub mod expense;
pub mod export;
pub mod ledger;
pub mod meeting;
pub mod pay;
pub mod payments;
pub mod roster;
pub mod shell;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::models::{Filters, MeetingFilter};
use crate::state::{KasPage, NoticeKind};
use crate::utils::{current_month, parse_month};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Value of an optional string argument; `None` also when the command does
/// not define it.
pub fn opt_str<'a>(m: &'a clap::ArgMatches, id: &str) -> Option<&'a str> {
    m.try_get_one::<String>(id)
        .ok()
        .flatten()
        .map(String::as_str)
}

pub fn req_str<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a str> {
    opt_str(m, id).with_context(|| format!("--{} is required", id))
}

/// Page filters from `--month`, `--meeting` and `--search`.
pub fn filters_from(m: &clap::ArgMatches) -> Result<Filters> {
    let month = match opt_str(m, "month") {
        Some(s) => parse_month(s)?,
        None => current_month(),
    };
    let meeting = match opt_str(m, "meeting") {
        Some(s) => s.parse::<MeetingFilter>().map_err(anyhow::Error::msg)?,
        None => MeetingFilter::All,
    };
    Ok(Filters {
        search: opt_str(m, "search").unwrap_or_default().trim().to_string(),
        meeting,
        month,
    })
}

/// Print and clear the page's pending notice.
pub fn print_notice(page: &mut KasPage) {
    if let Some(n) = page.take_notice() {
        match n.kind {
            NoticeKind::Success => println!("✔ {}", n.message),
            NoticeKind::Warning => eprintln!("! {}", n.message),
            NoticeKind::Error => eprintln!("✘ {}", n.message),
        }
    }
}
