// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Line-oriented session over one `KasPage`, so selections, expanded days
//! and half-filled forms survive between commands like they do on the page.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};

use crate::backend::KasBackend;
use crate::commands::ledger::{ledger_table, warn_mismatches};
use crate::commands::payments::{payments_table, summary_lines};
use crate::commands::{filters_from, today};
use crate::models::MeetingFilter;
use crate::state::forms::{ExpenseCategory, ReportKind};
use crate::state::page::ExportOutcome;
use crate::state::{ActiveTab, Applied, KasPage, NoticeKind, StatusTab};
use crate::utils::{parse_date, parse_decimal};

const HELP: &str = "\
show                      render the active tab
tab payments|ledger       switch tab
status all|paid|unpaid    narrow the payments table
meeting DATE|all          load a meeting
month YYYY-MM             load a month
search TEXT               edit the search box; `apply` runs it
reload                    fetch the page again
select ID...              toggle students in the bulk selection
select-all                toggle every unpaid student
pay ID                    mark one student as paid
pay-selected              mark the selection as paid
expand DATE               toggle a ledger day
expense open|set F V|submit|cancel      F: amount description category date
meeting-form open|set DATE|submit|cancel
export KIND [url|save [PATH]]           KIND: per-meeting monthly overall matrix
quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn handle(backend: &dyn KasBackend, m: &clap::ArgMatches) -> Result<()> {
    let filters = filters_from(m)?;
    let mut page = KasPage::load(backend, &filters, today())?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run(backend, &mut page, stdin.lock(), &mut stdout)
}

pub fn run<R: BufRead, W: Write>(
    backend: &dyn KasBackend,
    page: &mut KasPage,
    input: R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "{}", summary_lines(page.snapshot()))?;
    write_notice(page, out)?;
    write!(out, "kas> ")?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        match execute(backend, page, &line, out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                log::debug!("shell command '{}' failed: {:#}", line.trim(), e);
                // Failed requests already left a notice; guard errors did too.
                if page.notice(Instant::now()).is_none() {
                    writeln!(out, "✘ {:#}", e)?;
                }
            }
        }
        write_notice(page, out)?;
        write!(out, "kas> ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_notice<W: Write>(page: &mut KasPage, out: &mut W) -> Result<()> {
    let live = page.notice(Instant::now()).is_some();
    if let Some(n) = page.take_notice() {
        if live {
            let mark = match n.kind {
                NoticeKind::Success => "✔",
                NoticeKind::Warning => "!",
                NoticeKind::Error => "✘",
            };
            writeln!(out, "{} {}", mark, n.message)?;
        }
    }
    Ok(())
}

fn render<W: Write>(page: &KasPage, out: &mut W) -> Result<()> {
    writeln!(out, "{}", summary_lines(page.snapshot()))?;
    match page.tab() {
        ActiveTab::Payments => {
            writeln!(
                out,
                "{} selected{}",
                page.selection().len(),
                if page.is_bulk_processing() { " (processing)" } else { "" }
            )?;
            writeln!(out, "{}", payments_table(page))?;
        }
        ActiveTab::Ledger => {
            warn_mismatches(&page.snapshot().ledger);
            writeln!(out, "{}", ledger_table(page.snapshot(), page.expanded()))?;
        }
    }
    Ok(())
}

fn report<W: Write>(applied: Applied, page: &KasPage, out: &mut W) -> Result<()> {
    if applied == Applied::Applied {
        render(page, out)?;
    }
    Ok(())
}

/// Run one shell line against the page.
pub fn execute<W: Write>(
    backend: &dyn KasBackend,
    page: &mut KasPage,
    line: &str,
    out: &mut W,
) -> Result<Flow> {
    let line = line.trim();
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    match cmd {
        "" => {}
        "quit" | "exit" => return Ok(Flow::Quit),
        "help" | "?" => writeln!(out, "{}", HELP)?,
        "show" => render(page, out)?,
        "tab" => {
            let tab: ActiveTab = rest.parse().map_err(anyhow::Error::msg)?;
            page.set_tab(tab);
            render(page, out)?;
        }
        "status" => {
            let tab: StatusTab = rest.parse().map_err(anyhow::Error::msg)?;
            page.set_status_tab(tab);
            render(page, out)?;
        }
        "meeting" => {
            let meeting: MeetingFilter = rest.parse().map_err(anyhow::Error::msg)?;
            let applied = page.set_meeting(backend, meeting)?;
            report(applied, page, out)?;
        }
        "month" => {
            let applied = page.set_month(backend, rest)?;
            report(applied, page, out)?;
        }
        "search" => {
            page.set_search_draft(rest);
            writeln!(out, "search box: '{}' (type `apply`)", page.filters().search_draft())?;
        }
        "apply" => {
            let applied = page.apply_search(backend)?;
            report(applied, page, out)?;
        }
        "reload" => {
            let applied = page.reload(backend)?;
            report(applied, page, out)?;
        }
        "select" => {
            if args.is_empty() {
                bail!("usage: select ID...");
            }
            for a in args {
                let id: i64 = a.parse().with_context(|| format!("Invalid id '{}'", a))?;
                let was = page.selection().contains(id);
                let now = page.toggle_select(id);
                if !was && !now {
                    writeln!(out, "! student {} cannot be selected", id)?;
                }
            }
            writeln!(out, "{} selected", page.selection().len())?;
        }
        "select-all" => {
            page.select_all_toggle();
            writeln!(out, "{} selected", page.selection().len())?;
        }
        "pay" => {
            let id: i64 = rest
                .parse()
                .with_context(|| format!("Invalid id '{}'", rest))?;
            let applied = page.mark_paid(backend, id)?;
            report(applied, page, out)?;
        }
        "pay-selected" => {
            let applied = page.bulk_mark_paid(backend)?;
            report(applied, page, out)?;
        }
        "expand" => {
            let date = parse_date(rest)?;
            page.toggle_expand(date);
            page.set_tab(ActiveTab::Ledger);
            render(page, out)?;
        }
        "expense" => expense(backend, page, &args, rest, out)?,
        "meeting-form" => meeting_form(backend, page, &args, out)?,
        "export" => export(backend, page, &args, out)?,
        other => bail!("Unknown command '{}' (try `help`)", other),
    }
    Ok(Flow::Continue)
}

fn expense<W: Write>(
    backend: &dyn KasBackend,
    page: &mut KasPage,
    args: &[&str],
    rest: &str,
    out: &mut W,
) -> Result<()> {
    match args.first().copied() {
        Some("open") => {
            page.open_expense_form();
            let f = page.expense_form().fields();
            writeln!(
                out,
                "expense: amount={} description='{}' category={} date={}",
                f.amount.map(|a| a.to_string()).unwrap_or_default(),
                f.description,
                f.category.label(),
                f.period_date
            )?;
        }
        Some("set") => {
            let field = args.get(1).copied().unwrap_or_default();
            // The value is everything after the field name, spaces included.
            let value = rest
                .splitn(3, char::is_whitespace)
                .nth(2)
                .unwrap_or_default()
                .trim();
            let Some(fields) = page.expense_fields() else {
                bail!("Open the expense form first (`expense open`)");
            };
            match field {
                "amount" => fields.amount = Some(parse_decimal(value)?),
                "description" => fields.description = value.to_string(),
                "category" => {
                    fields.category = value
                        .parse::<ExpenseCategory>()
                        .map_err(anyhow::Error::msg)?
                }
                "date" => fields.period_date = parse_date(value)?,
                other => bail!("Unknown expense field '{}'", other),
            }
        }
        Some("submit") => match page.record_expense(backend) {
            Ok(applied) => report(applied, page, out)?,
            Err(e) => {
                for (field, msg) in page.expense_form().errors() {
                    writeln!(out, "  {}: {}", field, msg)?;
                }
                return Err(e.into());
            }
        },
        Some("cancel") => page.close_expense_form(),
        _ => bail!("usage: expense open|set FIELD VALUE|submit|cancel"),
    }
    Ok(())
}

fn meeting_form<W: Write>(
    backend: &dyn KasBackend,
    page: &mut KasPage,
    args: &[&str],
    out: &mut W,
) -> Result<()> {
    match args.first().copied() {
        Some("open") => page.open_meeting_form(),
        Some("set") => {
            let date = parse_date(args.get(1).copied().unwrap_or_default())?;
            let Some(fields) = page.meeting_fields() else {
                bail!("Open the meeting form first (`meeting-form open`)");
            };
            fields.period_date = Some(date);
        }
        Some("submit") => match page.create_meeting(backend) {
            Ok(applied) => report(applied, page, out)?,
            Err(e) => {
                for (field, msg) in page.meeting_form().errors() {
                    writeln!(out, "  {}: {}", field, msg)?;
                }
                return Err(e.into());
            }
        },
        Some("cancel") => page.close_meeting_form(),
        _ => bail!("usage: meeting-form open|set DATE|submit|cancel"),
    }
    Ok(())
}

fn export<W: Write>(
    backend: &dyn KasBackend,
    page: &mut KasPage,
    args: &[&str],
    out: &mut W,
) -> Result<()> {
    let kind: ReportKind = args
        .first()
        .copied()
        .unwrap_or("overall")
        .parse()
        .map_err(anyhow::Error::msg)?;
    let save = args.get(1).copied() == Some("save");
    page.open_export_form();
    page.choose_report(kind);
    match page.export(backend, save) {
        Ok(ExportOutcome::Url(url)) => writeln!(out, "{}", url)?,
        Ok(ExportOutcome::Document(doc)) => {
            let path = args
                .get(2)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(&doc.filename));
            std::fs::write(&path, &doc.bytes)
                .with_context(|| format!("Write {}", path.display()))?;
            writeln!(out, "saved {}", path.display())?;
        }
        Err(e) => {
            page.close_export_form();
            return Err(e.into());
        }
    }
    Ok(())
}
