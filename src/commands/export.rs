// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::backend::KasBackend;
use crate::commands::{filters_from, opt_str, today};
use crate::state::forms::ReportKind;
use crate::state::page::ExportOutcome;
use crate::state::KasPage;

pub fn handle(backend: &dyn KasBackend, m: &clap::ArgMatches) -> Result<()> {
    let kind = opt_str(m, "report")
        .unwrap_or("overall")
        .parse::<ReportKind>()
        .map_err(anyhow::Error::msg)?;
    let filters = filters_from(m)?;
    let mut page = KasPage::load(backend, &filters, today())?;
    page.open_export_form();
    page.choose_report(kind);

    let url_only = m.get_flag("url-only");
    match page.export(backend, !url_only)? {
        ExportOutcome::Url(url) => println!("{}", url),
        ExportOutcome::Document(doc) => {
            let path = opt_str(m, "out")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(&doc.filename));
            fs::write(&path, &doc.bytes)
                .with_context(|| format!("Write {}", path.display()))?;
            println!(
                "Saved {} report ({} bytes) to {}",
                kind,
                doc.bytes.len(),
                path.display()
            );
        }
    }
    Ok(())
}
