// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use kasclip::backend::HttpBackend;
use kasclip::config::ClientConfig;
use kasclip::{cli, commands, db};

fn main() -> Result<()> {
    env_logger::init();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Settings database at {}", db::db_path()?.display());
            return Ok(());
        }
        Some(("config", sub)) => return commands::config::handle(&conn, sub),
        _ => {}
    }

    let cfg = ClientConfig::load(&conn)?;
    log::debug!("using server {}", cfg.base_url);
    let backend = HttpBackend::new(&cfg)?;

    match matches.subcommand() {
        Some(("payments", sub)) => commands::payments::handle(&backend, sub)?,
        Some(("ledger", sub)) => commands::ledger::handle(&backend, sub)?,
        Some(("pay", sub)) => commands::pay::handle(&backend, sub)?,
        Some(("expense", sub)) => commands::expense::handle(&backend, sub)?,
        Some(("meeting", sub)) => commands::meeting::handle(&backend, sub)?,
        Some(("export", sub)) => commands::export::handle(&backend, sub)?,
        Some(("roster", sub)) => commands::roster::handle(&backend, sub)?,
        Some(("shell", sub)) => commands::shell::handle(&backend, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
