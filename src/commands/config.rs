// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::commands::req_str;
use crate::config::{set_value, unset_value, ClientConfig, ConfigKey};
use crate::utils::pretty_table;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key: ConfigKey = req_str(sub, "key")?.parse()?;
            let stored = set_value(conn, key, req_str(sub, "value")?)?;
            if key == ConfigKey::Cookie || key == ConfigKey::XsrfToken {
                println!("{} updated", key);
            } else {
                println!("{} = {}", key, stored);
            }
        }
        Some(("unset", sub)) => {
            let key: ConfigKey = req_str(sub, "key")?.parse()?;
            if unset_value(conn, key)? {
                println!("{} reset to default", key);
            } else {
                println!("{} was not set", key);
            }
        }
        Some(("show", _)) | None => {
            let cfg = ClientConfig::load(conn)?;
            let rows = cfg
                .display_rows()
                .into_iter()
                .map(|(k, v)| vec![k.name().to_string(), v, k.env_var().to_string()])
                .collect();
            println!("{}", pretty_table(&["Key", "Value", "Override"], rows));
        }
        _ => {}
    }
    Ok(())
}
