// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client settings: stored in the `settings` table, overridable per process
//! with `KASCLIP_*` environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{get_setting, set_setting, unset_setting};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BaseUrl,
    TimeoutSecs,
    Cookie,
    XsrfToken,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::BaseUrl,
        ConfigKey::TimeoutSecs,
        ConfigKey::Cookie,
        ConfigKey::XsrfToken,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base_url",
            ConfigKey::TimeoutSecs => "timeout_secs",
            ConfigKey::Cookie => "cookie",
            ConfigKey::XsrfToken => "xsrf_token",
        }
    }

    pub fn env_var(&self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "KASCLIP_BASE_URL",
            ConfigKey::TimeoutSecs => "KASCLIP_TIMEOUT_SECS",
            ConfigKey::Cookie => "KASCLIP_COOKIE",
            ConfigKey::XsrfToken => "KASCLIP_XSRF_TOKEN",
        }
    }

    fn is_secret(&self) -> bool {
        matches!(self, ConfigKey::Cookie | ConfigKey::XsrfToken)
    }

    /// Reject values the client could never use.
    pub fn validate(&self, value: &str) -> Result<String> {
        let v = value.trim();
        match self {
            ConfigKey::BaseUrl => {
                reqwest::Url::parse(v).with_context(|| format!("Invalid base_url '{}'", v))?;
                Ok(v.trim_end_matches('/').to_string())
            }
            ConfigKey::TimeoutSecs => {
                let n: u64 = v
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs '{}'", v))?;
                if n == 0 {
                    bail!("timeout_secs must be at least 1");
                }
                Ok(n.to_string())
            }
            ConfigKey::Cookie | ConfigKey::XsrfToken => {
                if v.is_empty() {
                    bail!("{} may not be empty; use `config unset` instead", self);
                }
                Ok(v.to_string())
            }
        }
    }
}

impl FromStr for ConfigKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "base_url" => Ok(ConfigKey::BaseUrl),
            "timeout_secs" | "timeout" => Ok(ConfigKey::TimeoutSecs),
            "cookie" => Ok(ConfigKey::Cookie),
            "xsrf_token" | "xsrf" => Ok(ConfigKey::XsrfToken),
            other => bail!(
                "Unknown config key '{}' (use base_url|timeout_secs|cookie|xsrf_token)",
                other
            ),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub cookie: Option<String>,
    pub xsrf_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cookie: None,
            xsrf_token: None,
        }
    }
}

impl ClientConfig {
    /// Stored settings, then `KASCLIP_*` overrides from the environment.
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut cfg = Self::from_db(conn)?;
        cfg.apply_overrides(|k| env::var(k.env_var()).ok())?;
        Ok(cfg)
    }

    pub fn from_db(conn: &Connection) -> Result<Self> {
        let mut cfg = Self::default();
        for key in ConfigKey::ALL {
            if let Some(v) = get_setting(conn, key.name())? {
                cfg.put(key, &v)?;
            }
        }
        Ok(cfg)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(ConfigKey) -> Option<String>,
    {
        for key in ConfigKey::ALL {
            if let Some(v) = lookup(key).filter(|v| !v.trim().is_empty()) {
                log::debug!("{} overridden from {}", key, key.env_var());
                self.put(key, &v)
                    .with_context(|| format!("from {}", key.env_var()))?;
            }
        }
        Ok(())
    }

    fn put(&mut self, key: ConfigKey, raw: &str) -> Result<()> {
        let v = key.validate(raw)?;
        match key {
            ConfigKey::BaseUrl => self.base_url = v,
            ConfigKey::TimeoutSecs => self.timeout_secs = v.parse()?,
            ConfigKey::Cookie => self.cookie = Some(v),
            ConfigKey::XsrfToken => self.xsrf_token = Some(v),
        }
        Ok(())
    }

    /// Rows for `config show`; secrets are masked.
    pub fn display_rows(&self) -> Vec<(ConfigKey, String)> {
        ConfigKey::ALL
            .iter()
            .map(|k| {
                let value = match k {
                    ConfigKey::BaseUrl => Some(self.base_url.clone()),
                    ConfigKey::TimeoutSecs => Some(self.timeout_secs.to_string()),
                    ConfigKey::Cookie => self.cookie.clone(),
                    ConfigKey::XsrfToken => self.xsrf_token.clone(),
                };
                let shown = match value {
                    None => "-".to_string(),
                    Some(v) if k.is_secret() => mask(&v),
                    Some(v) => v,
                };
                (*k, shown)
            })
            .collect()
    }
}

fn mask(v: &str) -> String {
    let n = v.chars().count();
    if n <= 8 {
        return "*".repeat(n);
    }
    let head: String = v.chars().take(4).collect();
    format!("{}…({} chars)", head, n)
}

pub fn set_value(conn: &Connection, key: ConfigKey, value: &str) -> Result<String> {
    let v = key.validate(value)?;
    set_setting(conn, key.name(), &v)?;
    Ok(v)
}

pub fn unset_value(conn: &Connection, key: ConfigKey) -> Result<bool> {
    unset_setting(conn, key.name())
}
