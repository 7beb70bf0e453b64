// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::models::PaymentStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveTab {
    #[default]
    Payments,
    Ledger,
}

impl FromStr for ActiveTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "payments" | "pembayaran" => Ok(ActiveTab::Payments),
            "ledger" | "buku-kas" => Ok(ActiveTab::Ledger),
            other => Err(format!("Unknown tab '{}' (use payments|ledger)", other)),
        }
    }
}

impl fmt::Display for ActiveTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveTab::Payments => write!(f, "payments"),
            ActiveTab::Ledger => write!(f, "ledger"),
        }
    }
}

/// Client-side narrowing of the payments table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTab {
    #[default]
    All,
    Paid,
    /// Everyone still owing or without a record, i.e. not `paid`.
    Unpaid,
}

impl StatusTab {
    pub fn matches(&self, status: PaymentStatus) -> bool {
        match self {
            StatusTab::All => true,
            StatusTab::Paid => status == PaymentStatus::Paid,
            StatusTab::Unpaid => status != PaymentStatus::Paid,
        }
    }
}

impl FromStr for StatusTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "semua" => Ok(StatusTab::All),
            "paid" | "lunas" => Ok(StatusTab::Paid),
            "unpaid" | "belum-bayar" => Ok(StatusTab::Unpaid),
            other => Err(format!("Unknown status '{}' (use all|paid|unpaid)", other)),
        }
    }
}

impl fmt::Display for StatusTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusTab::All => write!(f, "all"),
            StatusTab::Paid => write!(f, "paid"),
            StatusTab::Unpaid => write!(f, "unpaid"),
        }
    }
}
