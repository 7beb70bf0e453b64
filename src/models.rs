// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FieldErrors;
use crate::pagination::PageLink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    Partial,
    #[serde(alias = "none")]
    NoRecord,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Lunas",
            PaymentStatus::Unpaid => "Belum Bayar",
            PaymentStatus::Partial => "Sebagian",
            PaymentStatus::NoRecord => "Belum Ada",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub period_date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLedgerRow {
    pub id: i64,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "nim")]
    pub student_number: String,
    #[serde(rename = "kelas", default)]
    pub class_name: Option<String>,
    pub total_paid: Decimal,
    pub total_unpaid: Decimal,
    pub status: PaymentStatus,
    #[serde(default)]
    pub records: Vec<PaymentRecord>,
}

impl StudentLedgerRow {
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_balance: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub period_income: Decimal,
    pub period_expense: Decimal,
    pub paid_count: u32,
    pub unpaid_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "mahasiswa", default)]
    pub student_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub status: PaymentStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub period_date: NaiveDate,
    pub period_display: String,
    pub created_at: String,
}

impl Transaction {
    /// Income rows show the paying student, expenses their description.
    pub fn party(&self) -> &str {
        let text = match (self.kind, &self.student_name) {
            (TransactionType::Income, Some(name)) => Some(name.as_str()),
            _ => self.description.as_deref(),
        };
        text.unwrap_or("-")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub display_date: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Meeting filter: the `all` sentinel or one concrete meeting date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MeetingFilter {
    #[default]
    All,
    Date(NaiveDate),
}

impl MeetingFilter {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            MeetingFilter::All => None,
            MeetingFilter::Date(d) => Some(*d),
        }
    }
}

impl FromStr for MeetingFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(MeetingFilter::All);
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(MeetingFilter::Date)
            .map_err(|_| format!("Invalid meeting '{}', expected YYYY-MM-DD or 'all'", s))
    }
}

impl TryFrom<String> for MeetingFilter {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MeetingFilter> for String {
    fn from(m: MeetingFilter) -> Self {
        m.to_string()
    }
}

impl fmt::Display for MeetingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeetingFilter::All => write!(f, "all"),
            MeetingFilter::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default)]
    pub search: String,
    #[serde(rename = "pertemuan", default)]
    pub meeting: MeetingFilter,
    pub month: String, // YYYY-MM
}

impl Filters {
    pub fn for_month(month: &str) -> Self {
        Self {
            search: String::new(),
            meeting: MeetingFilter::All,
            month: month.to_string(),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("search", self.search.clone()),
            ("pertemuan", self.meeting.to_string()),
            ("month", self.month.clone()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(default)]
    pub success: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Props of the admin class-fund page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KasSnapshot {
    #[serde(rename = "mahasiswaList", default)]
    pub students: Vec<StudentLedgerRow>,
    pub summary: FinancialSummary,
    #[serde(default)]
    pub ledger: Vec<LedgerEntry>,
    #[serde(rename = "pertemuanDates", default)]
    pub meeting_dates: Vec<NaiveDate>,
    pub filters: Filters,
    #[serde(rename = "kasAmount")]
    pub fee_per_meeting: Decimal,
    #[serde(default, deserialize_with = "crate::utils::lenient_errors")]
    pub errors: FieldErrors,
    #[serde(default)]
    pub flash: Flash,
}

impl KasSnapshot {
    pub fn student(&self, id: i64) -> Option<&StudentLedgerRow> {
        self.students.iter().find(|s| s.id == id)
    }
}

/// Envelope of every Inertia response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InertiaPage<P> {
    pub component: String,
    pub props: P,
    pub url: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterStudent {
    pub id: i64,
    #[serde(rename = "nim")]
    pub student_number: String,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "kelas", default)]
    pub class_name: Option<String>,
    #[serde(rename = "fakultas", default)]
    pub faculty: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub links: Vec<PageLink>,
    pub current_page: u32,
    pub last_page: u32,
    #[serde(default)]
    pub total: u64,
}

/// Props of the admin student roster page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSnapshot {
    #[serde(rename = "mahasiswa")]
    pub students: Paginated<RosterStudent>,
    #[serde(rename = "kelasList", default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub flash: Flash,
}

/// One bar of the weekday attendance distribution chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekdayStat {
    pub day: String,
    pub total: u64,
    pub present: u64,
    pub late: u64,
    pub rate: Decimal,
}
