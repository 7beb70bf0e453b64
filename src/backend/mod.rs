// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod http;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{KasError, KasResult};
use crate::models::{Filters, KasSnapshot, RosterSnapshot};
use crate::state::forms::{ExpenseCategory, ExpenseFields, FormFields, MeetingFields, ReportKind};

pub use http::HttpBackend;

pub const KAS_PATH: &str = "admin/kas";
pub const MARK_PAID_PATH: &str = "admin/kas/mark-paid";
pub const BULK_MARK_PAID_PATH: &str = "admin/kas/bulk-mark-paid";
pub const EXPENSE_PATH: &str = "admin/kas/expense";
pub const CREATE_MEETING_PATH: &str = "admin/kas/create-pertemuan";
pub const EXPORT_PATH: &str = "admin/kas/pdf";
pub const ROSTER_PATH: &str = "admin/mahasiswa";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkPaidRequest {
    #[serde(rename = "mahasiswa_id")]
    pub student_id: i64,
    pub period_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkMarkPaidRequest {
    #[serde(rename = "mahasiswa_ids")]
    pub student_ids: Vec<i64>,
    pub period_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseRequest {
    pub amount: Decimal,
    pub description: String,
    pub category: ExpenseCategory,
    pub period_date: NaiveDate,
}

impl ExpenseRequest {
    /// Only called on fields that passed their checks, so the amount is set.
    pub fn from_fields(fields: ExpenseFields) -> Self {
        Self {
            amount: fields.amount.unwrap_or_default(),
            description: fields.description.trim().to_string(),
            category: fields.category,
            period_date: fields.period_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateMeetingRequest {
    pub period_date: NaiveDate,
}

impl CreateMeetingRequest {
    pub fn from_fields(fields: MeetingFields) -> KasResult<Self> {
        match fields.period_date {
            Some(period_date) => Ok(Self { period_date }),
            None => Err(KasError::Invalid(fields.check())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRequest {
    pub kind: ReportKind,
    pub date: Option<NaiveDate>,
    pub month: Option<String>,
}

impl ExportRequest {
    /// Per-meeting reports need a concrete meeting; the rest read the month filter.
    pub fn from_filters(kind: ReportKind, filters: &Filters) -> KasResult<Self> {
        let (date, month) = match kind {
            ReportKind::PerMeeting => {
                let d = filters.meeting.date().ok_or(KasError::NoMeetingSelected)?;
                (Some(d), None)
            }
            ReportKind::Monthly | ReportKind::Matrix => (None, Some(filters.month.clone())),
            ReportKind::Overall => (None, None),
        };
        Ok(Self { kind, date, month })
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let kind = match self.kind {
            ReportKind::PerMeeting => "pertemuan",
            ReportKind::Monthly | ReportKind::Overall => "keseluruhan",
            ReportKind::Matrix => "matrix",
        };
        let mut pairs = vec![("type", kind.to_string())];
        if let Some(d) = self.date {
            pairs.push(("date", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(m) = &self.month {
            pairs.push(("month", m.clone()));
        }
        pairs
    }

    pub fn default_filename(&self) -> String {
        let tag = match (&self.date, &self.month) {
            (Some(d), _) => d.format("%Y-%m-%d").to_string(),
            (None, Some(m)) => m.clone(),
            (None, None) => "keseluruhan".to_string(),
        };
        format!("laporan-kas-{}.pdf", tag)
    }
}

#[derive(Debug, Clone)]
pub struct ExportDocument {
    pub url: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterQuery {
    pub search: String,
    pub class_name: Option<String>,
    pub page: u32,
}

impl RosterQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("search", self.search.clone()),
            (
                "kelas",
                self.class_name.clone().unwrap_or_else(|| "all".to_string()),
            ),
            ("page", self.page.max(1).to_string()),
        ]
    }
}

/// Everything the class-fund page asks of the server. Successful calls hand
/// back the fresh snapshot; validation problems come back as
/// [`KasError::Validation`].
pub trait KasBackend {
    fn load(&self, filters: &Filters) -> KasResult<KasSnapshot>;
    fn mark_paid(&self, req: &MarkPaidRequest) -> KasResult<KasSnapshot>;
    fn bulk_mark_paid(&self, req: &BulkMarkPaidRequest) -> KasResult<KasSnapshot>;
    fn record_expense(&self, req: &ExpenseRequest) -> KasResult<KasSnapshot>;
    fn create_meeting(&self, req: &CreateMeetingRequest) -> KasResult<KasSnapshot>;
    fn export_url(&self, req: &ExportRequest) -> KasResult<String>;
    fn download(&self, req: &ExportRequest) -> KasResult<ExportDocument>;
    fn roster(&self, query: &RosterQuery) -> KasResult<RosterSnapshot>;
}
