// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Modal forms: create-meeting, record-expense, export options.
//!
//! Every modal runs the same small machine:
//! `Closed -> Editing -> Submitting -> Closed` on success, or back to
//! `Editing` with field errors on failure. Input is buffered in the form and
//! never touches the page snapshot.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FieldErrors, KasError, KasResult};
use crate::state::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Closed,
    Editing,
    Submitting,
}

pub trait FormFields: Clone {
    /// Constraints the input controls themselves enforce (required, min).
    fn check(&self) -> FieldErrors;
}

#[derive(Debug, Clone)]
pub struct ModalForm<F> {
    slot: Slot,
    initial: F,
    fields: F,
    phase: FormPhase,
    errors: FieldErrors,
}

impl<F: FormFields> ModalForm<F> {
    pub fn new(slot: Slot, initial: F) -> Self {
        Self {
            slot,
            fields: initial.clone(),
            initial,
            phase: FormPhase::Closed,
            errors: FieldErrors::new(),
        }
    }

    pub fn open(&mut self) {
        if self.phase == FormPhase::Closed {
            self.phase = FormPhase::Editing;
        }
    }

    /// Cancel keeps whatever was typed for the next open.
    pub fn close(&mut self) {
        self.phase = FormPhase::Closed;
        self.errors.clear();
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Closed
    }

    pub fn is_processing(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    /// Editable only while the modal shows and nothing is in flight.
    pub fn fields_mut(&mut self) -> Option<&mut F> {
        match self.phase {
            FormPhase::Editing => Some(&mut self.fields),
            _ => None,
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn begin_submit(&mut self) -> KasResult<F> {
        match self.phase {
            FormPhase::Closed => return Err(KasError::FormNotOpen),
            FormPhase::Submitting => return Err(KasError::Busy(self.slot)),
            FormPhase::Editing => {}
        }
        let problems = self.fields.check();
        if !problems.is_empty() {
            self.errors = problems.clone();
            return Err(KasError::Invalid(problems));
        }
        self.errors.clear();
        self.phase = FormPhase::Submitting;
        Ok(self.fields.clone())
    }

    pub fn succeed(&mut self) {
        self.phase = FormPhase::Closed;
        self.fields = self.initial.clone();
        self.errors.clear();
    }

    pub fn fail(&mut self, errors: FieldErrors) {
        self.phase = FormPhase::Editing;
        self.errors = errors;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    #[default]
    Pengeluaran,
    Kegiatan,
    Perlengkapan,
    Lainnya,
}

impl ExpenseCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Pengeluaran => "Pengeluaran Umum",
            ExpenseCategory::Kegiatan => "Kegiatan Kelas",
            ExpenseCategory::Perlengkapan => "Perlengkapan",
            ExpenseCategory::Lainnya => "Lainnya",
        }
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pengeluaran" | "general" => Ok(ExpenseCategory::Pengeluaran),
            "kegiatan" | "activity" => Ok(ExpenseCategory::Kegiatan),
            "perlengkapan" | "supplies" => Ok(ExpenseCategory::Perlengkapan),
            "lainnya" | "other" => Ok(ExpenseCategory::Lainnya),
            other => Err(format!(
                "Unknown category '{}' (use pengeluaran|kegiatan|perlengkapan|lainnya)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseFields {
    pub amount: Option<Decimal>,
    pub description: String,
    pub category: ExpenseCategory,
    pub period_date: NaiveDate,
}

impl ExpenseFields {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            amount: None,
            description: String::new(),
            category: ExpenseCategory::default(),
            period_date: today,
        }
    }
}

impl FormFields for ExpenseFields {
    fn check(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match self.amount {
            Some(a) if a >= Decimal::ONE => {}
            _ => {
                errors.insert("amount".into(), "Amount must be at least 1".into());
            }
        }
        let description = self.description.trim();
        if description.is_empty() {
            errors.insert("description".into(), "Description is required".into());
        } else if description.chars().count() > 255 {
            errors.insert(
                "description".into(),
                "Description may not exceed 255 characters".into(),
            );
        }
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingFields {
    pub period_date: Option<NaiveDate>,
}

impl FormFields for MeetingFields {
    fn check(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.period_date.is_none() {
            errors.insert("period_date".into(), "Meeting date is required".into());
        }
        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    PerMeeting,
    Monthly,
    #[default]
    Overall,
    Matrix,
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "per-meeting" | "pertemuan" => Ok(ReportKind::PerMeeting),
            "monthly" | "bulanan" => Ok(ReportKind::Monthly),
            "overall" | "keseluruhan" => Ok(ReportKind::Overall),
            "matrix" => Ok(ReportKind::Matrix),
            other => Err(format!(
                "Unknown report '{}' (use per-meeting|monthly|overall|matrix)",
                other
            )),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::PerMeeting => write!(f, "per-meeting"),
            ReportKind::Monthly => write!(f, "monthly"),
            ReportKind::Overall => write!(f, "overall"),
            ReportKind::Matrix => write!(f, "matrix"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportFields {
    pub kind: ReportKind,
}

impl FormFields for ExportFields {
    fn check(&self) -> FieldErrors {
        FieldErrors::new()
    }
}
