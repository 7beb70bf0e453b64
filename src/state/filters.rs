// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

use crate::error::{FieldErrors, KasError, KasResult};
use crate::models::{Filters, MeetingFilter};

/// Filters echoed by the server plus the search text typed but not yet applied.
#[derive(Debug, Clone)]
pub struct FilterState {
    applied: Filters,
    search_draft: String,
}

impl FilterState {
    pub fn new(applied: Filters) -> Self {
        let search_draft = applied.search.clone();
        Self {
            applied,
            search_draft,
        }
    }

    pub fn applied(&self) -> &Filters {
        &self.applied
    }

    pub fn search_draft(&self) -> &str {
        &self.search_draft
    }

    pub fn set_search_draft(&mut self, text: &str) {
        self.search_draft = text.to_string();
    }

    pub fn apply_search(&self) -> Filters {
        Filters {
            search: self.search_draft.trim().to_string(),
            ..self.applied.clone()
        }
    }

    pub fn with_meeting(&self, meeting: MeetingFilter) -> Filters {
        Filters {
            meeting,
            ..self.applied.clone()
        }
    }

    pub fn with_month(&self, month: &str) -> KasResult<Filters> {
        let month = month.trim();
        if NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").is_err() {
            let mut errors = FieldErrors::new();
            errors.insert("month".into(), format!("'{}' is not a YYYY-MM month", month));
            return Err(KasError::Invalid(errors));
        }
        Ok(Filters {
            month: month.to_string(),
            ..self.applied.clone()
        })
    }

    /// Take the server's echo; the draft survives so typing is not lost.
    pub fn sync(&mut self, echoed: &Filters) {
        self.applied = echoed.clone();
    }

    pub fn require_meeting(&self) -> KasResult<NaiveDate> {
        self.applied.meeting.date().ok_or(KasError::NoMeetingSelected)
    }
}
