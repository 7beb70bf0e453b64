// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::state::Slot;

/// Field name -> first error message, as delivered in the Inertia `errors` bag.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum KasError {
    #[error("Select a meeting date first before marking payments as paid")]
    NoMeetingSelected,

    #[error("No students selected")]
    EmptySelection,

    #[error("A request for {0} is already in flight")]
    Busy(Slot),

    #[error("The form is not open")]
    FormNotOpen,

    #[error("Invalid input: {}", ErrorList(.0))]
    Invalid(FieldErrors),

    #[error("Server rejected the request: {}", ErrorList(.0))]
    Validation(FieldErrors),

    #[error("Server error: {0}")]
    Server(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("No page data found in response from {0}")]
    MissingPage(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL '{url}': {reason}")]
    BadUrl { url: String, reason: String },

    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

impl KasError {
    /// Guard failures are raised before any request is sent.
    pub fn is_guard(&self) -> bool {
        matches!(
            self,
            KasError::NoMeetingSelected
                | KasError::EmptySelection
                | KasError::Busy(_)
                | KasError::FormNotOpen
                | KasError::Invalid(_)
        )
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            KasError::Invalid(e) | KasError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

struct ErrorList<'a>(&'a FieldErrors);

impl fmt::Display for ErrorList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, msg) in self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {msg}")?;
            first = false;
        }
        Ok(())
    }
}

pub type KasResult<T> = Result<T, KasError>;
