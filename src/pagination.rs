// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Paginator links as data.
//!
//! Laravel hands out `{url, label, active}` triples whose labels carry HTML
//! entities (`&laquo; Previous`). They are turned into a descriptor here and
//! the render layer decides what the buttons say.

use serde::{Deserialize, Serialize};

use crate::utils::sanitize_label;

/// A link exactly as the server sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub url: Option<String>,
    pub label: String,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "page")]
pub enum LinkKind {
    Previous,
    Next,
    Page(u32),
    Gap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationItem {
    pub kind: LinkKind,
    /// Page to request when followed; `None` when the link is disabled.
    pub target_page: Option<u32>,
    pub is_current: bool,
}

impl PaginationItem {
    pub fn label(&self) -> String {
        match self.kind {
            LinkKind::Previous => "« Previous".to_string(),
            LinkKind::Next => "Next »".to_string(),
            LinkKind::Page(n) => n.to_string(),
            LinkKind::Gap => "…".to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.target_page.is_some() && !self.is_current
    }
}

fn classify(label: &str) -> Option<LinkKind> {
    let text = sanitize_label(label);
    if text.starts_with('«') || text.to_lowercase().contains("previous") {
        return Some(LinkKind::Previous);
    }
    if text.ends_with('»') || text.to_lowercase().contains("next") {
        return Some(LinkKind::Next);
    }
    if text == "..." || text == "…" {
        return Some(LinkKind::Gap);
    }
    text.parse::<u32>().ok().map(LinkKind::Page)
}

fn page_of(url: &str) -> Option<u32> {
    let parsed = reqwest::Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
}

/// Build the descriptor; links with unrecognisable labels are dropped.
pub fn describe(links: &[PageLink]) -> Vec<PaginationItem> {
    links
        .iter()
        .filter_map(|link| {
            let kind = classify(&link.label)?;
            let target_page = match (&link.url, kind) {
                (Some(u), LinkKind::Page(n)) => Some(page_of(u).unwrap_or(n)),
                (Some(u), _) => page_of(u),
                (None, _) => None,
            };
            Some(PaginationItem {
                kind,
                target_page,
                is_current: link.active,
            })
        })
        .collect()
}

/// One-line footer: `« Previous  1 [2] 3 … 9  Next »`, disabled links in parentheses.
pub fn render_footer(items: &[PaginationItem]) -> String {
    items
        .iter()
        .map(|item| {
            let label = item.label();
            if item.is_current {
                format!("[{}]", label)
            } else if item.kind == LinkKind::Gap {
                label
            } else if item.target_page.is_none() {
                format!("({})", label)
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
