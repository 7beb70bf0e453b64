// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use std::collections::BTreeSet;

use common::{paid, snapshot};
use kasclip::selectors::{payments_view, select_all_checked, unpaid_ids, visible_students};
use kasclip::state::{Selection, StatusTab};

#[test]
fn paid_students_cannot_be_selected() {
    let s = snapshot();
    let mut sel = Selection::default();
    assert!(!sel.toggle(1, &s.students));
    assert!(!sel.toggle(42, &s.students));
    assert!(sel.is_empty());
}

#[test]
fn toggle_adds_then_removes() {
    let s = snapshot();
    let mut sel = Selection::default();
    assert!(sel.toggle(2, &s.students));
    assert!(sel.toggle(3, &s.students)); // no record yet counts as unpaid
    assert_eq!(sel.len(), 2);
    assert!(!sel.toggle(2, &s.students));
    assert!(!sel.contains(2));
    assert!(sel.contains(3));
}

#[test]
fn select_all_toggles_between_all_unpaid_and_none() {
    let s = snapshot();
    let mut sel = Selection::default();
    sel.select_all_toggle(&s.students);
    assert_eq!(*sel.ids(), BTreeSet::from([2, 3, 4]));
    assert!(select_all_checked(&sel, &s.students));

    sel.select_all_toggle(&s.students);
    assert!(sel.is_empty());
    assert!(!select_all_checked(&sel, &s.students));
}

#[test]
fn select_all_unpaid_is_idempotent() {
    let s = snapshot();
    let mut once = Selection::default();
    once.select_all_unpaid(&s.students);
    let mut twice = once.clone();
    twice.select_all_unpaid(&s.students);
    assert_eq!(once, twice);
}

#[test]
fn partial_selection_select_all_fills_it() {
    let s = snapshot();
    let mut sel = Selection::default();
    sel.toggle(4, &s.students);
    assert!(!select_all_checked(&sel, &s.students));
    sel.select_all_toggle(&s.students);
    assert_eq!(sel.len(), 3);
}

#[test]
fn selection_stays_within_unpaid_after_refresh() {
    let s = snapshot();
    let mut sel = Selection::default();
    sel.select_all_unpaid(&s.students);

    let fresh = paid(&[2, 4]);
    sel.retain_selectable(&fresh.students);
    assert_eq!(*sel.ids(), BTreeSet::from([3]));
    assert!(sel.ids().is_subset(&unpaid_ids(&fresh.students)));
}

#[test]
fn status_tabs_partition_rows() {
    let s = snapshot();
    let ids = |tab| {
        visible_students(&s.students, tab)
            .iter()
            .map(|r| r.id)
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(StatusTab::All), vec![1, 2, 3, 4]);
    assert_eq!(ids(StatusTab::Paid), vec![1]);
    assert_eq!(ids(StatusTab::Unpaid), vec![2, 3, 4]);
}

#[test]
fn payments_view_derives_everything_at_once() {
    let s = snapshot();
    let mut sel = Selection::default();
    sel.select_all_unpaid(&s.students);
    let view = payments_view(&s.students, &s.summary, &sel, StatusTab::Unpaid, true);
    assert_eq!(view.rows.len(), 3);
    assert!(view.all_checked);
    assert!(view.can_mark_paid);
    assert_eq!(view.rate, 33);
    assert_eq!(view.selectable, BTreeSet::from([2, 3, 4]));

    let none = payments_view(&s.students, &s.summary, &Selection::default(), StatusTab::All, false);
    assert!(!none.all_checked);
    assert!(!none.can_mark_paid);
}
