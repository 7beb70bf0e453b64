// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{day, snapshot, snapshot_json, snapshot_with};
use kasclip::models::{InertiaPage, KasSnapshot, MeetingFilter, PaymentStatus, TransactionType};
use kasclip::selectors::unpaid_ids;
use rust_decimal::Decimal;
use serde_json::json;

#[test]
fn page_props_decode() {
    let s = snapshot();
    assert_eq!(s.students.len(), 4);
    assert_eq!(s.students[0].name, "Ayu Lestari");
    assert_eq!(s.students[0].records[0].amount, Decimal::from(5000));
    assert_eq!(s.students[2].status, PaymentStatus::NoRecord);
    assert_eq!(s.students[2].class_name, None);
    assert!(s.students[3].records.is_empty());
    assert_eq!(s.fee_per_meeting, Decimal::from(5000));
    assert_eq!(s.meeting_dates, vec![day(2025, 3, 3), day(2025, 3, 10)]);
    assert_eq!(s.filters.meeting, MeetingFilter::Date(day(2025, 3, 10)));
    assert!(s.errors.is_empty());
    assert_eq!(s.flash.success, None);
}

#[test]
fn transactions_name_their_party() {
    let s = snapshot();
    let tx = &s.ledger[0].transactions;
    assert_eq!(tx[0].kind, TransactionType::Income);
    assert_eq!(tx[0].party(), "Ayu Lestari");
    assert_eq!(tx[1].kind, TransactionType::Expense);
    assert_eq!(tx[1].party(), "Spidol dan kertas");
}

#[test]
fn partial_payments_decode_and_stay_selectable() {
    let s = snapshot_with(|v| {
        v["ledger"][0]["transactions"][0]["status"] = json!("partial");
        v["mahasiswaList"][1]["status"] = json!("partial");
        v["mahasiswaList"][1]["records"] = json!([
            {"id": 12, "amount": "2500.00", "status": "partial", "period_date": "2025-03-10", "description": null}
        ]);
    });
    assert_eq!(s.ledger[0].transactions[0].status, PaymentStatus::Partial);
    let budi = s.student(2).unwrap();
    assert_eq!(budi.status, PaymentStatus::Partial);
    assert_eq!(budi.records[0].status.label(), "Sebagian");
    assert!(!budi.is_paid());
    assert!(unpaid_ids(&s.students).contains(&2));
}

#[test]
fn meeting_filter_all_sentinel() {
    let s = snapshot_with(|v| v["filters"]["pertemuan"] = json!("all"));
    assert_eq!(s.filters.meeting, MeetingFilter::All);
    assert_eq!(s.filters.meeting.date(), None);
    assert_eq!(MeetingFilter::All.to_string(), "all");
    assert!("2025-02-30".parse::<MeetingFilter>().is_err());
}

#[test]
fn error_bag_takes_first_message() {
    let s = snapshot_with(|v| {
        v["errors"] = json!({
            "amount": ["The amount field is required.", "The amount must be a number."],
            "description": "Too long."
        })
    });
    assert_eq!(s.errors["amount"], "The amount field is required.");
    assert_eq!(s.errors["description"], "Too long.");
}

#[test]
fn missing_optional_props_default() {
    let s = snapshot_with(|v| {
        let o = v.as_object_mut().unwrap();
        o.remove("errors");
        o.remove("flash");
        o.remove("ledger");
    });
    assert!(s.errors.is_empty());
    assert!(s.ledger.is_empty());
    assert_eq!(s.flash, Default::default());
}

#[test]
fn inertia_envelope_wraps_props() {
    let page: InertiaPage<KasSnapshot> = serde_json::from_value(json!({
        "component": "admin/kas",
        "props": snapshot_json(),
        "url": "/admin/kas?pertemuan=2025-03-10",
        "version": "abc123"
    }))
    .unwrap();
    assert_eq!(page.component, "admin/kas");
    assert_eq!(page.version.as_deref(), Some("abc123"));
    assert_eq!(page.props.summary.paid_count, 1);
}

#[test]
fn student_lookup() {
    let s = snapshot();
    assert!(s.student(2).is_some_and(|r| !r.is_paid()));
    assert!(s.student(99).is_none());
}
