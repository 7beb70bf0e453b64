// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{all_filters, day, meeting_filters, snapshot, today, Call, FakeBackend};
use kasclip::backend::{
    BulkMarkPaidRequest, CreateMeetingRequest, ExpenseRequest, ExportRequest, MarkPaidRequest,
};
use kasclip::error::{FieldErrors, KasError};
use kasclip::models::Filters;
use kasclip::state::forms::{ExpenseCategory, ExpenseFields, MeetingFields, ReportKind};
use kasclip::state::page::ExportOutcome;
use kasclip::state::{FormPhase, KasPage, NoticeKind};
use rust_decimal::Decimal;
use serde_json::json;

fn page_with(filters: Filters) -> (KasPage, FakeBackend) {
    let backend = FakeBackend::new(snapshot());
    let page = KasPage::load(&backend, &filters, today()).unwrap();
    backend.calls.borrow_mut().clear();
    (page, backend)
}

fn fill_expense(page: &mut KasPage) {
    page.open_expense_form();
    let f = page.expense_fields().unwrap();
    f.amount = Some(Decimal::from(15000));
    f.description = "Spidol dan kertas".into();
    f.category = ExpenseCategory::Perlengkapan;
    f.period_date = day(2025, 3, 10);
}

#[test]
fn closed_form_cannot_submit() {
    let (mut page, backend) = page_with(meeting_filters());
    assert!(matches!(
        page.record_expense(&backend),
        Err(KasError::FormNotOpen)
    ));
    assert!(page.expense_fields().is_none());
    assert_eq!(backend.call_count(), 0);
}

#[test]
fn expense_input_is_checked_before_sending() {
    let (mut page, backend) = page_with(meeting_filters());
    page.open_expense_form();
    page.expense_fields().unwrap().amount = Some(Decimal::ZERO);

    let err = page.record_expense(&backend).unwrap_err();
    let errors = err.field_errors().unwrap();
    assert!(errors.contains_key("amount"));
    assert!(errors.contains_key("description"));
    assert_eq!(backend.call_count(), 0);
    assert_eq!(page.expense_form().phase(), FormPhase::Editing);
    assert_eq!(page.expense_form().errors(), errors);
}

#[test]
fn long_description_is_rejected() {
    let (mut page, backend) = page_with(meeting_filters());
    fill_expense(&mut page);
    page.expense_fields().unwrap().description = "x".repeat(256);
    assert!(matches!(page.record_expense(&backend), Err(KasError::Invalid(_))));
    assert_eq!(backend.call_count(), 0);
}

#[test]
fn expense_success_closes_and_resets() {
    let (mut page, backend) = page_with(meeting_filters());
    fill_expense(&mut page);
    page.record_expense(&backend).unwrap();

    assert_eq!(
        backend.calls(),
        vec![Call::Expense(ExpenseRequest {
            amount: Decimal::from(15000),
            description: "Spidol dan kertas".into(),
            category: ExpenseCategory::Perlengkapan,
            period_date: day(2025, 3, 10),
        })]
    );
    assert_eq!(page.expense_form().phase(), FormPhase::Closed);
    assert_eq!(*page.expense_form().fields(), ExpenseFields::new(today()));
}

#[test]
fn server_validation_keeps_what_was_typed() {
    let (mut page, backend) = page_with(meeting_filters());
    fill_expense(&mut page);
    let mut errors = FieldErrors::new();
    errors.insert("amount".into(), "Saldo kas tidak mencukupi.".into());
    backend.push(Err(KasError::Validation(errors)));

    assert!(page.record_expense(&backend).is_err());
    assert_eq!(page.expense_form().phase(), FormPhase::Editing);
    assert_eq!(
        page.expense_form().errors()["amount"],
        "Saldo kas tidak mencukupi."
    );
    assert_eq!(page.expense_form().fields().description, "Spidol dan kertas");
    // Field errors show under the inputs, not as a toast.
    assert!(page.take_notice().is_none());
}

#[test]
fn fields_are_locked_while_submitting() {
    let (mut page, _backend) = page_with(meeting_filters());
    fill_expense(&mut page);
    let (ticket, _req) = page.begin_record_expense().unwrap();
    assert!(page.expense_form().is_processing());
    assert!(page.expense_fields().is_none());
    assert!(matches!(
        page.begin_record_expense(),
        Err(KasError::Busy(_))
    ));
    page.complete_record_expense(ticket, Ok(snapshot())).unwrap();
    assert!(!page.expense_form().is_open());
}

#[test]
fn cancel_keeps_the_buffer() {
    let (mut page, _backend) = page_with(meeting_filters());
    fill_expense(&mut page);
    page.close_expense_form();
    assert!(!page.expense_form().is_open());
    page.open_expense_form();
    assert_eq!(page.expense_fields().unwrap().amount, Some(Decimal::from(15000)));
}

#[test]
fn meeting_needs_a_date() {
    let (mut page, backend) = page_with(all_filters());
    page.open_meeting_form();
    let err = page.create_meeting(&backend).unwrap_err();
    assert!(err.field_errors().unwrap().contains_key("period_date"));
    assert_eq!(backend.call_count(), 0);

    page.meeting_fields().unwrap().period_date = Some(day(2025, 3, 17));
    page.create_meeting(&backend).unwrap();
    assert_eq!(
        backend.calls(),
        vec![Call::Meeting(CreateMeetingRequest {
            period_date: day(2025, 3, 17)
        })]
    );
    assert!(!page.meeting_form().is_open());
    assert_eq!(page.meeting_form().fields().period_date, None);
}

#[test]
fn meeting_request_takes_the_chosen_date() {
    let fields = MeetingFields {
        period_date: Some(day(2025, 3, 17)),
    };
    assert_eq!(
        CreateMeetingRequest::from_fields(fields).unwrap(),
        CreateMeetingRequest {
            period_date: day(2025, 3, 17)
        }
    );
    match CreateMeetingRequest::from_fields(MeetingFields::default()) {
        Err(KasError::Invalid(errors)) => assert!(errors.contains_key("period_date")),
        other => panic!("expected Invalid, got {:?}", other),
    }
}

#[test]
fn per_meeting_report_needs_a_meeting() {
    let (mut page, backend) = page_with(all_filters());
    page.open_export_form();
    page.choose_report(ReportKind::PerMeeting);
    assert!(matches!(
        page.export(&backend, false),
        Err(KasError::NoMeetingSelected)
    ));
    assert_eq!(backend.call_count(), 0);
    assert_eq!(page.take_notice().unwrap().kind, NoticeKind::Warning);
    assert!(page.export_form().is_open());
}

#[test]
fn monthly_report_url_uses_month_filter() {
    let (mut page, backend) = page_with(all_filters());
    page.open_export_form();
    page.choose_report(ReportKind::Monthly);
    match page.export(&backend, false).unwrap() {
        ExportOutcome::Url(url) => {
            assert_eq!(url, "http://kas.test/admin/kas/pdf?type=keseluruhan&month=2025-03")
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(!page.export_form().is_open());
}

#[test]
fn per_meeting_download_is_named_after_the_date() {
    let (mut page, backend) = page_with(meeting_filters());
    page.open_export_form();
    page.choose_report(ReportKind::PerMeeting);
    match page.export(&backend, true).unwrap() {
        ExportOutcome::Document(doc) => {
            assert_eq!(doc.filename, "laporan-kas-2025-03-10.pdf");
            assert!(doc.bytes.starts_with(b"%PDF"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn report_queries_and_names() {
    let f = meeting_filters();
    let overall = ExportRequest::from_filters(ReportKind::Overall, &f).unwrap();
    assert_eq!(overall.query_pairs(), vec![("type", "keseluruhan".to_string())]);
    assert_eq!(overall.default_filename(), "laporan-kas-keseluruhan.pdf");

    let matrix = ExportRequest::from_filters(ReportKind::Matrix, &f).unwrap();
    assert_eq!(
        matrix.query_pairs(),
        vec![("type", "matrix".to_string()), ("month", "2025-03".to_string())]
    );
    assert_eq!(matrix.default_filename(), "laporan-kas-2025-03.pdf");

    let meeting = ExportRequest::from_filters(ReportKind::PerMeeting, &f).unwrap();
    assert_eq!(
        meeting.query_pairs(),
        vec![("type", "pertemuan".to_string()), ("date", "2025-03-10".to_string())]
    );
}

#[test]
fn payloads_use_server_field_names() {
    let one = serde_json::to_value(MarkPaidRequest {
        student_id: 2,
        period_date: day(2025, 3, 10),
    })
    .unwrap();
    assert_eq!(one, json!({"mahasiswa_id": 2, "period_date": "2025-03-10"}));

    let bulk = serde_json::to_value(BulkMarkPaidRequest {
        student_ids: vec![2, 4],
        period_date: day(2025, 3, 10),
    })
    .unwrap();
    assert_eq!(bulk, json!({"mahasiswa_ids": [2, 4], "period_date": "2025-03-10"}));

    let expense = serde_json::to_value(ExpenseRequest {
        amount: Decimal::from(15000),
        description: "Spidol".into(),
        category: ExpenseCategory::Kegiatan,
        period_date: day(2025, 3, 10),
    })
    .unwrap();
    assert_eq!(expense["category"], "kegiatan");
    assert_eq!(expense["description"], "Spidol");
}
