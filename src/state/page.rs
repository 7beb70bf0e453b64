// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The class-fund page controller.
//!
//! `KasPage` owns the latest server snapshot plus all local state: filters,
//! bulk selection, expanded ledger dates, tabs, the three modal forms and the
//! flash notice. It never edits the snapshot. Every server round trip is split
//! into `begin_*`, which checks guards and hands out a [`Ticket`] with the
//! request to send, and `complete_*`, which applies the response only if the
//! ticket is still the latest for its slot. The plain `mark_paid`,
//! `record_expense`, ... methods do both around a [`KasBackend`] call.

use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::backend::{
    BulkMarkPaidRequest, CreateMeetingRequest, ExpenseRequest, ExportDocument, ExportRequest,
    KasBackend, MarkPaidRequest,
};
use crate::error::{FieldErrors, KasError, KasResult};
use crate::models::{Filters, Flash, KasSnapshot, MeetingFilter};
use crate::selectors::{payments_view, PaymentsView};
use crate::state::forms::{ExportFields, ExpenseFields, MeetingFields, ReportKind};
use crate::state::{
    ActiveTab, ExpandedDates, FilterState, ModalForm, RequestTracker, Selection, Slot, StatusTab,
    Ticket,
};

pub const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub shown_at: Instant,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= TOAST_TTL
    }
}

fn notice_from_flash(flash: Flash) -> Option<Notice> {
    match flash {
        Flash {
            error: Some(msg), ..
        } => Some(Notice::new(NoticeKind::Error, msg)),
        Flash {
            success: Some(msg),
            ..
        } => Some(Notice::new(NoticeKind::Success, msg)),
        _ => None,
    }
}

/// Whether a response changed the page or lost to a newer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Discarded,
}

#[derive(Debug, Clone)]
pub enum ExportOutcome {
    Url(String),
    Document(ExportDocument),
}

#[derive(Debug)]
pub struct KasPage {
    snapshot: KasSnapshot,
    filters: FilterState,
    selection: Selection,
    expanded: ExpandedDates,
    tab: ActiveTab,
    status_tab: StatusTab,
    expense_form: ModalForm<ExpenseFields>,
    meeting_form: ModalForm<MeetingFields>,
    export_form: ModalForm<ExportFields>,
    requests: RequestTracker,
    notice: Option<Notice>,
}

impl KasPage {
    pub fn new(mut snapshot: KasSnapshot, today: NaiveDate) -> Self {
        let notice = notice_from_flash(std::mem::take(&mut snapshot.flash));
        Self {
            filters: FilterState::new(snapshot.filters.clone()),
            snapshot,
            selection: Selection::default(),
            expanded: ExpandedDates::default(),
            tab: ActiveTab::default(),
            status_tab: StatusTab::default(),
            expense_form: ModalForm::new(Slot::Expense, ExpenseFields::new(today)),
            meeting_form: ModalForm::new(Slot::Meeting, MeetingFields::default()),
            export_form: ModalForm::new(Slot::Export, ExportFields::default()),
            requests: RequestTracker::default(),
            notice,
        }
    }

    pub fn load<B: KasBackend + ?Sized>(
        backend: &B,
        filters: &Filters,
        today: NaiveDate,
    ) -> KasResult<Self> {
        let snapshot = backend.load(filters)?;
        Ok(Self::new(snapshot, today))
    }

    pub fn snapshot(&self) -> &KasSnapshot {
        &self.snapshot
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn expanded(&self) -> &ExpandedDates {
        &self.expanded
    }

    pub fn tab(&self) -> ActiveTab {
        self.tab
    }

    pub fn status_tab(&self) -> StatusTab {
        self.status_tab
    }

    pub fn expense_form(&self) -> &ModalForm<ExpenseFields> {
        &self.expense_form
    }

    pub fn meeting_form(&self) -> &ModalForm<MeetingFields> {
        &self.meeting_form
    }

    pub fn export_form(&self) -> &ModalForm<ExportFields> {
        &self.export_form
    }

    pub fn payments_view(&self) -> PaymentsView<'_> {
        payments_view(
            &self.snapshot.students,
            &self.snapshot.summary,
            &self.selection,
            self.status_tab,
            self.filters.applied().meeting != MeetingFilter::All,
        )
    }

    /// The current notice unless its display time is over.
    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| !n.is_expired(now))
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn is_bulk_processing(&self) -> bool {
        self.requests.in_flight(Slot::BulkMarkPaid)
    }

    // ---- local presentation state, no requests ----

    pub fn set_tab(&mut self, tab: ActiveTab) {
        self.tab = tab;
    }

    pub fn set_status_tab(&mut self, tab: StatusTab) {
        self.status_tab = tab;
    }

    pub fn toggle_select(&mut self, student_id: i64) -> bool {
        self.selection.toggle(student_id, &self.snapshot.students)
    }

    pub fn select_all_unpaid(&mut self) {
        self.selection.select_all_unpaid(&self.snapshot.students);
    }

    pub fn select_all_toggle(&mut self) {
        self.selection.select_all_toggle(&self.snapshot.students);
    }

    pub fn toggle_expand(&mut self, date: NaiveDate) -> bool {
        self.expanded.toggle(date)
    }

    pub fn set_search_draft(&mut self, text: &str) {
        self.filters.set_search_draft(text);
    }

    pub fn open_expense_form(&mut self) {
        self.expense_form.open();
    }

    pub fn close_expense_form(&mut self) {
        self.expense_form.close();
    }

    pub fn expense_fields(&mut self) -> Option<&mut ExpenseFields> {
        self.expense_form.fields_mut()
    }

    pub fn open_meeting_form(&mut self) {
        self.meeting_form.open();
    }

    pub fn close_meeting_form(&mut self) {
        self.meeting_form.close();
    }

    pub fn meeting_fields(&mut self) -> Option<&mut MeetingFields> {
        self.meeting_form.fields_mut()
    }

    pub fn open_export_form(&mut self) {
        self.export_form.open();
    }

    pub fn close_export_form(&mut self) {
        self.export_form.close();
    }

    pub fn choose_report(&mut self, kind: ReportKind) -> bool {
        match self.export_form.fields_mut() {
            Some(f) => {
                f.kind = kind;
                true
            }
            None => false,
        }
    }

    // ---- shared plumbing ----

    fn report(&mut self, err: &KasError) {
        let kind = if err.is_guard() {
            NoticeKind::Warning
        } else {
            NoticeKind::Error
        };
        self.notice = Some(Notice::new(kind, err.to_string()));
    }

    fn guard_meeting(&mut self) -> KasResult<NaiveDate> {
        match self.filters.require_meeting() {
            Ok(d) => Ok(d),
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    fn apply_snapshot(&mut self, ticket: &Ticket, mut snapshot: KasSnapshot) -> Applied {
        // Mutations redirect back to the filters they were sent from, so a
        // current navigation to other filters is the newer intent.
        let supersedes =
            ticket.slot == Slot::Navigation && snapshot.filters != self.snapshot.filters;
        if !self.requests.accept_snapshot(ticket, supersedes) {
            log::info!("older snapshot from {} ignored", ticket.slot);
            return Applied::Discarded;
        }
        if let Some(n) = notice_from_flash(std::mem::take(&mut snapshot.flash)) {
            self.notice = Some(n);
        }
        self.filters.sync(&snapshot.filters);
        self.selection.retain_selectable(&snapshot.students);
        self.snapshot = snapshot;
        Applied::Applied
    }

    /// Settle a request whose success response is a snapshot.
    fn complete_mutation(
        &mut self,
        ticket: Ticket,
        result: KasResult<KasSnapshot>,
        on_success: impl FnOnce(&mut Self),
    ) -> KasResult<Applied> {
        if !self.requests.finish(&ticket) {
            log::info!("stale {} response discarded", ticket.slot);
            return Ok(Applied::Discarded);
        }
        match result {
            Ok(snapshot) => {
                on_success(self);
                Ok(self.apply_snapshot(&ticket, snapshot))
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    // ---- navigation ----

    pub fn begin_navigation(&mut self) -> Ticket {
        self.requests.begin(Slot::Navigation)
    }

    pub fn complete_navigation(
        &mut self,
        ticket: Ticket,
        result: KasResult<KasSnapshot>,
    ) -> KasResult<Applied> {
        self.complete_mutation(ticket, result, |_| {})
    }

    pub fn navigate<B: KasBackend + ?Sized>(
        &mut self,
        backend: &B,
        target: Filters,
    ) -> KasResult<Applied> {
        let ticket = self.begin_navigation();
        log::debug!("navigating with {:?}", target);
        let result = backend.load(&target);
        self.complete_navigation(ticket, result)
    }

    pub fn reload<B: KasBackend + ?Sized>(&mut self, backend: &B) -> KasResult<Applied> {
        let target = self.filters.applied().clone();
        self.navigate(backend, target)
    }

    pub fn apply_search<B: KasBackend + ?Sized>(&mut self, backend: &B) -> KasResult<Applied> {
        let target = self.filters.apply_search();
        self.navigate(backend, target)
    }

    pub fn set_meeting<B: KasBackend + ?Sized>(
        &mut self,
        backend: &B,
        meeting: MeetingFilter,
    ) -> KasResult<Applied> {
        let target = self.filters.with_meeting(meeting);
        self.navigate(backend, target)
    }

    pub fn set_month<B: KasBackend + ?Sized>(
        &mut self,
        backend: &B,
        month: &str,
    ) -> KasResult<Applied> {
        let target = self.filters.with_month(month)?;
        self.navigate(backend, target)
    }

    // ---- payment marking ----

    pub fn begin_mark_paid(&mut self, student_id: i64) -> KasResult<(Ticket, MarkPaidRequest)> {
        let period_date = self.guard_meeting()?;
        let slot = Slot::MarkPaid(student_id);
        if self.requests.in_flight(slot) {
            return Err(KasError::Busy(slot));
        }
        let ticket = self.requests.begin(slot);
        Ok((
            ticket,
            MarkPaidRequest {
                student_id,
                period_date,
            },
        ))
    }

    pub fn complete_mark_paid(
        &mut self,
        ticket: Ticket,
        result: KasResult<KasSnapshot>,
    ) -> KasResult<Applied> {
        self.complete_mutation(ticket, result, |_| {})
    }

    pub fn mark_paid<B: KasBackend + ?Sized>(
        &mut self,
        backend: &B,
        student_id: i64,
    ) -> KasResult<Applied> {
        let (ticket, req) = self.begin_mark_paid(student_id)?;
        let result = backend.mark_paid(&req);
        self.complete_mark_paid(ticket, result)
    }

    pub fn begin_bulk_mark_paid(&mut self) -> KasResult<(Ticket, BulkMarkPaidRequest)> {
        let period_date = self.guard_meeting()?;
        if self.selection.is_empty() {
            return Err(KasError::EmptySelection);
        }
        if self.requests.in_flight(Slot::BulkMarkPaid) {
            return Err(KasError::Busy(Slot::BulkMarkPaid));
        }
        let ticket = self.requests.begin(Slot::BulkMarkPaid);
        Ok((
            ticket,
            BulkMarkPaidRequest {
                student_ids: self.selection.ids().iter().copied().collect(),
                period_date,
            },
        ))
    }

    pub fn complete_bulk_mark_paid(
        &mut self,
        ticket: Ticket,
        result: KasResult<KasSnapshot>,
    ) -> KasResult<Applied> {
        self.complete_mutation(ticket, result, |page| page.selection.clear())
    }

    pub fn bulk_mark_paid<B: KasBackend + ?Sized>(&mut self, backend: &B) -> KasResult<Applied> {
        let (ticket, req) = self.begin_bulk_mark_paid()?;
        let result = backend.bulk_mark_paid(&req);
        self.complete_bulk_mark_paid(ticket, result)
    }

    // ---- modal forms ----

    pub fn begin_record_expense(&mut self) -> KasResult<(Ticket, ExpenseRequest)> {
        let fields = self.expense_form.begin_submit()?;
        let ticket = self.requests.begin(Slot::Expense);
        Ok((ticket, ExpenseRequest::from_fields(fields)))
    }

    pub fn complete_record_expense(
        &mut self,
        ticket: Ticket,
        result: KasResult<KasSnapshot>,
    ) -> KasResult<Applied> {
        if !self.requests.finish(&ticket) {
            return Ok(Applied::Discarded);
        }
        match result {
            Ok(snapshot) => {
                self.expense_form.succeed();
                Ok(self.apply_snapshot(&ticket, snapshot))
            }
            Err(e) => {
                self.expense_form
                    .fail(e.field_errors().cloned().unwrap_or_default());
                if e.field_errors().is_none() {
                    self.report(&e);
                }
                Err(e)
            }
        }
    }

    pub fn record_expense<B: KasBackend + ?Sized>(&mut self, backend: &B) -> KasResult<Applied> {
        let (ticket, req) = self.begin_record_expense()?;
        let result = backend.record_expense(&req);
        self.complete_record_expense(ticket, result)
    }

    pub fn begin_create_meeting(&mut self) -> KasResult<(Ticket, CreateMeetingRequest)> {
        let request = CreateMeetingRequest::from_fields(self.meeting_form.begin_submit()?)?;
        let ticket = self.requests.begin(Slot::Meeting);
        Ok((ticket, request))
    }

    pub fn complete_create_meeting(
        &mut self,
        ticket: Ticket,
        result: KasResult<KasSnapshot>,
    ) -> KasResult<Applied> {
        if !self.requests.finish(&ticket) {
            return Ok(Applied::Discarded);
        }
        match result {
            Ok(snapshot) => {
                self.meeting_form.succeed();
                Ok(self.apply_snapshot(&ticket, snapshot))
            }
            Err(e) => {
                self.meeting_form
                    .fail(e.field_errors().cloned().unwrap_or_default());
                if e.field_errors().is_none() {
                    self.report(&e);
                }
                Err(e)
            }
        }
    }

    pub fn create_meeting<B: KasBackend + ?Sized>(&mut self, backend: &B) -> KasResult<Applied> {
        let (ticket, req) = self.begin_create_meeting()?;
        let result = backend.create_meeting(&req);
        self.complete_create_meeting(ticket, result)
    }

    pub fn begin_export(&mut self) -> KasResult<(Ticket, ExportRequest)> {
        if !self.export_form.is_open() {
            return Err(KasError::FormNotOpen);
        }
        let kind = self.export_form.fields().kind;
        let request = match ExportRequest::from_filters(kind, self.filters.applied()) {
            Ok(r) => r,
            Err(e) => {
                self.report(&e);
                return Err(e);
            }
        };
        self.export_form.begin_submit()?;
        let ticket = self.requests.begin(Slot::Export);
        Ok((ticket, request))
    }

    pub fn complete_export(
        &mut self,
        ticket: Ticket,
        result: KasResult<ExportOutcome>,
    ) -> KasResult<ExportOutcome> {
        if self.requests.finish(&ticket) {
            match &result {
                Ok(_) => self.export_form.succeed(),
                Err(e) => {
                    let mut errors = FieldErrors::new();
                    errors.insert("type".into(), e.to_string());
                    self.export_form.fail(errors);
                    self.report(e);
                }
            }
        }
        result
    }

    /// Build the report URL, or fetch the document when `download` is set.
    pub fn export<B: KasBackend + ?Sized>(
        &mut self,
        backend: &B,
        download: bool,
    ) -> KasResult<ExportOutcome> {
        let (ticket, req) = self.begin_export()?;
        let result = if download {
            backend.download(&req).map(ExportOutcome::Document)
        } else {
            backend.export_url(&req).map(ExportOutcome::Url)
        };
        self.complete_export(ticket, result)
    }
}
