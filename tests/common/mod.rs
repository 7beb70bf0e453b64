// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use chrono::NaiveDate;
use kasclip::backend::{
    BulkMarkPaidRequest, CreateMeetingRequest, ExpenseRequest, ExportDocument, ExportRequest,
    KasBackend, MarkPaidRequest, RosterQuery,
};
use kasclip::error::{KasError, KasResult};
use kasclip::models::{Filters, KasSnapshot, MeetingFilter, RosterSnapshot};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(Filters),
    MarkPaid(MarkPaidRequest),
    BulkMarkPaid(BulkMarkPaidRequest),
    Expense(ExpenseRequest),
    Meeting(CreateMeetingRequest),
    ExportUrl(ExportRequest),
    Download(ExportRequest),
    Roster(RosterQuery),
}

/// Records every call; answers from a queue, else echoes the base snapshot.
pub struct FakeBackend {
    pub calls: RefCell<Vec<Call>>,
    queued: RefCell<VecDeque<KasResult<KasSnapshot>>>,
    base: KasSnapshot,
}

impl FakeBackend {
    pub fn new(base: KasSnapshot) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            queued: RefCell::new(VecDeque::new()),
            base,
        }
    }

    pub fn push(&self, response: KasResult<KasSnapshot>) {
        self.queued.borrow_mut().push_back(response);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn respond(&self, call: Call) -> KasResult<KasSnapshot> {
        let filters = match &call {
            Call::Load(f) => Some(f.clone()),
            _ => None,
        };
        self.calls.borrow_mut().push(call);
        if let Some(r) = self.queued.borrow_mut().pop_front() {
            return r;
        }
        let mut s = self.base.clone();
        if let Some(f) = filters {
            s.filters = f;
        }
        Ok(s)
    }
}

impl KasBackend for FakeBackend {
    fn load(&self, filters: &Filters) -> KasResult<KasSnapshot> {
        self.respond(Call::Load(filters.clone()))
    }

    fn mark_paid(&self, req: &MarkPaidRequest) -> KasResult<KasSnapshot> {
        self.respond(Call::MarkPaid(req.clone()))
    }

    fn bulk_mark_paid(&self, req: &BulkMarkPaidRequest) -> KasResult<KasSnapshot> {
        self.respond(Call::BulkMarkPaid(req.clone()))
    }

    fn record_expense(&self, req: &ExpenseRequest) -> KasResult<KasSnapshot> {
        self.respond(Call::Expense(req.clone()))
    }

    fn create_meeting(&self, req: &CreateMeetingRequest) -> KasResult<KasSnapshot> {
        self.respond(Call::Meeting(req.clone()))
    }

    fn export_url(&self, req: &ExportRequest) -> KasResult<String> {
        self.calls.borrow_mut().push(Call::ExportUrl(req.clone()));
        Ok(url_for(req))
    }

    fn download(&self, req: &ExportRequest) -> KasResult<ExportDocument> {
        self.calls.borrow_mut().push(Call::Download(req.clone()));
        Ok(ExportDocument {
            url: url_for(req),
            filename: req.default_filename(),
            bytes: b"%PDF-1.4 fake".to_vec(),
        })
    }

    fn roster(&self, query: &RosterQuery) -> KasResult<RosterSnapshot> {
        self.calls.borrow_mut().push(Call::Roster(query.clone()));
        serde_json::from_value(roster_json()).map_err(KasError::from)
    }
}

fn url_for(req: &ExportRequest) -> String {
    let query = req
        .query_pairs()
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("http://kas.test/admin/kas/pdf?{}", query)
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn today() -> NaiveDate {
    day(2025, 3, 12)
}

pub fn snapshot_json() -> Value {
    json!({
        "mahasiswaList": [
            {
                "id": 1, "nama": "Ayu Lestari", "nim": "2301001", "kelas": "A",
                "total_paid": 10000, "total_unpaid": 0, "status": "paid",
                "records": [
                    {"id": 11, "amount": "5000.00", "status": "paid", "period_date": "2025-03-10", "description": null}
                ]
            },
            {
                "id": 2, "nama": "Budi Santoso", "nim": "2301002", "kelas": "A",
                "total_paid": 5000, "total_unpaid": 5000, "status": "unpaid", "records": []
            },
            {
                "id": 3, "nama": "Citra Dewi", "nim": "2301003", "kelas": null,
                "total_paid": 0, "total_unpaid": 0, "status": "none", "records": []
            },
            {
                "id": 4, "nama": "Dimas Pratama", "nim": "2301004", "kelas": "B",
                "total_paid": 0, "total_unpaid": 5000, "status": "unpaid"
            }
        ],
        "summary": {
            "total_balance": 40000, "total_income": 55000, "total_expense": 15000,
            "period_income": 55000, "period_expense": 15000,
            "paid_count": 1, "unpaid_count": 2
        },
        "ledger": [
            {
                "date": "2025-03-10", "display_date": "10 Mar 2025",
                "income": 5000, "expense": 15000, "balance": 40000,
                "transactions": [
                    {
                        "id": 21, "mahasiswa": "Ayu Lestari", "type": "income", "amount": 5000,
                        "status": "paid", "description": null, "category": null,
                        "period_date": "2025-03-10", "period_display": "10 Mar 2025",
                        "created_at": "2025-03-10 09:00"
                    },
                    {
                        "id": 22, "mahasiswa": null, "type": "expense", "amount": 15000,
                        "status": "paid", "description": "Spidol dan kertas", "category": "perlengkapan",
                        "period_date": "2025-03-10", "period_display": "10 Mar 2025",
                        "created_at": "2025-03-10 10:30"
                    }
                ]
            },
            {
                "date": "2025-03-03", "display_date": "03 Mar 2025",
                "income": 50000, "expense": 0, "balance": 50000, "transactions": []
            }
        ],
        "pertemuanDates": ["2025-03-03", "2025-03-10"],
        "filters": {"search": "", "pertemuan": "2025-03-10", "month": "2025-03"},
        "kasAmount": 5000,
        "errors": [],
        "flash": {"success": null, "error": null}
    })
}

pub fn snapshot() -> KasSnapshot {
    serde_json::from_value(snapshot_json()).unwrap()
}

/// Base snapshot with `edit` applied to its JSON first.
pub fn snapshot_with(edit: impl FnOnce(&mut Value)) -> KasSnapshot {
    let mut v = snapshot_json();
    edit(&mut v);
    serde_json::from_value(v).unwrap()
}

/// Base snapshot in which the given students have paid.
pub fn paid(ids: &[i64]) -> KasSnapshot {
    snapshot_with(|v| {
        for row in v["mahasiswaList"].as_array_mut().unwrap() {
            if ids.contains(&row["id"].as_i64().unwrap()) {
                row["status"] = json!("paid");
            }
        }
    })
}

pub fn meeting_filters() -> Filters {
    Filters {
        search: String::new(),
        meeting: MeetingFilter::Date(day(2025, 3, 10)),
        month: "2025-03".to_string(),
    }
}

pub fn all_filters() -> Filters {
    Filters::for_month("2025-03")
}

pub fn roster_json() -> Value {
    json!({
        "mahasiswa": {
            "data": [
                {"id": 1, "nim": "2301001", "nama": "Ayu Lestari", "kelas": "A", "fakultas": "Teknik"},
                {"id": 2, "nim": "2301002", "nama": "Budi Santoso", "kelas": "A", "fakultas": null}
            ],
            "links": [
                {"url": null, "label": "&laquo; Previous", "active": false},
                {"url": "http://kas.test/admin/mahasiswa?page=1", "label": "1", "active": true},
                {"url": "http://kas.test/admin/mahasiswa?page=2", "label": "2", "active": false},
                {"url": null, "label": "...", "active": false},
                {"url": "http://kas.test/admin/mahasiswa?page=9", "label": "9", "active": false},
                {"url": "http://kas.test/admin/mahasiswa?page=2", "label": "Next &raquo;", "active": false}
            ],
            "current_page": 1,
            "last_page": 9,
            "total": 42
        },
        "kelasList": ["A", "B"],
        "flash": {}
    })
}
