// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod expand;
pub mod filters;
pub mod forms;
pub mod page;
pub mod requests;
pub mod selection;
pub mod tabs;

pub use expand::ExpandedDates;
pub use filters::FilterState;
pub use forms::{FormPhase, ModalForm};
pub use page::{Applied, KasPage, Notice, NoticeKind};
pub use requests::{RequestTracker, Slot, Ticket};
pub use selection::Selection;
pub use tabs::{ActiveTab, StatusTab};
