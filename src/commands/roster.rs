// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::backend::{KasBackend, RosterQuery};
use crate::commands::opt_str;
use crate::pagination::{describe, render_footer};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(backend: &dyn KasBackend, m: &clap::ArgMatches) -> Result<()> {
    let query = RosterQuery {
        search: opt_str(m, "search").unwrap_or_default().trim().to_string(),
        class_name: opt_str(m, "class")
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
            .map(str::to_string),
        page: m.get_one::<u32>("page").copied().unwrap_or(1),
    };
    let roster = backend.roster(&query)?;
    let students = &roster.students;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &students.data)? {
        return Ok(());
    }

    let rows = students
        .data
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.student_number.clone(),
                s.name.clone(),
                s.class_name.clone().unwrap_or_else(|| "-".into()),
                s.faculty.clone().unwrap_or_else(|| "-".into()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "NIM", "Name", "Class", "Faculty"], rows)
    );
    println!(
        "Page {} of {} ({} students)",
        students.current_page, students.last_page, students.total
    );
    let items = describe(&students.links);
    if !items.is_empty() {
        println!("{}", render_footer(&items));
    }
    if !roster.classes.is_empty() {
        println!("Classes: {}", roster.classes.join(", "));
    }
    Ok(())
}
