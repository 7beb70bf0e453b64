// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

fn json_flags() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

/// Arguments selecting which class-fund page to load.
fn filter_args() -> [Arg; 3] {
    [
        Arg::new("month")
            .long("month")
            .value_name("YYYY-MM")
            .help("Month shown in the summary and ledger (default: current month)"),
        Arg::new("meeting")
            .long("meeting")
            .value_name("YYYY-MM-DD|all")
            .help("Meeting date whose payment status is shown"),
        Arg::new("search")
            .long("search")
            .value_name("TEXT")
            .help("Filter students by name or NIM"),
    ]
}

fn meeting_required() -> Arg {
    Arg::new("meeting")
        .long("meeting")
        .value_name("YYYY-MM-DD")
        .required(true)
        .help("Meeting date the payment is recorded for")
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Month to show afterwards (default: current month)")
}

pub fn build_cli() -> Command {
    Command::new("kasclip")
        .version(crate_version!())
        .about("Class-fund (kas) ledger client for the admin panel")
        .subcommand_required(false)
        .arg_required_else_help(true)
        .subcommand(Command::new("init").about("Create the settings database"))
        .subcommand(
            Command::new("config")
                .about("Server address and session settings")
                .subcommand(
                    Command::new("set")
                        .about("Store a setting")
                        .arg(Arg::new("key").required(true).help(
                            "base_url | timeout_secs | cookie | xsrf_token",
                        ))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("show").about("Show effective settings"))
                .subcommand(
                    Command::new("unset")
                        .about("Remove a stored setting")
                        .arg(Arg::new("key").required(true)),
                ),
        )
        .subcommand(
            Command::new("payments")
                .about("Student payment status for a meeting")
                .args(filter_args())
                .arg(
                    Arg::new("status")
                        .long("status")
                        .value_name("all|paid|unpaid")
                        .default_value("all")
                        .help("Status tab"),
                )
                .args(json_flags()),
        )
        .subcommand(
            Command::new("ledger")
                .about("Daily cash book with running balance")
                .args(filter_args())
                .arg(
                    Arg::new("expand")
                        .long("expand")
                        .value_name("YYYY-MM-DD")
                        .action(ArgAction::Append)
                        .help("Show the transactions of this day (repeatable)"),
                )
                .arg(
                    Arg::new("expand-all")
                        .long("expand-all")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("expand")
                        .help("Show the transactions of every day"),
                )
                .args(json_flags()),
        )
        .subcommand(
            Command::new("pay")
                .about("Mark class-fund fees as paid")
                .subcommand(
                    Command::new("one")
                        .about("Mark one student as paid")
                        .arg(
                            Arg::new("student")
                                .long("student")
                                .value_name("ID")
                                .value_parser(clap::value_parser!(i64))
                                .required(true),
                        )
                        .arg(meeting_required())
                        .arg(month_arg()),
                )
                .subcommand(
                    Command::new("bulk")
                        .about("Mark several unpaid students as paid")
                        .arg(
                            Arg::new("student")
                                .long("student")
                                .value_name("ID")
                                .value_parser(clap::value_parser!(i64))
                                .action(ArgAction::Append),
                        )
                        .arg(
                            Arg::new("all-unpaid")
                                .long("all-unpaid")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("student")
                                .help("Select every unpaid student"),
                        )
                        .arg(meeting_required())
                        .arg(month_arg()),
                ),
        )
        .subcommand(
            Command::new("expense")
                .about("Record a class-fund expense")
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("description")
                        .long("description")
                        .required(true),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .default_value("pengeluaran")
                        .help("pengeluaran | kegiatan | perlengkapan | lainnya"),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD")
                        .help("Expense date (default: today)"),
                )
                .arg(month_arg()),
        )
        .subcommand(
            Command::new("meeting")
                .about("Create a meeting and its unpaid fee records")
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD")
                        .required(true),
                )
                .arg(month_arg()),
        )
        .subcommand(
            Command::new("export")
                .about("Open or download a PDF report")
                .arg(
                    Arg::new("report")
                        .long("report")
                        .default_value("overall")
                        .help("per-meeting | monthly | overall | matrix"),
                )
                .args(filter_args())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_name("PATH")
                        .help("Where to save the PDF (default: server file name)"),
                )
                .arg(
                    Arg::new("url-only")
                        .long("url-only")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("out")
                        .help("Only print the report URL"),
                ),
        )
        .subcommand(
            Command::new("roster")
                .about("Paginated student roster")
                .arg(Arg::new("search").long("search"))
                .arg(Arg::new("class").long("class").help("Class name (default: all)"))
                .arg(
                    Arg::new("page")
                        .long("page")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("1"),
                )
                .args(json_flags()),
        )
        .subcommand(
            Command::new("shell")
                .about("Interactive session on one class-fund page")
                .args(filter_args()),
        )
}
