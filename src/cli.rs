// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command};

use crate::engine::projection::MAX_PROJECTION_DAYS;

const METHODS: [&str; 6] = ["cash", "bank-transfer", "credit-card", "cheque", "debit-card", "other"];

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true)
}

fn amount_arg() -> Arg {
    Arg::new("amount").long("amount").required(true)
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .help("YYYY-MM-DD, defaults to today")
}

fn account_arg() -> Arg {
    Arg::new("account").long("account").help("Bank account id")
}

fn payment_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(id_arg())
        .arg(amount_arg())
        .arg(date_arg())
        .arg(account_arg().help("Bank account the money moves through; cash when omitted"))
        .arg(
            Arg::new("no-transaction")
                .long("no-transaction")
                .action(ArgAction::SetTrue)
                .help("Record the payment without a ledger transaction"),
        )
}

fn obligation_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("desc").long("desc").default_value(""))
                .arg(amount_arg())
                .arg(Arg::new("due").long("due").required(true)),
        )
        .subcommand(Command::new("list").arg(json_flag()))
        .subcommand(payment_cmd("pay", "Record a payment"))
        .subcommand(
            Command::new("unpay")
                .about("Remove a payment")
                .arg(id_arg())
                .arg(Arg::new("payment").long("payment").required(true)),
        )
}

fn rule_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("desc").long("desc").required(true))
        .arg(amount_arg())
        .arg(
            Arg::new("type")
                .long("type")
                .value_parser(["income", "expense"])
                .default_value("expense"),
        )
        .arg(Arg::new("category").long("category").required(true))
        .arg(
            Arg::new("method")
                .long("method")
                .value_parser(METHODS)
                .default_value("bank-transfer"),
        )
        .arg(
            Arg::new("frequency")
                .long("frequency")
                .value_parser(["daily", "weekly", "monthly", "yearly"])
                .required(true),
        )
        .arg(Arg::new("start").long("start").required(true))
        .arg(Arg::new("end").long("end"))
        .arg(
            Arg::new("day-of-week")
                .long("day-of-week")
                .value_parser(clap::value_parser!(u32))
                .help("0 = Sunday .. 6 = Saturday"),
        )
        .arg(
            Arg::new("day-of-month")
                .long("day-of-month")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(account_arg())
        .arg(Arg::new("card").long("card"))
}

pub fn build_cli() -> Command {
    command!()
        .name("tallybook")
        .about("Personal finance tracker: balances, obligations, goals and forecasts")
        .arg(
            Arg::new("today")
                .long("today")
                .global(true)
                .help("Treat this date (YYYY-MM-DD) as today"),
        )
        .subcommand(Command::new("init").about("Initialise the database"))
        .subcommand(
            Command::new("account")
                .about("Manage bank accounts")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("bank").long("bank").default_value(""))
                        .arg(Arg::new("opening").long("opening").default_value("0")),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("transfer")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(amount_arg())
                        .arg(date_arg()),
                )
                .subcommand(
                    Command::new("deposit")
                        .about("Move cash on hand into an account")
                        .arg(account_arg().required(true))
                        .arg(amount_arg())
                        .arg(date_arg()),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Transaction categories")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("name").long("name"))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["income", "expense", "transfer"])
                                .default_value("expense"),
                        ),
                )
                .subcommand(Command::new("list").arg(json_flag())),
        )
        .subcommand(
            Command::new("card")
                .about("Manage credit cards")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("limit").long("limit").required(true))
                        .arg(Arg::new("available").long("available")),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("pay")
                        .arg(Arg::new("card").long("card").required(true))
                        .arg(amount_arg())
                        .arg(account_arg().help("Pay from this account; cash when omitted"))
                        .arg(date_arg()),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Ledger transactions")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(date_arg())
                        .arg(Arg::new("desc").long("desc").required(true))
                        .arg(amount_arg())
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["income", "expense"])
                                .default_value("expense"),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("method")
                                .long("method")
                                .value_parser(METHODS)
                                .default_value("cash"),
                        )
                        .arg(account_arg())
                        .arg(Arg::new("card").long("card").help("Credit card id")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        )
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(json_flag()),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("recurring")
                .about("Recurring transaction rules")
                .subcommand_required(true)
                .subcommand(rule_args(Command::new("add")))
                .subcommand(
                    rule_args(Command::new("edit").arg(id_arg()))
                        .about("Replace a rule's definition, keeping its history"),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(
                    Command::new("process")
                        .about("Generate transactions for every rule that is due"),
                )
                .subcommand(Command::new("pause").arg(id_arg()))
                .subcommand(Command::new("resume").arg(id_arg()))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(obligation_cmd("payable", "Money you owe"))
        .subcommand(obligation_cmd("receivable", "Money owed to you"))
        .subcommand(
            Command::new("liability")
                .about("Loans and short-term debts")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add-long")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(amount_arg())
                        .arg(Arg::new("monthly").long("monthly").required(true))
                        .arg(Arg::new("rate").long("rate").default_value("0"))
                        .arg(Arg::new("start").long("start")),
                )
                .subcommand(
                    Command::new("add-short")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(amount_arg())
                        .arg(Arg::new("due").long("due").required(true))
                        .arg(
                            Arg::new("installments")
                                .long("installments")
                                .value_parser(clap::value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("day")
                                .long("day")
                                .value_parser(clap::value_parser!(u32))
                                .help("Installment payment day of month"),
                        ),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(payment_cmd("pay", "Record a payment against a liability")),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("by").long("by").help("Target date")),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(
                    Command::new("contribute")
                        .arg(id_arg())
                        .arg(amount_arg())
                        .arg(account_arg())
                        .arg(date_arg()),
                )
                .subcommand(
                    Command::new("withdraw")
                        .about("Remove a contribution and its savings transaction")
                        .arg(id_arg())
                        .arg(
                            Arg::new("contribution")
                                .long("contribution")
                                .required(true)
                                .help("Contribution id, listed by `goal list --json`"),
                        ),
                ),
        )
        .subcommand(
            Command::new("asset")
                .about("Tracked assets")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("cost").long("cost").required(true))
                        .arg(Arg::new("value").long("value")),
                )
                .subcommand(Command::new("list").arg(json_flag())),
        )
        .subcommand(
            Command::new("forecast")
                .about("Project the liquid balance day by day")
                .arg(
                    Arg::new("days")
                        .long("days")
                        .value_parser(
                            clap::value_parser!(u32).range(1..=i64::from(MAX_PROJECTION_DAYS)),
                        )
                        .default_value("30"),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Show days without events too"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("networth")
                .about("Assets, liabilities and net worth")
                .arg(
                    Arg::new("record")
                        .long("record")
                        .action(ArgAction::SetTrue)
                        .help("Store today's snapshot"),
                )
                .arg(
                    Arg::new("history")
                        .long("history")
                        .action(ArgAction::SetTrue)
                        .help("List stored snapshots"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly category budgets")
                .subcommand_required(true)
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("month").long("month").required(true))
                        .arg(amount_arg()),
                )
                .subcommand(
                    Command::new("report")
                        .arg(Arg::new("month").long("month").required(true))
                        .arg(json_flag()),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("debts")
                .about("Suggested payoff order for long-term liabilities")
                .arg(
                    Arg::new("strategy")
                        .long("strategy")
                        .default_value("avalanche")
                        .help("avalanche | snowball"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check stored balances against the ledger")
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Overwrite drifted balances with replayed values"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write every collection to a JSON file")
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("import")
                .about("Replace all data with a JSON export")
                .arg(Arg::new("file").long("file").required(true)),
        )
}
