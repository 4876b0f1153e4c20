// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Local;

use tallybook::commands::obligations::Side;
use tallybook::{Workspace, cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let today = match matches.get_one::<String>("today") {
        Some(s) => utils::parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let mut ws = Workspace::load(db::open_or_init()?)?;
    ws.refresh(today)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            ws.persist_all()?;
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("account", sub)) => commands::accounts::handle(&mut ws, sub, today)?,
        Some(("category", sub)) => commands::categories::handle(&mut ws, sub)?,
        Some(("card", sub)) => commands::cards::handle(&mut ws, sub, today)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut ws, sub, today)?,
        Some(("recurring", sub)) => commands::recurring::handle(&mut ws, sub, today)?,
        Some(("payable", sub)) => commands::obligations::handle(&mut ws, Side::Payable, sub, today)?,
        Some(("receivable", sub)) => {
            commands::obligations::handle(&mut ws, Side::Receivable, sub, today)?
        }
        Some(("liability", sub)) => commands::liabilities::handle(&mut ws, sub, today)?,
        Some(("goal", sub)) => commands::goals::handle(&mut ws, sub, today)?,
        Some(("asset", sub)) => commands::goals::handle_assets(&mut ws, sub)?,
        Some(("forecast", sub)) => commands::forecast::handle(&ws, sub, today)?,
        Some(("networth", sub)) => commands::networth::handle(&mut ws, sub, today)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut ws, sub)?,
        Some(("debts", sub)) => commands::debts::handle(&ws, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&mut ws, sub)?,
        Some(("export", sub)) => commands::backup::export(&ws, sub)?,
        Some(("import", sub)) => commands::backup::import(&mut ws, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
