// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::ledger;
use crate::store::{KeyValueStore, Workspace};
use crate::utils::{
    date_or, fmt_money, maybe_print_json, parse_decimal, parse_id, pretty_table, req,
};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

pub fn handle<S: KeyValueStore>(
    ws: &mut Workspace<S>,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = req(sub, "name")?;
            let bank = req(sub, "bank")?;
            let opening = parse_decimal(req(sub, "opening")?)?;
            let id = ws.apply(|s| ledger::add_bank_account(s, name, bank, opening))?;
            println!("Added account '{}' ({})", name, id);
        }
        Some(("list", sub)) => {
            let data = account_rows(ws);
            if !maybe_print_json(sub.get_flag("json"), &data)? {
                let ccy = &ws.state().user_settings.currency;
                let rows = data
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.clone(),
                            a.name.clone(),
                            a.bank.clone(),
                            fmt_money(&a.balance, ccy),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Name", "Bank", "Balance"], rows));
            }
        }
        Some(("rm", sub)) => {
            let id = parse_id(req(sub, "id")?)?;
            ws.apply(|s| ledger::remove_bank_account(s, id))?;
            println!("Removed account {}", id);
        }
        Some(("transfer", sub)) => {
            let from = parse_id(req(sub, "from")?)?;
            let to = parse_id(req(sub, "to")?)?;
            let amount = parse_decimal(req(sub, "amount")?)?;
            let date = date_or(sub, "date", today)?;
            ws.apply(|s| ledger::transfer_between_accounts(s, from, to, amount, date))?;
            println!("Transferred {} on {}", amount, date);
        }
        Some(("deposit", sub)) => {
            let account = parse_id(req(sub, "account")?)?;
            let amount = parse_decimal(req(sub, "amount")?)?;
            let date = date_or(sub, "date", today)?;
            ws.apply(|s| ledger::deposit_cash(s, account, amount, date))?;
            println!("Deposited {} cash on {}", amount, date);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct AccountRow {
    pub id: String,
    pub name: String,
    pub bank: String,
    pub balance: rust_decimal::Decimal,
}

pub fn account_rows<S: KeyValueStore>(ws: &Workspace<S>) -> Vec<AccountRow> {
    let mut rows: Vec<AccountRow> = ws
        .state()
        .bank_accounts
        .iter()
        .map(|a| AccountRow {
            id: a.id.to_string(),
            name: a.account_name.clone(),
            bank: a.bank_name.clone(),
            balance: a.current_balance,
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    rows
}
