// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::ledger;
use crate::store::{KeyValueStore, Workspace};
use crate::utils::{
    date_or, fmt_money, maybe_print_json, opt_decimal, opt_id, parse_decimal, parse_id,
    pretty_table, req,
};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle<S: KeyValueStore>(
    ws: &mut Workspace<S>,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = req(sub, "name")?;
            let limit = parse_decimal(req(sub, "limit")?)?;
            let available = opt_decimal(sub, "available")?;
            let id = ws.apply(|s| ledger::add_credit_card(s, name, limit, available))?;
            println!("Added card '{}' ({})", name, id);
        }
        Some(("list", sub)) => {
            let data = card_rows(ws);
            if !maybe_print_json(sub.get_flag("json"), &data)? {
                let ccy = &ws.state().user_settings.currency;
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.clone(),
                            c.name.clone(),
                            fmt_money(&c.limit, ccy),
                            fmt_money(&c.available, ccy),
                            fmt_money(&c.outstanding, ccy),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Limit", "Available", "Outstanding"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = parse_id(req(sub, "id")?)?;
            ws.apply(|s| ledger::remove_credit_card(s, id))?;
            println!("Removed card {}", id);
        }
        Some(("pay", sub)) => {
            let card = parse_id(req(sub, "card")?)?;
            let amount = parse_decimal(req(sub, "amount")?)?;
            let account = opt_id(sub, "account")?;
            let date = date_or(sub, "date", today)?;
            ws.apply(|s| ledger::pay_credit_card(s, card, account, amount, date))?;
            println!(
                "Paid {} towards card {} from {}",
                amount,
                card,
                if account.is_some() { "bank" } else { "cash" }
            );
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct CardRow {
    pub id: String,
    pub name: String,
    pub limit: Decimal,
    pub available: Decimal,
    pub outstanding: Decimal,
}

pub fn card_rows<S: KeyValueStore>(ws: &Workspace<S>) -> Vec<CardRow> {
    ws.state()
        .credit_cards
        .iter()
        .map(|c| CardRow {
            id: c.id.to_string(),
            name: c.card_name.clone(),
            limit: c.credit_limit,
            available: c.available_balance,
            outstanding: c.outstanding(),
        })
        .collect()
}
