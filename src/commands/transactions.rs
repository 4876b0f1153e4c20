// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::ledger;
use crate::models::TransactionDraft;
use crate::state::AppState;
use crate::store::{KeyValueStore, Workspace};
use crate::utils::{
    date_or, maybe_print_json, month_key, opt_id, parse_decimal, parse_id, parse_method,
    parse_month, parse_type, pretty_table, req,
};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::Serialize;

pub fn handle<S: KeyValueStore>(
    ws: &mut Workspace<S>,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ws, sub, today)?,
        Some(("list", sub)) => list(ws, sub)?,
        Some(("rm", sub)) => {
            let id = parse_id(req(sub, "id")?)?;
            let report = ws.apply(|s| ledger::delete_transaction(s, id, today))?;
            println!("Deleted transaction {}", id);
            if !report.is_empty() {
                println!("Removed linked payments/contributions from {} record(s)", report.touched());
            }
        }
        _ => {}
    }
    Ok(())
}

fn add<S: KeyValueStore>(ws: &mut Workspace<S>, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let date = date_or(sub, "date", today)?;
    let desc = req(sub, "desc")?;
    let amount = parse_decimal(req(sub, "amount")?)?;
    let kind = parse_type(req(sub, "type")?)?;
    let category = req(sub, "category")?;
    let method = parse_method(req(sub, "method")?)?;

    if ws.state().category(category).is_none() {
        bail!("Unknown category '{}'", category);
    }
    let mut draft = TransactionDraft::new(date, desc, amount, kind, category, method);
    draft.bank_account_id = opt_id(sub, "account")?;
    draft.credit_card_id = opt_id(sub, "card")?;

    let id = ws.apply(|s| ledger::create_transaction(s, draft))?;
    println!("Recorded {} on {} '{}' ({})", amount, date, desc, id);
    Ok(())
}

fn list<S: KeyValueStore>(ws: &Workspace<S>, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(ws.state(), sub)?;
    if !maybe_print_json(sub.get_flag("json"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.id.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.method.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Id", "Description", "Amount", "Category", "Method"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub description: String,
    /// Signed: expenses are negative.
    pub amount: String,
    pub category: String,
    pub method: String,
}

/// Ledger rows newest first, filtered by `--month` and capped by `--limit`.
pub fn query_rows(state: &AppState, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let month = sub
        .get_one::<String>("month")
        .map(|m| parse_month(m))
        .transpose()?;
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    Ok(state
        .transactions
        .iter()
        .filter(|t| month.as_deref().is_none_or(|m| month_key(t.date) == m))
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id.to_string(),
            date: t.date.to_string(),
            description: t.description.clone(),
            amount: (t.amount * t.r#type.sign()).to_string(),
            category: state
                .category(&t.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| t.category_id.clone()),
            method: format!("{:?}", t.payment_method),
        })
        .collect())
}
