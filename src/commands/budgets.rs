// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::budgets;
use crate::store::{KeyValueStore, Workspace};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_id, parse_month, pretty_table, req};
use anyhow::{Result, bail};

pub fn handle<S: KeyValueStore>(ws: &mut Workspace<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(ws, sub)?,
        Some(("report", sub)) => report(ws, sub)?,
        Some(("rm", sub)) => {
            let id = parse_id(req(sub, "id")?)?;
            ws.apply(|s| budgets::delete_budget(s, id))?;
            println!("Removed budget {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Creates the month's budget for a category, or updates the amount when one
/// already exists.
fn set<S: KeyValueStore>(ws: &mut Workspace<S>, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(req(sub, "month")?)?;
    let cat = req(sub, "category")?;
    let amount = parse_decimal(req(sub, "amount")?)?;
    if ws.state().category(cat).is_none() {
        bail!("Unknown category '{}'", cat);
    }
    let existing = ws
        .state()
        .budgets
        .iter()
        .find(|b| b.category_id == cat && b.month == month)
        .map(|b| b.id);
    match existing {
        Some(id) => ws.apply(|s| budgets::update_budget(s, id, amount))?,
        None => {
            ws.apply(|s| budgets::create_budget(s, cat, &month, amount))?;
        }
    }
    println!("Budget set for {} / {} = {}", month, cat, amount);
    Ok(())
}

fn report<S: KeyValueStore>(ws: &Workspace<S>, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(req(sub, "month")?)?;
    let lines = budgets::budget_report(ws.state(), &month);
    if maybe_print_json(sub.get_flag("json"), &lines)? {
        return Ok(());
    }
    let ccy = &ws.state().user_settings.currency;
    let rows = lines
        .iter()
        .map(|l| {
            let name = ws
                .state()
                .category(&l.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| l.category_id.clone());
            vec![
                l.budget_id.to_string(),
                name,
                fmt_money(&l.budgeted, ccy),
                fmt_money(&l.spent, ccy),
                fmt_money(&l.remaining, ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Id", "Category", "Budget", "Spent", "Remaining"], rows)
    );
    Ok(())
}
