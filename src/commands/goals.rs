// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::payments;
use crate::store::{KeyValueStore, Workspace};
use crate::utils::{
    date_or, fmt_opt_date, maybe_print_json, opt_decimal, opt_id, parse_date, parse_decimal,
    parse_id, pretty_table, req,
};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn handle<S: KeyValueStore>(
    ws: &mut Workspace<S>,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = req(sub, "name")?;
            let target = parse_decimal(req(sub, "target")?)?;
            let by = sub.get_one::<String>("by").map(|s| parse_date(s)).transpose()?;
            let id = ws.apply(|s| payments::add_goal(s, name, target, by))?;
            println!("Added goal '{}' ({})", name, id);
        }
        Some(("list", sub)) => {
            let goals = &ws.state().financial_goals;
            if !maybe_print_json(sub.get_flag("json"), goals)? {
                let rows = goals
                    .iter()
                    .map(|g| {
                        let pct = if g.target_amount > Decimal::ZERO {
                            (g.current_amount / g.target_amount * Decimal::ONE_HUNDRED).round_dp(1)
                        } else {
                            Decimal::ZERO
                        };
                        vec![
                            g.id.to_string(),
                            g.name.clone(),
                            g.current_amount.to_string(),
                            g.target_amount.to_string(),
                            format!("{}%", pct),
                            fmt_opt_date(g.target_date),
                            fmt_opt_date(g.achieved_date),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Id", "Name", "Saved", "Target", "Progress", "By", "Achieved"],
                        rows
                    )
                );
            }
        }
        Some(("contribute", sub)) => {
            let id = parse_id(req(sub, "id")?)?;
            let amount = parse_decimal(req(sub, "amount")?)?;
            let account = opt_id(sub, "account")?;
            let date = date_or(sub, "date", today)?;
            ws.apply(|s| payments::add_goal_contribution(s, id, amount, date, account, today))?;
            let goal = ws.state().goal(id)?;
            println!(
                "Contributed {} to '{}' ({} of {})",
                amount, goal.name, goal.current_amount, goal.target_amount
            );
            if goal.achieved_date == Some(today) {
                println!("Goal reached!");
            }
        }
        Some(("withdraw", sub)) => {
            let id = parse_id(req(sub, "id")?)?;
            let contribution = parse_id(req(sub, "contribution")?)?;
            ws.apply(|s| payments::remove_goal_contribution(s, id, contribution, today))?;
            let goal = ws.state().goal(id)?;
            println!(
                "Removed contribution {} from '{}' ({} of {})",
                contribution, goal.name, goal.current_amount, goal.target_amount
            );
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_assets<S: KeyValueStore>(ws: &mut Workspace<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = req(sub, "name")?;
            let cost = parse_decimal(req(sub, "cost")?)?;
            let value = opt_decimal(sub, "value")?;
            let id = ws.apply(|s| payments::add_asset(s, name, cost, value))?;
            println!("Added asset '{}' ({})", name, id);
        }
        Some(("list", sub)) => {
            let assets = &ws.state().assets;
            if !maybe_print_json(sub.get_flag("json"), assets)? {
                let rows = assets
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.name.clone(),
                            a.acquisition_cost.to_string(),
                            a.valuation().to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Name", "Cost", "Value"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
