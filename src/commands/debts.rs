// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::debts::{PayoffStrategy, payoff_order};
use crate::store::{KeyValueStore, Workspace};
use crate::utils::{fmt_money, maybe_print_json, pretty_table, req};
use anyhow::{Result, anyhow};

pub fn handle<S: KeyValueStore>(ws: &Workspace<S>, m: &clap::ArgMatches) -> Result<()> {
    let strategy: PayoffStrategy = req(m, "strategy")?.parse().map_err(|e: String| anyhow!(e))?;
    let order = payoff_order(&ws.state().long_term_liabilities, strategy);
    if maybe_print_json(m.get_flag("json"), &order)? {
        return Ok(());
    }
    let ccy = &ws.state().user_settings.currency;
    let rows = order
        .iter()
        .enumerate()
        .map(|(i, e)| {
            vec![
                (i + 1).to_string(),
                e.name.clone(),
                format!("{}%", e.interest_rate),
                fmt_money(&e.remaining_balance, ccy),
                fmt_money(&e.monthly_payment, ccy),
                e.months_remaining
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".into()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["#", "Name", "Rate", "Remaining", "Monthly", "Months"], rows)
    );
    Ok(())
}
