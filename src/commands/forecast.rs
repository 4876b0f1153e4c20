// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::projection;
use crate::store::{KeyValueStore, Workspace};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn handle<S: KeyValueStore>(
    ws: &Workspace<S>,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let days = m.get_one::<u32>("days").copied().unwrap_or(30);
    let forecast = projection::project_state(ws.state(), days, today);
    if maybe_print_json(m.get_flag("json"), &forecast)? {
        return Ok(());
    }

    let show_all = m.get_flag("all");
    let ccy = &ws.state().user_settings.currency;
    let rows: Vec<Vec<String>> = forecast
        .iter()
        .filter(|d| show_all || !d.events.is_empty())
        .map(|d| {
            let events = d
                .events
                .iter()
                .map(|e| format!("{} ({})", e.description, e.amount))
                .collect::<Vec<_>>()
                .join("\n");
            vec![
                d.date.to_string(),
                fmt_money(&d.start_balance, ccy),
                events,
                fmt_money(&d.end_balance, ccy),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "Opening", "Events", "Closing"], rows));

    if let Some(low) = forecast.iter().min_by_key(|d| d.end_balance) {
        if low.end_balance < Decimal::ZERO {
            println!(
                "Warning: balance drops to {} on {}",
                fmt_money(&low.end_balance, ccy),
                low.date
            );
        }
    }
    Ok(())
}
