// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::net_worth;
use crate::store::{KeyValueStore, Workspace};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;

pub fn handle<S: KeyValueStore>(
    ws: &mut Workspace<S>,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    if m.get_flag("record") {
        let snap = ws.apply(|s| Ok(net_worth::record_snapshot(s, today)))?;
        println!("Recorded net worth {} for {}", snap.net_worth, snap.date);
    }

    let json = m.get_flag("json");
    let ccy = ws.state().user_settings.currency.clone();
    if m.get_flag("history") {
        let history = &ws.state().net_worth_snapshots;
        if !maybe_print_json(json, history)? {
            let rows = history
                .iter()
                .map(|s| {
                    vec![
                        s.date.to_string(),
                        fmt_money(&s.assets, &ccy),
                        fmt_money(&s.liabilities, &ccy),
                        fmt_money(&s.net_worth, &ccy),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Date", "Assets", "Liabilities", "Net worth"], rows)
            );
        }
        return Ok(());
    }

    let totals = net_worth::compute_net_worth(ws.state());
    if !maybe_print_json(json, &totals)? {
        let line = |label: &str, v: &rust_decimal::Decimal| vec![label.to_string(), fmt_money(v, &ccy)];
        let rows = vec![
            line("Bank accounts", &totals.bank_balances),
            line("Cash", &totals.cash_balance),
            line("Receivables", &totals.receivables),
            line("Assets", &totals.assets),
            line("Total assets", &totals.total_assets),
            line("Payables", &totals.payables),
            line("Credit cards", &totals.credit_card_debt),
            line("Long-term liabilities", &totals.long_term_liabilities),
            line("Short-term liabilities", &totals.short_term_liabilities),
            line("Total liabilities", &totals.total_liabilities),
            line("Net worth", &totals.net_worth),
        ];
        println!("{}", pretty_table(&["", "Amount"], rows));
    }
    Ok(())
}
