// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! `payable` and `receivable` subcommands. Both share one argument layout and
//! differ only in which collection they touch.

use crate::engine::payments::{self, NewObligation, PaymentInput, PaymentTarget};
use crate::engine::stats;
use crate::state::AppState;
use crate::store::{KeyValueStore, Workspace};
use crate::utils::{
    date_or, fmt_money, maybe_print_json, opt_id, parse_date, parse_decimal, parse_id,
    pretty_table, req,
};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Payable,
    Receivable,
}

impl Side {
    fn target(self, id: Uuid) -> PaymentTarget {
        match self {
            Side::Payable => PaymentTarget::Payable(id),
            Side::Receivable => PaymentTarget::Receivable(id),
        }
    }
}

/// Builds the payment described by `--amount`, `--date`, `--account` and
/// `--no-transaction`.
pub fn payment_input(sub: &clap::ArgMatches, today: NaiveDate) -> Result<PaymentInput> {
    let amount = parse_decimal(req(sub, "amount")?)?;
    let date = date_or(sub, "date", today)?;
    let mut input = match opt_id(sub, "account")? {
        Some(bank) => PaymentInput::from_bank(amount, date, bank),
        None => PaymentInput::cash(amount, date),
    };
    input.create_transaction = !sub.get_flag("no-transaction");
    Ok(input)
}

pub fn handle<S: KeyValueStore>(
    ws: &mut Workspace<S>,
    side: Side,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let input = NewObligation {
                counterparty_name: req(sub, "name")?,
                description: req(sub, "desc")?,
                total_amount: parse_decimal(req(sub, "amount")?)?,
                due_date: parse_date(req(sub, "due")?)?,
            };
            let id = ws.apply(|s| match side {
                Side::Payable => payments::add_payable(s, input, today),
                Side::Receivable => payments::add_receivable(s, input, today),
            })?;
            println!("Added {:?} {}", side, id);
        }
        Some(("list", sub)) => {
            let data = obligation_rows(ws.state(), side, today);
            if !maybe_print_json(sub.get_flag("json"), &data)? {
                let ccy = &ws.state().user_settings.currency;
                let rows = data
                    .iter()
                    .map(|r| {
                        vec![
                            r.id.to_string(),
                            r.counterparty.clone(),
                            r.due_date.to_string(),
                            fmt_money(&r.total, ccy),
                            fmt_money(&r.paid, ccy),
                            fmt_money(&r.remaining, ccy),
                            r.status.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Id", "Counterparty", "Due", "Total", "Paid", "Remaining", "Status"],
                        rows
                    )
                );
            }
        }
        Some(("pay", sub)) => {
            let id = parse_id(req(sub, "id")?)?;
            let input = payment_input(sub, today)?;
            let amount = input.amount;
            let payment = ws.apply(|s| payments::record_payment(s, side.target(id), input, today))?;
            println!("Recorded payment {} of {} against {}", payment, amount, id);
        }
        Some(("unpay", sub)) => {
            let id = parse_id(req(sub, "id")?)?;
            let payment = parse_id(req(sub, "payment")?)?;
            ws.apply(|s| payments::remove_payment(s, side.target(id), payment, today))?;
            println!("Removed payment {}", payment);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObligationRow {
    pub id: Uuid,
    pub counterparty: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub total: Decimal,
    pub paid: Decimal,
    pub remaining: Decimal,
    pub status: String,
}

/// Rows ordered by due date, with stats derived for `today`.
pub fn obligation_rows(state: &AppState, side: Side, today: NaiveDate) -> Vec<ObligationRow> {
    let window = state.user_settings.upcoming_window_days;
    let mut rows: Vec<ObligationRow> = match side {
        Side::Payable => state
            .payables
            .iter()
            .map(|p| {
                let s = stats::payable_stats(p, today, window);
                ObligationRow {
                    id: p.id,
                    counterparty: p.counterparty_name.clone(),
                    description: p.description.clone(),
                    due_date: p.due_date,
                    total: p.total_amount,
                    paid: s.paid,
                    remaining: s.remaining,
                    status: s.status.label().to_string(),
                }
            })
            .collect(),
        Side::Receivable => state
            .receivables
            .iter()
            .map(|r| {
                let s = stats::receivable_stats(r, today, window);
                ObligationRow {
                    id: r.id,
                    counterparty: r.counterparty_name.clone(),
                    description: r.description.clone(),
                    due_date: r.due_date,
                    total: r.total_amount,
                    paid: s.paid,
                    remaining: s.remaining,
                    status: s.status.label().to_string(),
                }
            })
            .collect(),
    };
    rows.sort_by_key(|r| r.due_date);
    rows
}
