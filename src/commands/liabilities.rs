// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::obligations::payment_input;
use crate::engine::payments::{self, PaymentTarget};
use crate::engine::stats;
use crate::models::{
    LongTermLiability, PaymentStatus, PaymentStructure, ShortTermLiability,
};
use crate::state::AppState;
use crate::store::{KeyValueStore, Workspace};
use crate::utils::{
    date_or, fmt_opt_date, maybe_print_json, parse_date, parse_decimal, parse_id, pretty_table,
    req,
};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

pub fn handle<S: KeyValueStore>(
    ws: &mut Workspace<S>,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    match m.subcommand() {
        Some(("add-long", sub)) => {
            let liability = LongTermLiability {
                id: Uuid::nil(),
                name: req(sub, "name")?.to_string(),
                original_amount: parse_decimal(req(sub, "amount")?)?,
                monthly_payment: parse_decimal(req(sub, "monthly")?)?,
                interest_rate: parse_decimal(req(sub, "rate")?)?,
                start_date: date_or(sub, "start", today)?,
                payments: Vec::new(),
            };
            let id = ws.apply(|s| payments::add_long_term_liability(s, liability))?;
            println!("Added long-term liability {}", id);
        }
        Some(("add-short", sub)) => {
            let installments = sub.get_one::<u32>("installments").copied().unwrap_or(0);
            let liability = ShortTermLiability {
                id: Uuid::nil(),
                name: req(sub, "name")?.to_string(),
                original_amount: parse_decimal(req(sub, "amount")?)?,
                due_date: parse_date(req(sub, "due")?)?,
                created_at: today,
                payment_structure: if installments > 0 {
                    PaymentStructure::Installments
                } else {
                    PaymentStructure::Single
                },
                number_of_installments: installments,
                payment_day_of_month: sub.get_one::<u32>("day").copied(),
                payments: Vec::new(),
                status: PaymentStatus::Pending,
            };
            let id = ws.apply(|s| payments::add_short_term_liability(s, liability, today))?;
            println!("Added short-term liability {}", id);
        }
        Some(("list", sub)) => {
            let data = liability_rows(ws.state(), today);
            if !maybe_print_json(sub.get_flag("json"), &data)? {
                let rows = data
                    .iter()
                    .map(|r| {
                        vec![
                            r.id.to_string(),
                            r.kind.to_string(),
                            r.name.clone(),
                            r.original.to_string(),
                            r.paid.to_string(),
                            r.remaining.to_string(),
                            fmt_opt_date(r.next_due),
                            r.status.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Id", "Kind", "Name", "Original", "Paid", "Remaining", "Next due", "Status"],
                        rows
                    )
                );
            }
        }
        Some(("pay", sub)) => {
            let id = parse_id(req(sub, "id")?)?;
            let target = if ws.state().short_term_liability(id).is_ok() {
                PaymentTarget::ShortTerm(id)
            } else {
                PaymentTarget::LongTerm(id)
            };
            let input = payment_input(sub, today)?;
            let payment = ws.apply(|s| payments::record_payment(s, target, input, today))?;
            println!("Recorded payment {} against {}", payment, id);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiabilityRow {
    pub id: Uuid,
    pub kind: &'static str,
    pub name: String,
    pub original: Decimal,
    pub paid: Decimal,
    pub remaining: Decimal,
    pub next_due: Option<NaiveDate>,
    pub status: String,
}

pub fn liability_rows(state: &AppState, today: NaiveDate) -> Vec<LiabilityRow> {
    let window = state.user_settings.upcoming_window_days;
    let short = state.short_term_liabilities.iter().map(|l| {
        let s = stats::short_term_stats(l, today, window);
        LiabilityRow {
            id: l.id,
            kind: "short",
            name: l.name.clone(),
            original: l.original_amount,
            paid: s.paid,
            remaining: s.remaining,
            next_due: s.next_installment_due_date.or(Some(l.due_date)),
            status: s.status.label().to_string(),
        }
    });
    let long = state.long_term_liabilities.iter().map(|l| {
        let s = stats::long_term_stats(l);
        LiabilityRow {
            id: l.id,
            kind: "long",
            name: l.name.clone(),
            original: l.original_amount,
            paid: s.total_paid,
            remaining: s.remaining_balance,
            next_due: None,
            status: match (s.is_paid_off, s.months_remaining) {
                (true, _) => "paid off".to_string(),
                (false, Some(n)) => format!("{} months left", n),
                (false, None) => "open".to_string(),
            },
        }
    });
    short.chain(long).collect()
}
