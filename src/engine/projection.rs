// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Day-by-day cash-flow forecast. Works on borrowed data and local cursors
//! only; nothing in the application state is touched.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::engine::{net_worth, recurrence, stats};
use crate::models::{Payable, Receivable, RecurringTransaction};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventSource {
    Recurring,
    Payable,
    Receivable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedEvent {
    pub source: EventSource,
    pub reference_id: Uuid,
    pub description: String,
    /// Positive for inflows, negative for outflows.
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedDay {
    pub date: NaiveDate,
    pub start_balance: Decimal,
    pub events: Vec<ProjectedEvent>,
    pub end_balance: Decimal,
}

/// Longest horizon the CLI accepts.
pub const MAX_PROJECTION_DAYS: u32 = 3650;

/// Simulated schedule of one rule.
struct RuleCursor<'a> {
    rule: &'a RecurringTransaction,
    due: NaiveDate,
    active: bool,
}

impl RuleCursor<'_> {
    fn step(&mut self) {
        let next = recurrence::next_occurrence_after(self.rule, self.due);
        if self.rule.end_date.is_some_and(|end| next > end) {
            self.active = false;
        } else {
            self.due = next;
        }
    }
}

/// Projects `days` days starting today, stopping early at the last
/// representable date. Each day opens with the previous
/// day's closing balance; recurring rules fire on their due dates (advanced
/// on a local copy), unpaid payables and receivables settle in full on their
/// due date.
pub fn project(
    days: u32,
    starting_balance: Decimal,
    rules: &[RecurringTransaction],
    payables: &[Payable],
    receivables: &[Receivable],
    today: NaiveDate,
) -> Vec<ProjectedDay> {
    let mut cursors: Vec<RuleCursor<'_>> = rules
        .iter()
        .filter(|r| r.is_active)
        .map(|rule| RuleCursor {
            rule,
            due: rule.next_due_date,
            active: true,
        })
        .collect();

    let mut balance = starting_balance;
    let mut out = Vec::with_capacity(days.min(MAX_PROJECTION_DAYS) as usize);

    for offset in 0..days {
        let Some(date) = today.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        let mut events = Vec::new();

        for cursor in cursors.iter_mut().filter(|c| c.active && c.due == date) {
            events.push(ProjectedEvent {
                source: EventSource::Recurring,
                reference_id: cursor.rule.id,
                description: cursor.rule.description.clone(),
                amount: cursor.rule.amount * cursor.rule.r#type.sign(),
            });
            cursor.step();
        }

        for p in payables.iter().filter(|p| p.due_date == date) {
            let remaining = stats::remaining(p.total_amount, stats::total_paid(&p.payments));
            if remaining > Decimal::ZERO {
                events.push(ProjectedEvent {
                    source: EventSource::Payable,
                    reference_id: p.id,
                    description: format!("{}: {}", p.counterparty_name, p.description),
                    amount: -remaining,
                });
            }
        }

        for r in receivables.iter().filter(|r| r.due_date == date) {
            let remaining = stats::remaining(r.total_amount, stats::total_paid(&r.payments));
            if remaining > Decimal::ZERO {
                events.push(ProjectedEvent {
                    source: EventSource::Receivable,
                    reference_id: r.id,
                    description: format!("{}: {}", r.counterparty_name, r.description),
                    amount: remaining,
                });
            }
        }

        let start_balance = balance;
        balance += events.iter().map(|e| e.amount).sum::<Decimal>();
        out.push(ProjectedDay {
            date,
            start_balance,
            events,
            end_balance: balance,
        });
    }
    out
}

/// Liquid money available today: every bank balance plus cash on hand.
pub fn starting_balance(state: &AppState) -> Decimal {
    let banks: Decimal = state.bank_accounts.iter().map(|a| a.current_balance).sum();
    banks + net_worth::cash_balance(state)
}

pub fn project_state(state: &AppState, days: u32, today: NaiveDate) -> Vec<ProjectedDay> {
    project(
        days,
        starting_balance(state),
        &state.recurring_transactions,
        &state.payables,
        &state.receivables,
        today,
    )
}
