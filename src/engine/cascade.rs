// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Strips payments and goal contributions whose funding transaction was deleted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::engine::stats;
use crate::models::{Contribution, FinancialGoal, Payment};
use crate::state::AppState;

/// Entities whose payments or contributions were stripped by a cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub receivables: Vec<Uuid>,
    pub payables: Vec<Uuid>,
    pub short_term_liabilities: Vec<Uuid>,
    pub long_term_liabilities: Vec<Uuid>,
    pub financial_goals: Vec<Uuid>,
}

impl CascadeReport {
    pub fn is_empty(&self) -> bool {
        self.receivables.is_empty()
            && self.payables.is_empty()
            && self.short_term_liabilities.is_empty()
            && self.long_term_liabilities.is_empty()
            && self.financial_goals.is_empty()
    }

    pub fn touched(&self) -> usize {
        self.receivables.len()
            + self.payables.len()
            + self.short_term_liabilities.len()
            + self.long_term_liabilities.len()
            + self.financial_goals.len()
    }
}

fn strip_payments(payments: &mut Vec<Payment>, txn_id: Uuid) -> bool {
    let before = payments.len();
    payments.retain(|p| p.transaction_id != Some(txn_id));
    payments.len() != before
}

fn strip_contributions(contributions: &mut Vec<Contribution>, txn_id: Uuid) -> bool {
    let before = contributions.len();
    contributions.retain(|c| c.transaction_id != Some(txn_id));
    contributions.len() != before
}

/// Recomputes `current_amount` from contributions and sets or clears
/// `achieved_date` when the target is crossed.
pub fn refresh_goal(goal: &mut FinancialGoal, today: NaiveDate) {
    goal.current_amount = goal
        .contributions
        .iter()
        .map(|c| c.amount)
        .sum::<Decimal>();
    if goal.current_amount >= goal.target_amount {
        if goal.achieved_date.is_none() {
            goal.achieved_date = Some(today);
        }
    } else {
        goal.achieved_date = None;
    }
}

/// Strips every payment and contribution generated by `txn_id` from all five
/// dependent collections and refreshes what depends on them. All collections
/// are scanned even after a match.
pub fn cascade_transaction_delete(state: &mut AppState, txn_id: Uuid, today: NaiveDate) -> CascadeReport {
    let window = state.user_settings.upcoming_window_days;
    let mut report = CascadeReport::default();

    for r in state.receivables.iter_mut() {
        if strip_payments(&mut r.payments, txn_id) {
            stats::refresh_receivable_status(r, today, window);
            report.receivables.push(r.id);
        }
    }
    for p in state.payables.iter_mut() {
        if strip_payments(&mut p.payments, txn_id) {
            stats::refresh_payable_status(p, today, window);
            report.payables.push(p.id);
        }
    }
    for l in state.short_term_liabilities.iter_mut() {
        if strip_payments(&mut l.payments, txn_id) {
            stats::refresh_short_term_status(l, today, window);
            report.short_term_liabilities.push(l.id);
        }
    }
    for l in state.long_term_liabilities.iter_mut() {
        if strip_payments(&mut l.payments, txn_id) {
            report.long_term_liabilities.push(l.id);
        }
    }
    for g in state.financial_goals.iter_mut() {
        if strip_contributions(&mut g.contributions, txn_id) {
            refresh_goal(g, today);
            report.financial_goals.push(g.id);
        }
    }

    if !report.is_empty() {
        debug!(txn = %txn_id, touched = report.touched(), "cascaded transaction delete");
    }
    report
}
