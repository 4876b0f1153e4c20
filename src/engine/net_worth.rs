// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::engine::stats;
use crate::models::{NetWorthSnapshot, PaymentMethod, Transaction, TransactionType};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorth {
    pub bank_balances: Decimal,
    pub cash_balance: Decimal,
    pub receivables: Decimal,
    pub assets: Decimal,
    pub total_assets: Decimal,
    pub payables: Decimal,
    pub credit_card_debt: Decimal,
    pub long_term_liabilities: Decimal,
    pub short_term_liabilities: Decimal,
    pub total_liabilities: Decimal,
    pub net_worth: Decimal,
}

/// Cash on hand: signed sum of cash transactions, less money moved from cash
/// into a bank through the cash-deposit category.
pub fn cash_balance(state: &AppState) -> Decimal {
    let deposit_category = &state.user_settings.cash_deposit_category;
    state
        .transactions
        .iter()
        .map(|t| {
            if t.payment_method == PaymentMethod::Cash {
                t.amount * t.r#type.sign()
            } else if is_cash_deposit(t, deposit_category) {
                -t.amount
            } else {
                Decimal::ZERO
            }
        })
        .sum()
}

/// Bank side of a `deposit_cash` posting.
fn is_cash_deposit(t: &Transaction, deposit_category: &str) -> bool {
    t.r#type == TransactionType::Income
        && t.bank_account_id.is_some()
        && t.category_id == deposit_category
}

pub fn compute_net_worth(state: &AppState) -> NetWorth {
    let bank_balances: Decimal = state.bank_accounts.iter().map(|a| a.current_balance).sum();
    let cash_balance = cash_balance(state);
    let receivables: Decimal = state
        .receivables
        .iter()
        .map(|r| stats::remaining(r.total_amount, stats::total_paid(&r.payments)))
        .sum();
    let assets: Decimal = state.assets.iter().map(|a| a.valuation()).sum();
    let total_assets = bank_balances + cash_balance + receivables + assets;

    let payables: Decimal = state
        .payables
        .iter()
        .map(|p| stats::remaining(p.total_amount, stats::total_paid(&p.payments)))
        .sum();
    let credit_card_debt: Decimal = state.credit_cards.iter().map(|c| c.outstanding()).sum();
    let long_term_liabilities: Decimal = state
        .long_term_liabilities
        .iter()
        .map(|l| stats::long_term_stats(l).remaining_balance)
        .sum();
    let short_term_liabilities: Decimal = state
        .short_term_liabilities
        .iter()
        .map(|l| stats::remaining(l.original_amount, stats::total_paid(&l.payments)))
        .sum();
    let total_liabilities =
        payables + credit_card_debt + long_term_liabilities + short_term_liabilities;

    NetWorth {
        bank_balances,
        cash_balance,
        receivables,
        assets,
        total_assets,
        payables,
        credit_card_debt,
        long_term_liabilities,
        short_term_liabilities,
        total_liabilities,
        net_worth: total_assets - total_liabilities,
    }
}

/// Stores today's totals. A snapshot already taken today is overwritten.
pub fn record_snapshot(state: &mut AppState, today: NaiveDate) -> NetWorthSnapshot {
    let totals = compute_net_worth(state);
    let snapshot = NetWorthSnapshot {
        date: today,
        assets: totals.total_assets,
        liabilities: totals.total_liabilities,
        net_worth: totals.net_worth,
    };
    match state
        .net_worth_snapshots
        .iter_mut()
        .find(|s| s.date == today)
    {
        Some(existing) => *existing = snapshot.clone(),
        None => {
            state.net_worth_snapshots.push(snapshot.clone());
            state.net_worth_snapshots.sort_by_key(|s| s.date);
        }
    }
    debug!(date = %today, net_worth = %snapshot.net_worth, "recorded net worth snapshot");
    snapshot
}
