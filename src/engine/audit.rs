// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Consistency checks over the stored state.
//!
//! Bank and card balances are maintained incrementally, so a crash or a hand
//! edit can leave them out of step with the ledger. Replaying every
//! transaction's balance effect from the opening balances recovers what the
//! balances should be and exposes any drift.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::engine::ledger::balance_effect;
use crate::models::Payment;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDrift {
    pub id: Uuid,
    pub name: String,
    pub stored: Decimal,
    pub replayed: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Issue {
    BankBalanceDrift(BalanceDrift),
    CardBalanceDrift(BalanceDrift),
    UnknownBankAccount { transaction_id: Uuid, bank_account_id: Uuid },
    UnknownCreditCard { transaction_id: Uuid, credit_card_id: Uuid },
    UnknownCategory { transaction_id: Uuid, category_id: String },
    DanglingPayment { owner_id: Uuid, payment_id: Uuid, transaction_id: Uuid },
}

impl Issue {
    pub fn code(&self) -> &'static str {
        match self {
            Issue::BankBalanceDrift(_) => "bank_balance_drift",
            Issue::CardBalanceDrift(_) => "card_balance_drift",
            Issue::UnknownBankAccount { .. } => "txn_unknown_bank_account",
            Issue::UnknownCreditCard { .. } => "txn_unknown_credit_card",
            Issue::UnknownCategory { .. } => "txn_unknown_category",
            Issue::DanglingPayment { .. } => "payment_missing_transaction",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Issue::BankBalanceDrift(d) | Issue::CardBalanceDrift(d) => format!(
                "{}: stored {} but ledger replays to {}",
                d.name, d.stored, d.replayed
            ),
            Issue::UnknownBankAccount {
                transaction_id,
                bank_account_id,
            } => format!("{} -> {}", transaction_id, bank_account_id),
            Issue::UnknownCreditCard {
                transaction_id,
                credit_card_id,
            } => format!("{} -> {}", transaction_id, credit_card_id),
            Issue::UnknownCategory {
                transaction_id,
                category_id,
            } => format!("{} -> {}", transaction_id, category_id),
            Issue::DanglingPayment {
                owner_id,
                payment_id,
                transaction_id,
            } => format!("{} payment {} -> {}", owner_id, payment_id, transaction_id),
        }
    }
}

/// Balances each account and card would have if every ledger entry were
/// applied to its opening balance.
pub fn replay_balances(state: &AppState) -> (HashMap<Uuid, Decimal>, HashMap<Uuid, Decimal>) {
    let mut banks: HashMap<Uuid, Decimal> = state
        .bank_accounts
        .iter()
        .map(|a| (a.id, a.opening_balance))
        .collect();
    let mut cards: HashMap<Uuid, Decimal> = state
        .credit_cards
        .iter()
        .map(|c| (c.id, c.opening_available()))
        .collect();

    for txn in &state.transactions {
        let effect = balance_effect(txn);
        if let Some((id, delta)) = effect.bank {
            if let Some(bal) = banks.get_mut(&id) {
                *bal += delta;
            }
        }
        if let Some((id, delta)) = effect.card {
            if let Some(bal) = cards.get_mut(&id) {
                *bal += delta;
            }
        }
    }
    (banks, cards)
}

fn dangling<'a>(
    owner_id: Uuid,
    payments: &'a [Payment],
    known: &'a HashSet<Uuid>,
) -> impl Iterator<Item = Issue> + 'a {
    payments.iter().filter_map(move |p| {
        let txn = p.transaction_id?;
        (!known.contains(&txn)).then_some(Issue::DanglingPayment {
            owner_id,
            payment_id: p.id,
            transaction_id: txn,
        })
    })
}

pub fn audit(state: &AppState) -> Vec<Issue> {
    let mut issues = Vec::new();
    let (banks, cards) = replay_balances(state);

    for account in &state.bank_accounts {
        let replayed = banks
            .get(&account.id)
            .copied()
            .unwrap_or(account.opening_balance);
        if replayed != account.current_balance {
            warn!(account = %account.id, stored = %account.current_balance, %replayed, "bank balance drift");
            issues.push(Issue::BankBalanceDrift(BalanceDrift {
                id: account.id,
                name: account.account_name.clone(),
                stored: account.current_balance,
                replayed,
            }));
        }
    }
    for card in &state.credit_cards {
        let replayed = cards
            .get(&card.id)
            .copied()
            .unwrap_or_else(|| card.opening_available());
        if replayed != card.available_balance {
            warn!(card = %card.id, stored = %card.available_balance, %replayed, "credit card balance drift");
            issues.push(Issue::CardBalanceDrift(BalanceDrift {
                id: card.id,
                name: card.card_name.clone(),
                stored: card.available_balance,
                replayed,
            }));
        }
    }

    for txn in &state.transactions {
        if let Some(id) = txn.bank_account_id {
            if !banks.contains_key(&id) {
                issues.push(Issue::UnknownBankAccount {
                    transaction_id: txn.id,
                    bank_account_id: id,
                });
            }
        }
        if let Some(id) = txn.credit_card_id {
            if !cards.contains_key(&id) {
                issues.push(Issue::UnknownCreditCard {
                    transaction_id: txn.id,
                    credit_card_id: id,
                });
            }
        }
        if state.category(&txn.category_id).is_none() {
            issues.push(Issue::UnknownCategory {
                transaction_id: txn.id,
                category_id: txn.category_id.clone(),
            });
        }
    }

    let known: HashSet<Uuid> = state.transactions.iter().map(|t| t.id).collect();
    for r in &state.receivables {
        issues.extend(dangling(r.id, &r.payments, &known));
    }
    for p in &state.payables {
        issues.extend(dangling(p.id, &p.payments, &known));
    }
    for l in &state.short_term_liabilities {
        issues.extend(dangling(l.id, &l.payments, &known));
    }
    for l in &state.long_term_liabilities {
        issues.extend(dangling(l.id, &l.payments, &known));
    }
    issues
}

/// Overwrites stored balances with their replayed values. Returns how many
/// balances changed.
pub fn repair_balances(state: &mut AppState) -> usize {
    let (banks, cards) = replay_balances(state);
    let mut fixed = 0;
    for account in &mut state.bank_accounts {
        if let Some(&replayed) = banks.get(&account.id) {
            if replayed != account.current_balance {
                account.current_balance = replayed;
                fixed += 1;
            }
        }
    }
    for card in &mut state.credit_cards {
        if let Some(&replayed) = cards.get(&card.id) {
            if replayed != card.available_balance {
                card.available_balance = replayed;
                fixed += 1;
            }
        }
    }
    fixed
}
