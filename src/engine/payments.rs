// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Receivables, payables, liabilities and goals: registration plus the
//! payments and contributions recorded against them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::engine::{cascade, ledger, stats};
use crate::error::{CoreError, Result, ensure_positive};
use crate::models::{
    Asset, Contribution, FinancialGoal, LongTermLiability, Payable, Payment, PaymentMethod,
    PaymentStatus, PaymentStructure, Receivable, ShortTermLiability, TransactionDraft,
    TransactionType,
};
use crate::settings::{DEBT_PAYMENT_CATEGORY, RECEIVABLE_CATEGORY, SAVINGS_CATEGORY};
use crate::state::AppState;

/// Entity a payment is recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentTarget {
    Receivable(Uuid),
    Payable(Uuid),
    ShortTerm(Uuid),
    LongTerm(Uuid),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInput {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub bank_account_id: Option<Uuid>,
    /// Record a matching ledger transaction and link it to the payment.
    pub create_transaction: bool,
}

impl PaymentInput {
    pub fn cash(amount: Decimal, date: NaiveDate) -> Self {
        Self {
            amount,
            date,
            payment_method: PaymentMethod::Cash,
            bank_account_id: None,
            create_transaction: true,
        }
    }

    pub fn from_bank(amount: Decimal, date: NaiveDate, bank_account_id: Uuid) -> Self {
        Self {
            amount,
            date,
            payment_method: PaymentMethod::BankTransfer,
            bank_account_id: Some(bank_account_id),
            create_transaction: true,
        }
    }
}

pub struct NewObligation<'a> {
    pub counterparty_name: &'a str,
    pub description: &'a str,
    pub total_amount: Decimal,
    pub due_date: NaiveDate,
}

fn check_counterparty(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("counterparty name is required"));
    }
    Ok(())
}

pub fn add_receivable(state: &mut AppState, input: NewObligation<'_>, today: NaiveDate) -> Result<Uuid> {
    check_counterparty(input.counterparty_name)?;
    ensure_positive(input.total_amount, "Total amount")?;
    let mut r = Receivable {
        id: Uuid::new_v4(),
        counterparty_name: input.counterparty_name.trim().to_string(),
        description: input.description.trim().to_string(),
        total_amount: input.total_amount,
        due_date: input.due_date,
        created_at: today,
        payments: Vec::new(),
        status: PaymentStatus::Pending,
    };
    stats::refresh_receivable_status(&mut r, today, state.user_settings.upcoming_window_days);
    let id = r.id;
    state.receivables.push(r);
    Ok(id)
}

pub fn add_payable(state: &mut AppState, input: NewObligation<'_>, today: NaiveDate) -> Result<Uuid> {
    check_counterparty(input.counterparty_name)?;
    ensure_positive(input.total_amount, "Total amount")?;
    let mut p = Payable {
        id: Uuid::new_v4(),
        counterparty_name: input.counterparty_name.trim().to_string(),
        description: input.description.trim().to_string(),
        total_amount: input.total_amount,
        due_date: input.due_date,
        created_at: today,
        payments: Vec::new(),
        status: PaymentStatus::Pending,
    };
    stats::refresh_payable_status(&mut p, today, state.user_settings.upcoming_window_days);
    let id = p.id;
    state.payables.push(p);
    Ok(id)
}

pub fn add_short_term_liability(
    state: &mut AppState,
    mut liability: ShortTermLiability,
    today: NaiveDate,
) -> Result<Uuid> {
    ensure_positive(liability.original_amount, "Original amount")?;
    if liability
        .payment_day_of_month
        .is_some_and(|d| !(1..=31).contains(&d))
    {
        return Err(CoreError::validation("payment day must be between 1 and 31"));
    }
    if liability.payment_structure == PaymentStructure::Installments
        && liability.number_of_installments == 0
    {
        liability.payment_structure = PaymentStructure::Single;
    }
    liability.id = Uuid::new_v4();
    liability.payments.clear();
    stats::refresh_short_term_status(&mut liability, today, state.user_settings.upcoming_window_days);
    let id = liability.id;
    state.short_term_liabilities.push(liability);
    Ok(id)
}

pub fn add_long_term_liability(state: &mut AppState, mut liability: LongTermLiability) -> Result<Uuid> {
    ensure_positive(liability.original_amount, "Original amount")?;
    if liability.monthly_payment < Decimal::ZERO || liability.interest_rate < Decimal::ZERO {
        return Err(CoreError::validation(
            "monthly payment and interest rate cannot be negative",
        ));
    }
    liability.id = Uuid::new_v4();
    liability.payments.clear();
    let id = liability.id;
    state.long_term_liabilities.push(liability);
    Ok(id)
}

pub fn add_goal(
    state: &mut AppState,
    name: &str,
    target_amount: Decimal,
    target_date: Option<NaiveDate>,
) -> Result<Uuid> {
    ensure_positive(target_amount, "Target amount")?;
    let goal = FinancialGoal {
        id: Uuid::new_v4(),
        name: name.trim().to_string(),
        target_amount,
        current_amount: Decimal::ZERO,
        target_date,
        achieved_date: None,
        contributions: Vec::new(),
    };
    let id = goal.id;
    state.financial_goals.push(goal);
    Ok(id)
}

pub fn add_asset(
    state: &mut AppState,
    name: &str,
    acquisition_cost: Decimal,
    current_value: Option<Decimal>,
) -> Result<Uuid> {
    if acquisition_cost < Decimal::ZERO || current_value.is_some_and(|v| v < Decimal::ZERO) {
        return Err(CoreError::validation("asset values cannot be negative"));
    }
    let asset = Asset {
        id: Uuid::new_v4(),
        name: name.trim().to_string(),
        acquisition_cost,
        current_value,
    };
    let id = asset.id;
    state.assets.push(asset);
    Ok(id)
}

/// (remaining amount, label) of the payment target.
fn outstanding(state: &AppState, target: PaymentTarget) -> Result<(Decimal, String)> {
    Ok(match target {
        PaymentTarget::Receivable(id) => {
            let r = state.receivable(id)?;
            let paid = stats::total_paid(&r.payments);
            (stats::remaining(r.total_amount, paid), r.counterparty_name.clone())
        }
        PaymentTarget::Payable(id) => {
            let p = state.payable(id)?;
            let paid = stats::total_paid(&p.payments);
            (stats::remaining(p.total_amount, paid), p.counterparty_name.clone())
        }
        PaymentTarget::ShortTerm(id) => {
            let l = state.short_term_liability(id)?;
            let paid = stats::total_paid(&l.payments);
            (stats::remaining(l.original_amount, paid), l.name.clone())
        }
        PaymentTarget::LongTerm(id) => {
            let l = state.long_term_liability(id)?;
            (stats::long_term_stats(l).remaining_balance, l.name.clone())
        }
    })
}

fn payments_mut(state: &mut AppState, target: PaymentTarget) -> Result<&mut Vec<Payment>> {
    Ok(match target {
        PaymentTarget::Receivable(id) => &mut state.receivable_mut(id)?.payments,
        PaymentTarget::Payable(id) => &mut state.payable_mut(id)?.payments,
        PaymentTarget::ShortTerm(id) => &mut state.short_term_liability_mut(id)?.payments,
        PaymentTarget::LongTerm(id) => &mut state.long_term_liability_mut(id)?.payments,
    })
}

fn refresh_target(state: &mut AppState, target: PaymentTarget, today: NaiveDate) -> Result<()> {
    let window = state.user_settings.upcoming_window_days;
    match target {
        PaymentTarget::Receivable(id) => {
            stats::refresh_receivable_status(state.receivable_mut(id)?, today, window)
        }
        PaymentTarget::Payable(id) => stats::refresh_payable_status(state.payable_mut(id)?, today, window),
        PaymentTarget::ShortTerm(id) => {
            stats::refresh_short_term_status(state.short_term_liability_mut(id)?, today, window)
        }
        PaymentTarget::LongTerm(_) => {}
    }
    Ok(())
}

/// Records a payment and, unless told otherwise, the ledger transaction that
/// moved the money. The payment keeps the transaction id so deleting the
/// transaction later strips the payment again.
pub fn record_payment(
    state: &mut AppState,
    target: PaymentTarget,
    input: PaymentInput,
    today: NaiveDate,
) -> Result<Uuid> {
    ensure_positive(input.amount, "Payment amount")?;
    let (remaining, label) = outstanding(state, target)?;
    if input.amount > remaining {
        return Err(CoreError::validation(format!(
            "payment of {} exceeds the remaining {}",
            input.amount, remaining
        )));
    }
    if input.payment_method == PaymentMethod::CreditCard {
        return Err(CoreError::validation(
            "record card-funded payments as a credit card transaction",
        ));
    }
    if let Some(id) = input.bank_account_id {
        state.bank_account(id)?;
    }

    let transaction_id = if input.create_transaction {
        let (kind, category, description) = match target {
            PaymentTarget::Receivable(_) => (
                TransactionType::Income,
                RECEIVABLE_CATEGORY,
                format!("Payment from {}", label),
            ),
            _ => (
                TransactionType::Expense,
                DEBT_PAYMENT_CATEGORY,
                format!("Payment to {}", label),
            ),
        };
        let mut draft = TransactionDraft::new(
            input.date,
            description,
            input.amount,
            kind,
            category,
            input.payment_method,
        );
        draft.bank_account_id = input.bank_account_id;
        Some(ledger::create_transaction(state, draft)?)
    } else {
        None
    };

    let payment = Payment {
        id: Uuid::new_v4(),
        amount: input.amount,
        date: input.date,
        payment_method: input.payment_method,
        bank_account_id: input.bank_account_id,
        transaction_id,
    };
    let payment_id = payment.id;
    payments_mut(state, target)?.push(payment);
    refresh_target(state, target, today)?;
    debug!(payment = %payment_id, target = ?target, "recorded payment");
    Ok(payment_id)
}

/// Removes a payment. A linked transaction is deleted with it, which reverses
/// its balance effect and strips the payment through the cascade.
pub fn remove_payment(
    state: &mut AppState,
    target: PaymentTarget,
    payment_id: Uuid,
    today: NaiveDate,
) -> Result<()> {
    let payment = payments_mut(state, target)?
        .iter()
        .find(|p| p.id == payment_id)
        .cloned()
        .ok_or_else(|| CoreError::not_found("Payment", payment_id))?;

    match payment.transaction_id {
        Some(txn_id) if state.transaction(txn_id).is_ok() => {
            ledger::delete_transaction(state, txn_id, today)?;
        }
        _ => {
            payments_mut(state, target)?.retain(|p| p.id != payment_id);
            refresh_target(state, target, today)?;
        }
    }
    Ok(())
}

/// Adds money to a goal. Funded from a bank account, the contribution is
/// backed by a savings transfer transaction.
pub fn add_goal_contribution(
    state: &mut AppState,
    goal_id: Uuid,
    amount: Decimal,
    date: NaiveDate,
    bank_account_id: Option<Uuid>,
    today: NaiveDate,
) -> Result<Uuid> {
    ensure_positive(amount, "Contribution amount")?;
    let goal_name = state.goal(goal_id)?.name.clone();

    let transaction_id = match bank_account_id {
        Some(bank) => {
            let account = state.bank_account(bank)?;
            if account.current_balance < amount {
                return Err(CoreError::InsufficientFunds {
                    available: account.current_balance,
                    requested: amount,
                });
            }
            let draft = TransactionDraft::new(
                date,
                format!("Contribution to {}", goal_name),
                amount,
                TransactionType::Expense,
                SAVINGS_CATEGORY,
                PaymentMethod::BankTransfer,
            )
            .with_bank_account(bank);
            Some(ledger::create_transaction(state, draft)?)
        }
        None => None,
    };

    let contribution = Contribution {
        id: Uuid::new_v4(),
        amount,
        date,
        transaction_id,
    };
    let id = contribution.id;
    let goal = state.goal_mut(goal_id)?;
    goal.contributions.push(contribution);
    cascade::refresh_goal(goal, today);
    Ok(id)
}

pub fn remove_goal_contribution(
    state: &mut AppState,
    goal_id: Uuid,
    contribution_id: Uuid,
    today: NaiveDate,
) -> Result<()> {
    let contribution = state
        .goal(goal_id)?
        .contributions
        .iter()
        .find(|c| c.id == contribution_id)
        .cloned()
        .ok_or_else(|| CoreError::not_found("Contribution", contribution_id))?;

    match contribution.transaction_id {
        Some(txn_id) if state.transaction(txn_id).is_ok() => {
            ledger::delete_transaction(state, txn_id, today)?;
        }
        _ => {
            let goal = state.goal_mut(goal_id)?;
            goal.contributions.retain(|c| c.id != contribution_id);
            cascade::refresh_goal(goal, today);
        }
    }
    Ok(())
}
