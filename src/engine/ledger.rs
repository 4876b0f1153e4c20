// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction CRUD and the bank / credit card balance bookkeeping that rides on it.
//!
//! Balances are adjusted incrementally: creating a transaction applies its
//! effect, updating reverses the old effect before applying the new one, and
//! deleting reverses it. Every mutation runs against staged copies of the
//! account and card lists so a rejected operation leaves the state untouched.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::engine::cascade::{self, CascadeReport};
use crate::engine::net_worth;
use crate::error::{CoreError, Result, ensure_positive};
use crate::models::{
    BankAccount, Category, CreditCard, PaymentMethod, Transaction, TransactionDraft,
    TransactionType,
};
use crate::settings::CARD_PAYMENT_CATEGORY;
use crate::state::AppState;

/// Signed balance changes a transaction causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalanceEffect {
    pub bank: Option<(Uuid, Decimal)>,
    pub card: Option<(Uuid, Decimal)>,
}

impl BalanceEffect {
    fn negated(self) -> Self {
        Self {
            bank: self.bank.map(|(id, d)| (id, -d)),
            card: self.card.map(|(id, d)| (id, -d)),
        }
    }
}

pub fn balance_effect(txn: &Transaction) -> BalanceEffect {
    let bank = txn.bank_account_id.and_then(|id| match txn.r#type {
        TransactionType::Income => Some((id, txn.amount)),
        TransactionType::Expense if txn.payment_method.debits_bank() => Some((id, -txn.amount)),
        TransactionType::Expense => None,
    });
    let card = match (txn.credit_card_id, txn.r#type) {
        (Some(id), TransactionType::Expense) if txn.payment_method == PaymentMethod::CreditCard => {
            Some((id, -txn.amount))
        }
        // paying the card off from another source restores its available credit
        (Some(id), TransactionType::Expense) if txn.category_id == CARD_PAYMENT_CATEGORY => {
            Some((id, txn.amount))
        }
        _ => None,
    };
    BalanceEffect { bank, card }
}

/// Copies of the balance-carrying collections that a mutation works on.
struct Staged {
    accounts: Vec<BankAccount>,
    cards: Vec<CreditCard>,
}

impl Staged {
    fn of(state: &AppState) -> Self {
        Self {
            accounts: state.bank_accounts.clone(),
            cards: state.credit_cards.clone(),
        }
    }

    fn commit(self, state: &mut AppState) {
        state.bank_accounts = self.accounts;
        state.credit_cards = self.cards;
    }

    /// Applies an effect, refusing unknown accounts and over-limit card activity.
    fn apply(&mut self, effect: BalanceEffect) -> Result<()> {
        if let Some((id, delta)) = effect.bank {
            let account = self
                .accounts
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| CoreError::not_found("Bank account", id))?;
            account.current_balance += delta;
        }
        if let Some((id, delta)) = effect.card {
            let card = self
                .cards
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| CoreError::not_found("Credit card", id))?;
            let next = card.available_balance + delta;
            if next < Decimal::ZERO {
                return Err(CoreError::CreditLimitExceeded {
                    available: card.available_balance,
                    requested: -delta,
                });
            }
            if next > card.credit_limit {
                return Err(CoreError::validation(format!(
                    "payment of {} exceeds the outstanding balance of {}",
                    delta,
                    card.outstanding()
                )));
            }
            card.available_balance = next;
        }
        Ok(())
    }

    /// Undoes an effect. Accounts or cards deleted since are skipped.
    fn reverse(&mut self, effect: BalanceEffect) {
        let effect = effect.negated();
        if let Some((id, delta)) = effect.bank {
            match self.accounts.iter_mut().find(|a| a.id == id) {
                Some(account) => account.current_balance += delta,
                None => warn!(account = %id, "skipping reversal for missing bank account"),
            }
        }
        if let Some((id, delta)) = effect.card {
            match self.cards.iter_mut().find(|c| c.id == id) {
                Some(card) => {
                    card.available_balance += delta;
                    if card.available_balance < Decimal::ZERO
                        || card.available_balance > card.credit_limit
                    {
                        warn!(
                            card = %id,
                            available = %card.available_balance,
                            limit = %card.credit_limit,
                            "credit card balance left its limits after reversal"
                        );
                    }
                }
                None => warn!(card = %id, "skipping reversal for missing credit card"),
            }
        }
    }
}

fn validate(txn: &Transaction) -> Result<()> {
    ensure_positive(txn.amount, "Transaction amount")?;
    if !txn.splits.is_empty() {
        let total: Decimal = txn.splits.iter().map(|s| s.amount).sum();
        if total != txn.amount {
            return Err(CoreError::validation(format!(
                "split lines add up to {} but the transaction is {}",
                total, txn.amount
            )));
        }
        if txn.splits.iter().any(|s| s.amount <= Decimal::ZERO) {
            return Err(CoreError::validation("split line amounts must be positive"));
        }
    }
    Ok(())
}

fn sort_ledger(state: &mut AppState) {
    // stable: same-day entries keep insertion order, newest first
    state.transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

pub fn create_transaction(state: &mut AppState, draft: TransactionDraft) -> Result<Uuid> {
    let txn = draft.into_transaction(Uuid::new_v4());
    validate(&txn)?;
    let mut staged = Staged::of(state);
    staged.apply(balance_effect(&txn))?;
    staged.commit(state);

    debug!(id = %txn.id, amount = %txn.amount, kind = ?txn.r#type, "created transaction");
    let id = txn.id;
    state.transactions.insert(0, txn);
    sort_ledger(state);
    Ok(id)
}

/// Replaces a stored transaction, moving its balance effect from the old
/// fields to the new ones.
pub fn update_transaction(state: &mut AppState, txn: Transaction) -> Result<()> {
    let old = state.transaction(txn.id)?.clone();
    validate(&txn)?;
    let mut staged = Staged::of(state);
    staged.reverse(balance_effect(&old));
    staged.apply(balance_effect(&txn))?;
    staged.commit(state);

    let id = txn.id;
    debug!(id = %id, "updated transaction");
    *state.transaction_mut(id)? = txn;
    sort_ledger(state);
    Ok(())
}

/// Removes a transaction, undoes its balance effect and strips any payment or
/// contribution that pointed at it.
pub fn delete_transaction(state: &mut AppState, id: Uuid, today: NaiveDate) -> Result<CascadeReport> {
    let old = state.transaction(id)?.clone();
    let mut staged = Staged::of(state);
    staged.reverse(balance_effect(&old));
    staged.commit(state);
    state.transactions.retain(|t| t.id != id);
    debug!(id = %id, "deleted transaction");
    Ok(cascade::cascade_transaction_delete(state, id, today))
}

pub fn add_bank_account(
    state: &mut AppState,
    account_name: &str,
    bank_name: &str,
    opening_balance: Decimal,
) -> Result<Uuid> {
    if account_name.trim().is_empty() {
        return Err(CoreError::validation("account name is required"));
    }
    let account = BankAccount {
        id: Uuid::new_v4(),
        account_name: account_name.trim().to_string(),
        bank_name: bank_name.trim().to_string(),
        current_balance: opening_balance,
        opening_balance,
    };
    let id = account.id;
    state.bank_accounts.push(account);
    Ok(id)
}

pub fn remove_bank_account(state: &mut AppState, id: Uuid) -> Result<()> {
    state.bank_account(id)?;
    if state.transactions.iter().any(|t| t.bank_account_id == Some(id)) {
        return Err(CoreError::validation(
            "bank account still has transactions; delete them first",
        ));
    }
    state.bank_accounts.retain(|a| a.id != id);
    Ok(())
}

pub fn add_credit_card(
    state: &mut AppState,
    card_name: &str,
    credit_limit: Decimal,
    available_balance: Option<Decimal>,
) -> Result<Uuid> {
    ensure_positive(credit_limit, "Credit limit")?;
    let available = available_balance.unwrap_or(credit_limit);
    if available < Decimal::ZERO || available > credit_limit {
        return Err(CoreError::validation(
            "available balance must be between zero and the credit limit",
        ));
    }
    let card = CreditCard {
        id: Uuid::new_v4(),
        card_name: card_name.trim().to_string(),
        credit_limit,
        available_balance: available,
        opening_available: Some(available),
    };
    let id = card.id;
    state.credit_cards.push(card);
    Ok(id)
}

pub fn remove_credit_card(state: &mut AppState, id: Uuid) -> Result<()> {
    state.credit_card(id)?;
    if state.transactions.iter().any(|t| t.credit_card_id == Some(id)) {
        return Err(CoreError::validation(
            "credit card still has transactions; delete them first",
        ));
    }
    state.credit_cards.retain(|c| c.id != id);
    Ok(())
}

pub fn add_category(state: &mut AppState, category: Category) -> Result<()> {
    if state.category(&category.id).is_some() {
        return Err(CoreError::DuplicateConstraint(format!(
            "category '{}' already exists",
            category.id
        )));
    }
    state.categories.push(category);
    Ok(())
}

/// Moves money between two bank accounts as an expense/income pair.
pub fn transfer_between_accounts(
    state: &mut AppState,
    from: Uuid,
    to: Uuid,
    amount: Decimal,
    date: NaiveDate,
) -> Result<(Uuid, Uuid)> {
    ensure_positive(amount, "Transfer amount")?;
    if from == to {
        return Err(CoreError::validation("cannot transfer to the same account"));
    }
    let source = state.bank_account(from)?;
    let target = state.bank_account(to)?;
    if source.current_balance < amount {
        return Err(CoreError::InsufficientFunds {
            available: source.current_balance,
            requested: amount,
        });
    }
    let category = state.user_settings.transfer_category.clone();
    let out_desc = format!("Transfer to {}", target.account_name);
    let in_desc = format!("Transfer from {}", source.account_name);

    let out_id = create_transaction(
        state,
        TransactionDraft::new(
            date,
            out_desc,
            amount,
            TransactionType::Expense,
            category.clone(),
            PaymentMethod::BankTransfer,
        )
        .with_bank_account(from),
    )?;
    let in_id = create_transaction(
        state,
        TransactionDraft::new(
            date,
            in_desc,
            amount,
            TransactionType::Income,
            category,
            PaymentMethod::BankTransfer,
        )
        .with_bank_account(to),
    )?;
    Ok((out_id, in_id))
}

/// Settles part or all of a card's outstanding balance, from a bank account
/// when one is given and from cash otherwise.
pub fn pay_credit_card(
    state: &mut AppState,
    card_id: Uuid,
    bank_account_id: Option<Uuid>,
    amount: Decimal,
    date: NaiveDate,
) -> Result<Uuid> {
    ensure_positive(amount, "Payment amount")?;
    let card = state.credit_card(card_id)?;
    if amount > card.outstanding() {
        return Err(CoreError::validation(format!(
            "payment of {} exceeds the outstanding balance of {}",
            amount,
            card.outstanding()
        )));
    }
    let description = format!("Payment to {}", card.card_name);
    let available = match bank_account_id {
        Some(id) => state.bank_account(id)?.current_balance,
        None => net_worth::cash_balance(state),
    };
    if available < amount {
        return Err(CoreError::InsufficientFunds {
            available,
            requested: amount,
        });
    }
    let method = if bank_account_id.is_some() {
        PaymentMethod::BankTransfer
    } else {
        PaymentMethod::Cash
    };
    let mut draft = TransactionDraft::new(
        date,
        description,
        amount,
        TransactionType::Expense,
        CARD_PAYMENT_CATEGORY,
        method,
    )
    .with_credit_card(card_id);
    draft.bank_account_id = bank_account_id;
    create_transaction(state, draft)
}

/// Moves cash into a bank account. The bank side is an income in the
/// cash-deposit category, which the cash balance subtracts.
pub fn deposit_cash(
    state: &mut AppState,
    bank_account_id: Uuid,
    amount: Decimal,
    date: NaiveDate,
) -> Result<Uuid> {
    ensure_positive(amount, "Deposit amount")?;
    state.bank_account(bank_account_id)?;
    let cash = net_worth::cash_balance(state);
    if cash < amount {
        return Err(CoreError::InsufficientFunds {
            available: cash,
            requested: amount,
        });
    }
    let category = state.user_settings.cash_deposit_category.clone();
    create_transaction(
        state,
        TransactionDraft::new(
            date,
            "Cash deposit",
            amount,
            TransactionType::Income,
            category,
            PaymentMethod::BankTransfer,
        )
        .with_bank_account(bank_account_id),
    )
}
