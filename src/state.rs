// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::models::{
    Asset, BankAccount, Budget, Category, CategoryKind, CreditCard, FinancialGoal, LongTermLiability,
    NetWorthSnapshot, Payable, Receivable, RecurringTransaction, ShortTermLiability, Transaction,
};
use crate::settings::{
    CARD_PAYMENT_CATEGORY, CASH_DEPOSIT_CATEGORY, DEBT_PAYMENT_CATEGORY, RECEIVABLE_CATEGORY,
    SAVINGS_CATEGORY, TRANSFER_CATEGORY, UserSettings,
};

/// Every collection the tracker owns. Engine functions take this by reference;
/// there is no process-wide instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub categories: Vec<Category>,
    /// Ledger, newest first.
    #[serde(rename = "rawTransactions")]
    pub transactions: Vec<Transaction>,
    pub bank_accounts: Vec<BankAccount>,
    pub credit_cards: Vec<CreditCard>,
    pub receivables: Vec<Receivable>,
    pub payables: Vec<Payable>,
    pub long_term_liabilities: Vec<LongTermLiability>,
    pub short_term_liabilities: Vec<ShortTermLiability>,
    pub financial_goals: Vec<FinancialGoal>,
    pub recurring_transactions: Vec<RecurringTransaction>,
    pub assets: Vec<Asset>,
    pub budgets: Vec<Budget>,
    pub net_worth_snapshots: Vec<NetWorthSnapshot>,
    pub user_settings: UserSettings,
}

macro_rules! lookup {
    ($get:ident, $get_mut:ident, $field:ident, $ty:ty, $kind:literal) => {
        pub fn $get(&self, id: Uuid) -> Result<&$ty> {
            self.$field
                .iter()
                .find(|e| e.id == id)
                .ok_or_else(|| CoreError::not_found($kind, id))
        }

        pub fn $get_mut(&mut self, id: Uuid) -> Result<&mut $ty> {
            self.$field
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| CoreError::not_found($kind, id))
        }
    };
}

/// Categories every fresh book starts with. The ledger posts its own
/// transfers, card payments and savings under the system ones.
pub fn default_categories() -> Vec<Category> {
    [
        ("salary", "Salary", CategoryKind::Income),
        (RECEIVABLE_CATEGORY, "Receivable collection", CategoryKind::Income),
        ("food", "Food", CategoryKind::Expense),
        ("housing", "Housing", CategoryKind::Expense),
        ("transport", "Transport", CategoryKind::Expense),
        ("utilities", "Utilities", CategoryKind::Expense),
        ("other", "Other", CategoryKind::Expense),
        (DEBT_PAYMENT_CATEGORY, "Debt payment", CategoryKind::Expense),
        (TRANSFER_CATEGORY, "Transfer", CategoryKind::Transfer),
        (CASH_DEPOSIT_CATEGORY, "Cash deposit", CategoryKind::Transfer),
        (CARD_PAYMENT_CATEGORY, "Credit card payment", CategoryKind::Transfer),
        (SAVINGS_CATEGORY, "Savings", CategoryKind::Transfer),
    ]
    .into_iter()
    .map(|(id, name, kind)| Category {
        id: id.to_string(),
        name: name.to_string(),
        kind,
    })
    .collect()
}

impl AppState {
    pub fn with_defaults() -> Self {
        Self {
            categories: default_categories(),
            ..Self::default()
        }
    }

    lookup!(transaction, transaction_mut, transactions, Transaction, "Transaction");
    lookup!(bank_account, bank_account_mut, bank_accounts, BankAccount, "Bank account");
    lookup!(credit_card, credit_card_mut, credit_cards, CreditCard, "Credit card");
    lookup!(receivable, receivable_mut, receivables, Receivable, "Receivable");
    lookup!(payable, payable_mut, payables, Payable, "Payable");
    lookup!(
        long_term_liability,
        long_term_liability_mut,
        long_term_liabilities,
        LongTermLiability,
        "Long-term liability"
    );
    lookup!(
        short_term_liability,
        short_term_liability_mut,
        short_term_liabilities,
        ShortTermLiability,
        "Short-term liability"
    );
    lookup!(goal, goal_mut, financial_goals, FinancialGoal, "Financial goal");
    lookup!(
        recurring,
        recurring_mut,
        recurring_transactions,
        RecurringTransaction,
        "Recurring transaction"
    );
    lookup!(asset, asset_mut, assets, Asset, "Asset");
    lookup!(budget, budget_mut, budgets, Budget, "Budget");

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}
