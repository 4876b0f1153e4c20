// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Sign applied to an amount when this type moves money into a balance.
    pub fn sign(self) -> Decimal {
        match self {
            TransactionType::Income => Decimal::ONE,
            TransactionType::Expense => Decimal::NEGATIVE_ONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    CreditCard,
    Cheque,
    DebitCard,
    Other,
}

impl PaymentMethod {
    /// Expense methods that draw directly on a bank account.
    pub fn debits_bank(self) -> bool {
        matches!(
            self,
            PaymentMethod::BankTransfer | PaymentMethod::Cheque | PaymentMethod::DebitCard
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitLine {
    pub category_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub category_id: String,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub bank_account_id: Option<Uuid>,
    #[serde(default)]
    pub credit_card_id: Option<Uuid>,
    #[serde(default)]
    pub recurring_transaction_id: Option<Uuid>,
    #[serde(default)]
    pub splits: Vec<SplitLine>,
}

/// Caller-supplied fields for a new transaction; the ledger assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub category_id: String,
    pub payment_method: PaymentMethod,
    pub bank_account_id: Option<Uuid>,
    pub credit_card_id: Option<Uuid>,
    pub recurring_transaction_id: Option<Uuid>,
    pub splits: Vec<SplitLine>,
}

impl TransactionDraft {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
        r#type: TransactionType,
        category_id: impl Into<String>,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            r#type,
            category_id: category_id.into(),
            payment_method,
            bank_account_id: None,
            credit_card_id: None,
            recurring_transaction_id: None,
            splits: Vec::new(),
        }
    }

    pub fn with_bank_account(mut self, id: Uuid) -> Self {
        self.bank_account_id = Some(id);
        self
    }

    pub fn with_credit_card(mut self, id: Uuid) -> Self {
        self.credit_card_id = Some(id);
        self
    }

    pub fn into_transaction(self, id: Uuid) -> Transaction {
        Transaction {
            id,
            date: self.date,
            description: self.description,
            amount: self.amount,
            r#type: self.r#type,
            category_id: self.category_id,
            payment_method: self.payment_method,
            bank_account_id: self.bank_account_id,
            credit_card_id: self.credit_card_id,
            recurring_transaction_id: self.recurring_transaction_id,
            splits: self.splits,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: Uuid,
    pub account_name: String,
    pub bank_name: String,
    pub current_balance: Decimal,
    /// Balance when the account was registered; replay starts here.
    #[serde(default)]
    pub opening_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    pub id: Uuid,
    pub card_name: String,
    pub credit_limit: Decimal,
    pub available_balance: Decimal,
    #[serde(default)]
    pub opening_available: Option<Decimal>,
}

impl CreditCard {
    pub fn outstanding(&self) -> Decimal {
        self.credit_limit - self.available_balance
    }

    pub fn opening_available(&self) -> Decimal {
        self.opening_available.unwrap_or(self.credit_limit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub bank_account_id: Option<Uuid>,
    #[serde(default)]
    pub transaction_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Upcoming,
    PartiallyPaid,
    Overdue,
    Paid,
}

impl PaymentStatus {
    /// Progress rank: PENDING/UPCOMING < PARTIALLY_PAID < PAID. OVERDUE sits with the unpaid states.
    pub fn progress_rank(self) -> u8 {
        match self {
            PaymentStatus::Pending | PaymentStatus::Upcoming | PaymentStatus::Overdue => 0,
            PaymentStatus::PartiallyPaid => 1,
            PaymentStatus::Paid => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Upcoming => "upcoming",
            PaymentStatus::PartiallyPaid => "partially paid",
            PaymentStatus::Overdue => "overdue",
            PaymentStatus::Paid => "paid",
        }
    }
}

/// Money owed to the user by a counterparty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receivable {
    pub id: Uuid,
    pub counterparty_name: String,
    pub description: String,
    pub total_amount: Decimal,
    pub due_date: NaiveDate,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub payments: Vec<Payment>,
    pub status: PaymentStatus,
}

/// Money the user owes a counterparty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payable {
    pub id: Uuid,
    pub counterparty_name: String,
    pub description: String,
    pub total_amount: Decimal,
    pub due_date: NaiveDate,
    pub created_at: NaiveDate,
    #[serde(default)]
    pub payments: Vec<Payment>,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTermLiability {
    pub id: Uuid,
    pub name: String,
    pub original_amount: Decimal,
    pub monthly_payment: Decimal,
    pub interest_rate: Decimal,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStructure {
    Single,
    Installments,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortTermLiability {
    pub id: Uuid,
    pub name: String,
    pub original_amount: Decimal,
    pub due_date: NaiveDate,
    pub created_at: NaiveDate,
    pub payment_structure: PaymentStructure,
    #[serde(default)]
    pub number_of_installments: u32,
    #[serde(default)]
    pub payment_day_of_month: Option<u32>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub transaction_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGoal {
    pub id: Uuid,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub achieved_date: Option<NaiveDate>,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransaction {
    pub id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub category_id: String,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub bank_account_id: Option<Uuid>,
    #[serde(default)]
    pub credit_card_id: Option<Uuid>,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// 0 = Sunday .. 6 = Saturday.
    #[serde(default)]
    pub day_of_week: Option<u32>,
    #[serde(default)]
    pub day_of_month: Option<u32>,
    pub next_due_date: NaiveDate,
    #[serde(default)]
    pub last_processed_date: Option<NaiveDate>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    pub acquisition_cost: Decimal,
    #[serde(default)]
    pub current_value: Option<Decimal>,
}

impl Asset {
    pub fn valuation(&self) -> Decimal {
        self.current_value.unwrap_or(self.acquisition_cost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryKind {
    Income,
    Expense,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub kind: CategoryKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub category_id: String,
    pub month: String, // YYYY-MM
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthSnapshot {
    pub date: NaiveDate,
    pub assets: Decimal,
    pub liabilities: Decimal,
    pub net_worth: Decimal,
}
