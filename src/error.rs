// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures reported by the engine. Every variant renders as one sentence
/// suitable for showing to the user as-is.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Insufficient funds: {available} available, {requested} requested")]
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },
    #[error("Credit limit exceeded: {available} available, {requested} requested")]
    CreditLimitExceeded {
        available: Decimal,
        requested: Decimal,
    },
    #[error("Duplicate entry: {0}")]
    DuplicateConstraint(String),
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Rejects zero and negative amounts.
pub fn ensure_positive(amount: Decimal, what: &str) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::validation(format!(
            "{} must be greater than zero (got {})",
            what, amount
        )));
    }
    Ok(())
}
