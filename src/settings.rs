// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

pub const DEFAULT_UPCOMING_WINDOW_DAYS: i64 = 7;
pub const MAX_UPCOMING_WINDOW_DAYS: i64 = 3650;
pub const CASH_DEPOSIT_CATEGORY: &str = "cash-deposit";
pub const TRANSFER_CATEGORY: &str = "transfer";
pub const CARD_PAYMENT_CATEGORY: &str = "credit-card-payment";
pub const SAVINGS_CATEGORY: &str = "savings";
pub const DEBT_PAYMENT_CATEGORY: &str = "debt-payment";
pub const RECEIVABLE_CATEGORY: &str = "receivable-collection";

/// User preferences persisted under the `userSettings` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub currency: String,
    /// Days ahead of today in which an unpaid due date counts as upcoming.
    pub upcoming_window_days: i64,
    pub cash_deposit_category: String,
    pub transfer_category: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            upcoming_window_days: DEFAULT_UPCOMING_WINDOW_DAYS,
            cash_deposit_category: CASH_DEPOSIT_CATEGORY.to_string(),
            transfer_category: TRANSFER_CATEGORY.to_string(),
        }
    }
}

impl UserSettings {
    pub fn validate(&self) -> Result<()> {
        if !(0..=MAX_UPCOMING_WINDOW_DAYS).contains(&self.upcoming_window_days) {
            return Err(CoreError::validation(format!(
                "upcomingWindowDays must be between 0 and {}, got {}",
                MAX_UPCOMING_WINDOW_DAYS, self.upcoming_window_days
            )));
        }
        Ok(())
    }
}
