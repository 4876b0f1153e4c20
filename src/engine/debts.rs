// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::engine::stats;
use crate::models::LongTermLiability;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoffStrategy {
    /// Highest interest rate first.
    Avalanche,
    /// Smallest remaining balance first.
    Snowball,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffEntry {
    pub id: Uuid,
    pub name: String,
    pub interest_rate: Decimal,
    pub remaining_balance: Decimal,
    pub monthly_payment: Decimal,
    pub months_remaining: Option<u32>,
}

/// Orders the liabilities that still carry a balance.
pub fn payoff_order(liabilities: &[LongTermLiability], strategy: PayoffStrategy) -> Vec<PayoffEntry> {
    let mut entries: Vec<PayoffEntry> = liabilities
        .iter()
        .filter_map(|l| {
            let s = stats::long_term_stats(l);
            (!s.is_paid_off).then(|| PayoffEntry {
                id: l.id,
                name: l.name.clone(),
                interest_rate: l.interest_rate,
                remaining_balance: s.remaining_balance,
                monthly_payment: l.monthly_payment,
                months_remaining: s.months_remaining,
            })
        })
        .collect();

    entries.sort_by(|a, b| match strategy {
        PayoffStrategy::Avalanche => b
            .interest_rate
            .cmp(&a.interest_rate)
            .then_with(|| a.remaining_balance.cmp(&b.remaining_balance)),
        PayoffStrategy::Snowball => a
            .remaining_balance
            .cmp(&b.remaining_balance)
            .then_with(|| b.interest_rate.cmp(&a.interest_rate)),
    });
    entries
}

impl std::str::FromStr for PayoffStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "avalanche" => Ok(PayoffStrategy::Avalanche),
            "snowball" => Ok(PayoffStrategy::Snowball),
            other => Err(format!("unknown strategy '{}' (use avalanche|snowball)", other)),
        }
    }
}
