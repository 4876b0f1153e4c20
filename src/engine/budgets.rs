// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{CoreError, Result, ensure_positive};
use crate::models::{Budget, TransactionType};
use crate::state::AppState;
use crate::utils::month_key;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub budget_id: Uuid,
    pub category_id: String,
    pub month: String,
    pub budgeted: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
}

fn check_month(month: &str) -> Result<()> {
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| CoreError::validation(format!("invalid month '{}', expected YYYY-MM", month)))
}

pub fn create_budget(
    state: &mut AppState,
    category_id: &str,
    month: &str,
    amount: Decimal,
) -> Result<Uuid> {
    ensure_positive(amount, "Budget amount")?;
    check_month(month)?;
    if state
        .budgets
        .iter()
        .any(|b| b.category_id == category_id && b.month == month)
    {
        return Err(CoreError::DuplicateConstraint(format!(
            "a budget for '{}' in {} already exists",
            category_id, month
        )));
    }
    let budget = Budget {
        id: Uuid::new_v4(),
        category_id: category_id.to_string(),
        month: month.to_string(),
        amount,
    };
    let id = budget.id;
    state.budgets.push(budget);
    Ok(id)
}

pub fn update_budget(state: &mut AppState, id: Uuid, amount: Decimal) -> Result<()> {
    ensure_positive(amount, "Budget amount")?;
    state.budget_mut(id)?.amount = amount;
    Ok(())
}

pub fn delete_budget(state: &mut AppState, id: Uuid) -> Result<()> {
    state.budget(id)?;
    state.budgets.retain(|b| b.id != id);
    Ok(())
}

/// Expense totals per category for a `YYYY-MM` month. Split transactions
/// count each line under its own category.
pub fn spent_by_category(state: &AppState, month: &str) -> BTreeMap<String, Decimal> {
    let mut spent: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in state
        .transactions
        .iter()
        .filter(|t| t.r#type == TransactionType::Expense && month_key(t.date) == month)
    {
        if t.splits.is_empty() {
            *spent.entry(t.category_id.clone()).or_default() += t.amount;
        } else {
            for line in &t.splits {
                *spent.entry(line.category_id.clone()).or_default() += line.amount;
            }
        }
    }
    spent
}

pub fn budget_report(state: &AppState, month: &str) -> Vec<BudgetLine> {
    let spent = spent_by_category(state, month);
    let mut lines: Vec<BudgetLine> = state
        .budgets
        .iter()
        .filter(|b| b.month == month)
        .map(|b| {
            let used = spent.get(&b.category_id).copied().unwrap_or_default();
            BudgetLine {
                budget_id: b.id,
                category_id: b.category_id.clone(),
                month: b.month.clone(),
                budgeted: b.amount,
                spent: used,
                remaining: b.amount - used,
            }
        })
        .collect();
    lines.sort_by(|a, b| a.category_id.cmp(&b.category_id));
    lines
}
