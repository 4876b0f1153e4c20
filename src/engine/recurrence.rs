// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Recurring rule scheduling and materialization.

use chrono::{Datelike, Days, NaiveDate};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::ledger;
use crate::error::{CoreError, Result, ensure_positive};
use crate::models::{Frequency, RecurringTransaction, Transaction, TransactionDraft};
use crate::state::AppState;
use crate::utils::{clamped_date, shift_month};

fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

fn month_day(rule: &RecurringTransaction) -> u32 {
    rule.day_of_month.unwrap_or(rule.start_date.day())
}

/// Saturates at the last representable date.
fn after_days(anchor: NaiveDate, days: u64) -> NaiveDate {
    anchor.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Next occurrence of `rule` strictly after `anchor`. Ignores the end date.
pub fn next_occurrence_after(rule: &RecurringTransaction, anchor: NaiveDate) -> NaiveDate {
    match rule.frequency {
        Frequency::Daily => after_days(anchor, 1),
        Frequency::Weekly => {
            let target = rule.day_of_week.map(|d| d % 7).unwrap_or(weekday_index(anchor));
            let delta = match (target + 7 - weekday_index(anchor)) % 7 {
                0 => 7,
                n => n,
            };
            after_days(anchor, u64::from(delta))
        }
        Frequency::Monthly => {
            let day = month_day(rule);
            let candidate = clamped_date(anchor.year(), anchor.month(), day);
            if candidate > anchor {
                candidate
            } else {
                let (y, m) = shift_month(anchor, 1);
                clamped_date(y, m, day)
            }
        }
        Frequency::Yearly => {
            let month = rule.start_date.month();
            let day = month_day(rule);
            let candidate = clamped_date(anchor.year(), month, day);
            if candidate > anchor {
                candidate
            } else {
                clamped_date(anchor.year() + 1, month, day)
            }
        }
    }
}

/// Next due date counted from the last processed date, or from the start date
/// when the rule has never fired.
pub fn calculate_next_due_date(rule: &RecurringTransaction) -> NaiveDate {
    let anchor = rule.last_processed_date.unwrap_or(rule.start_date);
    next_occurrence_after(rule, anchor)
}

fn falls_on_schedule(rule: &RecurringTransaction, date: NaiveDate) -> bool {
    match rule.frequency {
        Frequency::Daily => true,
        Frequency::Weekly => {
            let target = rule.day_of_week.map(|d| d % 7).unwrap_or(weekday_index(date));
            weekday_index(date) == target
        }
        Frequency::Monthly => date == clamped_date(date.year(), date.month(), month_day(rule)),
        Frequency::Yearly => {
            date.month() == rule.start_date.month()
                && date == clamped_date(date.year(), date.month(), month_day(rule))
        }
    }
}

/// First due date of a freshly created rule.
pub fn first_due_date(rule: &RecurringTransaction) -> NaiveDate {
    if falls_on_schedule(rule, rule.start_date) {
        rule.start_date
    } else {
        next_occurrence_after(rule, rule.start_date)
    }
}

/// Moves `next_due_date` forward. Past the end date the rule is parked on the
/// end date and deactivated.
pub fn advance(rule: &mut RecurringTransaction) {
    let next = calculate_next_due_date(rule);
    match rule.end_date {
        Some(end) if next > end => {
            rule.next_due_date = end;
            rule.is_active = false;
        }
        _ => rule.next_due_date = next,
    }
}

fn draft_for(rule: &RecurringTransaction, date: NaiveDate) -> TransactionDraft {
    TransactionDraft {
        date,
        description: rule.description.clone(),
        amount: rule.amount,
        r#type: rule.r#type,
        category_id: rule.category_id.clone(),
        payment_method: rule.payment_method,
        bank_account_id: rule.bank_account_id,
        credit_card_id: rule.credit_card_id,
        recurring_transaction_id: Some(rule.id),
        splits: Vec::new(),
    }
}

/// Materializes one transaction for each listed rule that is active and due on
/// or before `today`, then advances it. Callers pass the ids they mean to
/// process; a rule is never re-scanned within one call. The batch is all or
/// nothing: if any rule fails, no transaction is generated and no rule moves.
pub fn process_recurring_transactions(
    state: &mut AppState,
    ids: &[Uuid],
    today: NaiveDate,
) -> Result<Vec<Transaction>> {
    for id in ids {
        state.recurring(*id)?;
    }

    let mut staged = state.clone();
    let mut generated = Vec::new();
    for id in ids {
        let rule = staged.recurring(*id)?.clone();
        if !rule.is_active || rule.next_due_date > today {
            debug!(rule = %rule.id, due = %rule.next_due_date, "recurring rule not due");
            continue;
        }
        let due = rule.next_due_date;
        let txn_id = ledger::create_transaction(&mut staged, draft_for(&rule, due))?;
        generated.push(staged.transaction(txn_id)?.clone());

        let rule = staged.recurring_mut(*id)?;
        rule.last_processed_date = Some(due);
        advance(rule);
        info!(
            rule = %rule.id,
            processed = %due,
            next = %rule.next_due_date,
            active = rule.is_active,
            "processed recurring transaction"
        );
    }
    *state = staged;
    Ok(generated)
}

/// Outcome of [`process_due_rules`].
#[derive(Debug, Default)]
pub struct RecurringRun {
    pub generated: Vec<Transaction>,
    pub failed: Vec<(Uuid, CoreError)>,
}

/// Processes every rule due on or before `today`, one rule at a time. A rule
/// that fails is left untouched and reported; the others still run.
pub fn process_due_rules(state: &mut AppState, today: NaiveDate) -> RecurringRun {
    let mut run = RecurringRun::default();
    for id in due_rule_ids(state, today) {
        match process_recurring_transactions(state, &[id], today) {
            Ok(txns) => run.generated.extend(txns),
            Err(err) => {
                warn!(rule = %id, error = %err, "skipping recurring rule");
                run.failed.push((id, err));
            }
        }
    }
    run
}

/// Ids of active rules due on or before `today`.
pub fn due_rule_ids(state: &AppState, today: NaiveDate) -> Vec<Uuid> {
    state
        .recurring_transactions
        .iter()
        .filter(|r| r.is_active && r.next_due_date <= today)
        .map(|r| r.id)
        .collect()
}

fn validate_rule(state: &AppState, rule: &RecurringTransaction) -> Result<()> {
    ensure_positive(rule.amount, "Recurring amount")?;
    if rule.day_of_week.is_some_and(|d| d > 6) {
        return Err(CoreError::validation("day of week must be between 0 and 6"));
    }
    if rule.day_of_month.is_some_and(|d| !(1..=31).contains(&d)) {
        return Err(CoreError::validation("day of month must be between 1 and 31"));
    }
    if rule.end_date.is_some_and(|end| end < rule.start_date) {
        return Err(CoreError::validation("end date is before start date"));
    }
    if let Some(id) = rule.bank_account_id {
        state.bank_account(id)?;
    }
    if let Some(id) = rule.credit_card_id {
        state.credit_card(id)?;
    }
    Ok(())
}

fn upcoming_due_date(rule: &RecurringTransaction) -> NaiveDate {
    match rule.last_processed_date {
        Some(_) => calculate_next_due_date(rule),
        None => first_due_date(rule),
    }
}

fn reschedule(rule: &mut RecurringTransaction) {
    let next = upcoming_due_date(rule);
    rule.next_due_date = next;
    if let Some(end) = rule.end_date {
        if next > end {
            rule.next_due_date = end;
            rule.is_active = false;
        }
    }
}

/// Registers a rule. Its id and schedule fields are assigned here.
pub fn create_recurring(state: &mut AppState, mut rule: RecurringTransaction) -> Result<Uuid> {
    validate_rule(state, &rule)?;
    rule.id = Uuid::new_v4();
    rule.last_processed_date = None;
    rule.is_active = true;
    reschedule(&mut rule);
    debug!(rule = %rule.id, first_due = %rule.next_due_date, "created recurring rule");
    let id = rule.id;
    state.recurring_transactions.push(rule);
    Ok(id)
}

/// Replaces a rule's definition, keeping its processing history and its
/// paused or active state.
pub fn update_recurring(state: &mut AppState, mut rule: RecurringTransaction) -> Result<()> {
    let existing = state.recurring(rule.id)?.clone();
    validate_rule(state, &rule)?;
    rule.last_processed_date = existing.last_processed_date;
    rule.is_active = existing.is_active;
    reschedule(&mut rule);
    let id = rule.id;
    *state.recurring_mut(id)? = rule;
    Ok(())
}

pub fn set_recurring_active(state: &mut AppState, id: Uuid, active: bool) -> Result<()> {
    let rule = state.recurring_mut(id)?;
    if !active {
        rule.is_active = false;
        return Ok(());
    }
    let next = upcoming_due_date(rule);
    if rule.end_date.is_some_and(|end| next > end) {
        return Err(CoreError::validation(
            "recurring rule has already reached its end date",
        ));
    }
    rule.next_due_date = next;
    rule.is_active = true;
    Ok(())
}

/// Removes a rule and clears the back-reference on the transactions it produced.
pub fn delete_recurring(state: &mut AppState, id: Uuid) -> Result<()> {
    state.recurring(id)?;
    state.recurring_transactions.retain(|r| r.id != id);
    for txn in state
        .transactions
        .iter_mut()
        .filter(|t| t.recurring_transaction_id == Some(id))
    {
        txn.recurring_transaction_id = None;
    }
    Ok(())
}
