// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Paid / remaining / status derivation for receivables, payables and liabilities.

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::models::{
    LongTermLiability, Payable, Payment, PaymentStatus, PaymentStructure, Receivable,
    ShortTermLiability,
};
use crate::state::AppState;
use crate::utils::{clamped_date, shift_month};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub paid: Decimal,
    pub remaining: Decimal,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortTermStats {
    pub paid: Decimal,
    pub remaining: Decimal,
    pub status: PaymentStatus,
    pub monthly_installment_amount: Option<Decimal>,
    pub paid_installments: Option<u32>,
    pub next_installment_due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTermStats {
    pub total_paid: Decimal,
    pub remaining_balance: Decimal,
    pub is_paid_off: bool,
    pub months_remaining: Option<u32>,
}

pub fn total_paid(payments: &[Payment]) -> Decimal {
    payments.iter().map(|p| p.amount).sum()
}

pub fn remaining(total: Decimal, paid: Decimal) -> Decimal {
    (total - paid).max(Decimal::ZERO)
}

/// Classifies a debt-like entity. Any payment short of the total reports
/// PARTIALLY_PAID even past the due date; OVERDUE is reserved for entities
/// with nothing paid.
pub fn classify(
    total: Decimal,
    paid: Decimal,
    due_date: NaiveDate,
    today: NaiveDate,
    window_days: i64,
) -> PaymentStatus {
    if paid >= total {
        PaymentStatus::Paid
    } else if paid > Decimal::ZERO {
        PaymentStatus::PartiallyPaid
    } else if today > due_date {
        PaymentStatus::Overdue
    } else if within_window(due_date, today, window_days) {
        PaymentStatus::Upcoming
    } else {
        PaymentStatus::Pending
    }
}

/// A window reaching past the last representable date covers every due date.
fn within_window(due_date: NaiveDate, today: NaiveDate, window_days: i64) -> bool {
    let window = Days::new(window_days.max(0).unsigned_abs());
    today
        .checked_add_days(window)
        .is_none_or(|horizon| due_date <= horizon)
}

fn payment_stats(
    total: Decimal,
    payments: &[Payment],
    due_date: NaiveDate,
    today: NaiveDate,
    window_days: i64,
) -> PaymentStats {
    let paid = total_paid(payments);
    PaymentStats {
        paid,
        remaining: remaining(total, paid),
        status: classify(total, paid, due_date, today, window_days),
    }
}

pub fn receivable_stats(r: &Receivable, today: NaiveDate, window_days: i64) -> PaymentStats {
    payment_stats(r.total_amount, &r.payments, r.due_date, today, window_days)
}

pub fn payable_stats(p: &Payable, today: NaiveDate, window_days: i64) -> PaymentStats {
    payment_stats(p.total_amount, &p.payments, p.due_date, today, window_days)
}

/// True when the liability is split into installments that can actually be scheduled.
fn uses_installments(l: &ShortTermLiability) -> bool {
    l.payment_structure == PaymentStructure::Installments && l.number_of_installments > 0
}

/// Due date of installment `slot` (1-based). The first installment falls on the
/// payment day of the first month where that day comes after `created_at`.
pub fn installment_due_date(l: &ShortTermLiability, slot: u32) -> NaiveDate {
    let day = l.payment_day_of_month.unwrap_or(l.created_at.day());
    let mut first = (l.created_at.year(), l.created_at.month());
    if clamped_date(first.0, first.1, day) <= l.created_at {
        first = shift_month(l.created_at, 1);
    }
    let anchor = clamped_date(first.0, first.1, 1);
    let (y, m) = shift_month(anchor, slot.saturating_sub(1) as i32);
    clamped_date(y, m, day)
}

pub fn short_term_stats(l: &ShortTermLiability, today: NaiveDate, window_days: i64) -> ShortTermStats {
    let paid = total_paid(&l.payments);
    let remaining = remaining(l.original_amount, paid);

    if !uses_installments(l) {
        return ShortTermStats {
            paid,
            remaining,
            status: classify(l.original_amount, paid, l.due_date, today, window_days),
            monthly_installment_amount: None,
            paid_installments: None,
            next_installment_due_date: None,
        };
    }

    let n = l.number_of_installments;
    let installment = l.original_amount / Decimal::from(n);
    let paid_installments = if installment > Decimal::ZERO {
        (paid / installment).floor().to_u32().unwrap_or(n).min(n)
    } else {
        n
    };
    let next_due = (paid_installments < n && paid < l.original_amount)
        .then(|| installment_due_date(l, paid_installments + 1));
    let effective_due = next_due.unwrap_or(l.due_date);

    ShortTermStats {
        paid,
        remaining,
        status: classify(l.original_amount, paid, effective_due, today, window_days),
        monthly_installment_amount: Some(installment),
        paid_installments: Some(paid_installments),
        next_installment_due_date: next_due,
    }
}

pub fn long_term_stats(l: &LongTermLiability) -> LongTermStats {
    let total_paid = total_paid(&l.payments);
    let remaining_balance = remaining(l.original_amount, total_paid);
    let months_remaining = if l.monthly_payment > Decimal::ZERO {
        (remaining_balance / l.monthly_payment).ceil().to_u32()
    } else {
        None
    };
    LongTermStats {
        total_paid,
        remaining_balance,
        is_paid_off: remaining_balance <= Decimal::ZERO,
        months_remaining,
    }
}

pub fn refresh_receivable_status(r: &mut Receivable, today: NaiveDate, window_days: i64) {
    r.status = receivable_stats(r, today, window_days).status;
}

pub fn refresh_payable_status(p: &mut Payable, today: NaiveDate, window_days: i64) {
    p.status = payable_stats(p, today, window_days).status;
}

pub fn refresh_short_term_status(l: &mut ShortTermLiability, today: NaiveDate, window_days: i64) {
    l.status = short_term_stats(l, today, window_days).status;
}

/// Re-derives every stored status against `today`. Statuses drift as dates
/// pass, so this runs whenever the state is loaded for a new day.
pub fn refresh_all_statuses(state: &mut AppState, today: NaiveDate) {
    let window = state.user_settings.upcoming_window_days;
    for r in state.receivables.iter_mut() {
        refresh_receivable_status(r, today, window);
    }
    for p in state.payables.iter_mut() {
        refresh_payable_status(p, today, window);
    }
    for l in state.short_term_liabilities.iter_mut() {
        refresh_short_term_status(l, today, window);
    }
}
