// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{d, state, with_account};
use rust_decimal_macros::dec;
use tallybook::CoreError;
use tallybook::engine::payments::{self, NewObligation, PaymentInput, PaymentTarget};
use tallybook::engine::{ledger, stats};
use tallybook::models::{PaymentStatus, PaymentStructure, ShortTermLiability};
use uuid::Uuid;

fn obligation(name: &str, total: rust_decimal::Decimal, due: chrono::NaiveDate) -> NewObligation<'_> {
    NewObligation {
        counterparty_name: name,
        description: "invoice",
        total_amount: total,
        due_date: due,
    }
}

#[test]
fn payable_due_today_walks_through_partial_to_paid() {
    let today = d(2025, 3, 15);
    let mut s = state();
    let id = payments::add_payable(&mut s, obligation("Landlord", dec!(1000), today), today).unwrap();
    assert_eq!(s.payable(id).unwrap().status, PaymentStatus::Upcoming);

    payments::record_payment(&mut s, PaymentTarget::Payable(id), PaymentInput::cash(dec!(400), today), today)
        .unwrap();
    let st = stats::payable_stats(s.payable(id).unwrap(), today, 7);
    assert_eq!((st.paid, st.remaining), (dec!(400), dec!(600)));
    assert_eq!(st.status, PaymentStatus::PartiallyPaid);
    assert_eq!(s.payable(id).unwrap().status, PaymentStatus::PartiallyPaid);

    payments::record_payment(&mut s, PaymentTarget::Payable(id), PaymentInput::cash(dec!(600), today), today)
        .unwrap();
    let p = s.payable(id).unwrap();
    assert_eq!(p.status, PaymentStatus::Paid);
    assert_eq!(stats::payable_stats(p, today, 7).remaining, dec!(0));
}

#[test]
fn overdue_only_without_payments() {
    let today = d(2025, 3, 15);
    let mut s = state();
    let id = payments::add_receivable(&mut s, obligation("Sam", dec!(300), d(2025, 3, 1)), d(2025, 2, 1))
        .unwrap();
    stats::refresh_all_statuses(&mut s, today);
    assert_eq!(s.receivable(id).unwrap().status, PaymentStatus::Overdue);

    payments::record_payment(&mut s, PaymentTarget::Receivable(id), PaymentInput::cash(dec!(100), today), today)
        .unwrap();
    assert_eq!(s.receivable(id).unwrap().status, PaymentStatus::PartiallyPaid);
}

#[test]
fn status_rank_never_drops_while_paying_and_never_rises_while_unpaying() {
    let today = d(2025, 3, 15);
    let mut s = state();
    let id = payments::add_receivable(&mut s, obligation("Kim", dec!(90), d(2025, 4, 30)), today).unwrap();

    let mut ranks = vec![s.receivable(id).unwrap().status.progress_rank()];
    let mut payment_ids = Vec::new();
    for _ in 0..3 {
        let pid = payments::record_payment(
            &mut s,
            PaymentTarget::Receivable(id),
            PaymentInput::cash(dec!(30), today),
            today,
        )
        .unwrap();
        payment_ids.push(pid);
        ranks.push(s.receivable(id).unwrap().status.progress_rank());
    }
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(s.receivable(id).unwrap().status, PaymentStatus::Paid);

    let mut ranks = vec![s.receivable(id).unwrap().status.progress_rank()];
    for pid in payment_ids {
        payments::remove_payment(&mut s, PaymentTarget::Receivable(id), pid, today).unwrap();
        ranks.push(s.receivable(id).unwrap().status.progress_rank());
    }
    assert!(ranks.windows(2).all(|w| w[0] >= w[1]));
    assert!(s.transactions.is_empty());
}

#[test]
fn overpayment_is_rejected() {
    let today = d(2025, 3, 15);
    let mut s = state();
    let id = payments::add_payable(&mut s, obligation("Shop", dec!(50), today), today).unwrap();
    let err = payments::record_payment(&mut s, PaymentTarget::Payable(id), PaymentInput::cash(dec!(60), today), today)
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert!(s.payable(id).unwrap().payments.is_empty());
}

#[test]
fn deleting_a_funding_transaction_strips_only_that_payment() {
    let today = d(2025, 3, 15);
    let mut s = state();
    let bank = with_account(&mut s, dec!(5000));
    let target = payments::add_payable(&mut s, obligation("Plumber", dec!(800), d(2025, 3, 20)), today).unwrap();
    let other = payments::add_payable(&mut s, obligation("Dentist", dec!(200), d(2025, 3, 25)), today).unwrap();
    let receivable = payments::add_receivable(&mut s, obligation("Alex", dec!(100), d(2025, 3, 30)), today).unwrap();
    let goal = payments::add_goal(&mut s, "Holiday", dec!(1000), None).unwrap();

    payments::record_payment(
        &mut s,
        PaymentTarget::Payable(target),
        PaymentInput::from_bank(dec!(300), today, bank),
        today,
    )
    .unwrap();
    let keep = payments::record_payment(
        &mut s,
        PaymentTarget::Payable(target),
        PaymentInput::from_bank(dec!(100), today, bank),
        today,
    )
    .unwrap();
    payments::record_payment(&mut s, PaymentTarget::Payable(other), PaymentInput::cash(dec!(50), today), today)
        .unwrap();
    payments::add_goal_contribution(&mut s, goal, dec!(250), today, Some(bank), today).unwrap();
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(4350));

    let funding = s.payable(target).unwrap().payments[0].transaction_id.unwrap();
    let untouched_other = s.payable(other).unwrap().clone();
    let untouched_receivable = s.receivable(receivable).unwrap().clone();
    let untouched_goal = s.goal(goal).unwrap().clone();

    let report = ledger::delete_transaction(&mut s, funding, today).unwrap();
    assert_eq!(report.payables, vec![target]);
    assert_eq!(report.touched(), 1);

    let p = s.payable(target).unwrap();
    assert_eq!(p.payments.len(), 1);
    assert_eq!(p.payments[0].id, keep);
    assert_eq!(p.status, PaymentStatus::PartiallyPaid);
    assert_eq!(s.payable(other).unwrap(), &untouched_other);
    assert_eq!(s.receivable(receivable).unwrap(), &untouched_receivable);
    assert_eq!(s.goal(goal).unwrap(), &untouched_goal);
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(4650));
}

#[test]
fn deleting_the_contribution_that_reached_a_goal_clears_achieved_date() {
    let today = d(2025, 8, 1);
    let mut s = state();
    let bank = with_account(&mut s, dec!(2000));
    let goal = payments::add_goal(&mut s, "Laptop", dec!(1500), Some(d(2025, 12, 31))).unwrap();
    payments::add_goal_contribution(&mut s, goal, dec!(1000), today, None, today).unwrap();
    payments::add_goal_contribution(&mut s, goal, dec!(500), today, Some(bank), today).unwrap();

    let g = s.goal(goal).unwrap();
    assert_eq!(g.current_amount, g.target_amount);
    assert_eq!(g.achieved_date, Some(today));

    let txn = g.contributions[1].transaction_id.unwrap();
    let report = ledger::delete_transaction(&mut s, txn, d(2025, 8, 2)).unwrap();
    assert_eq!(report.financial_goals, vec![goal]);

    let g = s.goal(goal).unwrap();
    assert_eq!(g.current_amount, dec!(1000));
    assert_eq!(g.achieved_date, None);
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(2000));
}

#[test]
fn withdrawing_a_contribution_reverses_its_transfer() {
    let today = d(2025, 8, 1);
    let mut s = state();
    let bank = with_account(&mut s, dec!(800));
    let goal = payments::add_goal(&mut s, "Camera", dec!(600), None).unwrap();
    let manual = payments::add_goal_contribution(&mut s, goal, dec!(100), today, None, today).unwrap();
    let funded = payments::add_goal_contribution(&mut s, goal, dec!(200), today, Some(bank), today).unwrap();
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(600));

    payments::remove_goal_contribution(&mut s, goal, funded, today).unwrap();
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(800));
    assert!(s.transactions.is_empty());

    payments::remove_goal_contribution(&mut s, goal, manual, today).unwrap();
    let g = s.goal(goal).unwrap();
    assert!(g.contributions.is_empty());
    assert_eq!(g.current_amount, dec!(0));

    let err = payments::remove_goal_contribution(&mut s, goal, manual, today).unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[test]
fn contribution_beyond_bank_balance_is_refused() {
    let today = d(2025, 8, 1);
    let mut s = state();
    let bank = with_account(&mut s, dec!(100));
    let goal = payments::add_goal(&mut s, "Bike", dec!(900), None).unwrap();
    let err = payments::add_goal_contribution(&mut s, goal, dec!(150), today, Some(bank), today).unwrap_err();
    assert!(matches!(err, CoreError::InsufficientFunds { .. }));
    assert!(s.goal(goal).unwrap().contributions.is_empty());
}

#[test]
fn installment_liability_tracks_next_due_date() {
    let today = d(2025, 1, 10);
    let mut s = state();
    let liability = ShortTermLiability {
        id: Uuid::nil(),
        name: "Phone".into(),
        original_amount: dec!(600),
        due_date: d(2025, 6, 15),
        created_at: today,
        payment_structure: PaymentStructure::Installments,
        number_of_installments: 6,
        payment_day_of_month: Some(15),
        payments: vec![],
        status: PaymentStatus::Pending,
    };
    let id = payments::add_short_term_liability(&mut s, liability, today).unwrap();

    let st = stats::short_term_stats(s.short_term_liability(id).unwrap(), today, 7);
    assert_eq!(st.monthly_installment_amount, Some(dec!(100)));
    assert_eq!(st.paid_installments, Some(0));
    assert_eq!(st.next_installment_due_date, Some(d(2025, 1, 15)));
    assert_eq!(st.status, PaymentStatus::Upcoming);

    payments::record_payment(&mut s, PaymentTarget::ShortTerm(id), PaymentInput::cash(dec!(200), today), today)
        .unwrap();
    let st = stats::short_term_stats(s.short_term_liability(id).unwrap(), today, 7);
    assert_eq!(st.paid_installments, Some(2));
    assert_eq!(st.next_installment_due_date, Some(d(2025, 3, 15)));
}
