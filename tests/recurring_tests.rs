// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{d, state, with_account, workspace};
use rust_decimal_macros::dec;
use tallybook::CoreError;
use tallybook::engine::{ledger, recurrence};
use tallybook::models::{Frequency, PaymentMethod, RecurringTransaction, TransactionType};
use tallybook::{cli, commands::recurring};
use uuid::Uuid;

fn rent(bank: Uuid) -> RecurringTransaction {
    RecurringTransaction {
        id: Uuid::nil(),
        description: "Rent".into(),
        amount: dec!(900),
        r#type: TransactionType::Expense,
        category_id: "housing".into(),
        payment_method: PaymentMethod::BankTransfer,
        bank_account_id: Some(bank),
        credit_card_id: None,
        frequency: Frequency::Monthly,
        start_date: d(2025, 1, 31),
        end_date: None,
        day_of_week: None,
        day_of_month: Some(31),
        next_due_date: d(2025, 1, 31),
        last_processed_date: None,
        is_active: true,
    }
}

#[test]
fn processing_twice_on_the_same_day_generates_once() {
    let today = d(2025, 1, 31);
    let mut s = state();
    let bank = with_account(&mut s, dec!(3000));
    let id = recurrence::create_recurring(&mut s, rent(bank)).unwrap();

    let due = recurrence::due_rule_ids(&s, today);
    assert_eq!(due, vec![id]);
    let first = recurrence::process_recurring_transactions(&mut s, &due, today).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].date, today);
    assert_eq!(first[0].recurring_transaction_id, Some(id));

    let rule = s.recurring(id).unwrap();
    assert_eq!(rule.last_processed_date, Some(today));
    assert_eq!(rule.next_due_date, d(2025, 2, 28));
    assert_eq!(recurrence::calculate_next_due_date(rule), d(2025, 2, 28));
    assert_eq!(recurrence::calculate_next_due_date(rule), d(2025, 2, 28));

    let second = recurrence::process_recurring_transactions(&mut s, &due, today).unwrap();
    assert!(second.is_empty());
    assert_eq!(s.transactions.len(), 1);
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(2100));
}

#[test]
fn monthly_rule_returns_to_day_31_after_february() {
    let mut s = state();
    let bank = with_account(&mut s, dec!(10000));
    let id = recurrence::create_recurring(&mut s, rent(bank)).unwrap();

    let mut dates = Vec::new();
    for today in [d(2025, 1, 31), d(2025, 2, 28), d(2025, 3, 31)] {
        let due = recurrence::due_rule_ids(&s, today);
        for t in recurrence::process_recurring_transactions(&mut s, &due, today).unwrap() {
            dates.push(t.date);
        }
    }
    assert_eq!(dates, vec![d(2025, 1, 31), d(2025, 2, 28), d(2025, 3, 31)]);
    assert_eq!(s.recurring(id).unwrap().next_due_date, d(2025, 4, 30));
}

#[test]
fn unknown_rule_id_fails_before_anything_is_generated() {
    let today = d(2025, 1, 31);
    let mut ws = workspace();
    let id = ws
        .apply(|s| {
            let bank = ledger::add_bank_account(s, "Main", "Bank", dec!(1000))?;
            recurrence::create_recurring(s, rent(bank))
        })
        .unwrap();
    let before = ws.state().clone();

    let err = ws
        .apply(|s| recurrence::process_recurring_transactions(s, &[id, Uuid::new_v4()], today))
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
    assert_eq!(ws.state(), &before);
}

fn bank_and_card_rules(s: &mut tallybook::AppState) -> (Uuid, Uuid, Uuid) {
    let bank = with_account(s, dec!(1000));
    let card = ledger::add_credit_card(s, "Visa", dec!(50), None).unwrap();
    let mut small = rent(bank);
    small.amount = dec!(10);
    let small = recurrence::create_recurring(s, small).unwrap();
    let mut big = rent(bank);
    big.amount = dec!(100);
    big.bank_account_id = None;
    big.credit_card_id = Some(card);
    big.payment_method = PaymentMethod::CreditCard;
    let big = recurrence::create_recurring(s, big).unwrap();
    (bank, small, big)
}

#[test]
fn failing_rule_rolls_back_the_whole_batch() {
    let today = d(2025, 1, 31);
    let mut s = state();
    let (_, small, big) = bank_and_card_rules(&mut s);
    let before = s.clone();

    let err = recurrence::process_recurring_transactions(&mut s, &[small, big], today).unwrap_err();
    assert!(matches!(err, CoreError::CreditLimitExceeded { .. }));
    assert_eq!(s, before);
}

#[test]
fn due_rules_run_one_at_a_time_and_report_failures() {
    let today = d(2025, 1, 31);
    let mut s = state();
    let (bank, small, big) = bank_and_card_rules(&mut s);

    let run = recurrence::process_due_rules(&mut s, today);
    assert_eq!(run.generated.len(), 1);
    assert_eq!(run.generated[0].recurring_transaction_id, Some(small));
    assert_eq!(run.failed.len(), 1);
    assert_eq!(run.failed[0].0, big);
    assert!(matches!(run.failed[0].1, CoreError::CreditLimitExceeded { .. }));

    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(990));
    assert_eq!(s.recurring(small).unwrap().next_due_date, d(2025, 2, 28));
    let stuck = s.recurring(big).unwrap();
    assert_eq!(stuck.next_due_date, today);
    assert_eq!(stuck.last_processed_date, None);
}

#[test]
fn rule_stops_after_end_date() {
    let mut s = state();
    let bank = with_account(&mut s, dec!(5000));
    let mut rule = rent(bank);
    rule.end_date = Some(d(2025, 2, 15));
    let id = recurrence::create_recurring(&mut s, rule).unwrap();

    let today = d(2025, 1, 31);
    recurrence::process_recurring_transactions(&mut s, &[id], today).unwrap();
    let rule = s.recurring(id).unwrap();
    assert!(!rule.is_active);
    assert!(recurrence::due_rule_ids(&s, d(2025, 3, 31)).is_empty());
    assert!(recurrence::set_recurring_active(&mut s, id, true).is_err());
}

#[test]
fn editing_a_rule_keeps_history_and_pause_state() {
    let today = d(2025, 1, 31);
    let mut s = state();
    let bank = with_account(&mut s, dec!(5000));
    let id = recurrence::create_recurring(&mut s, rent(bank)).unwrap();
    recurrence::process_recurring_transactions(&mut s, &[id], today).unwrap();
    recurrence::set_recurring_active(&mut s, id, false).unwrap();

    let mut edited = rent(bank);
    edited.id = id;
    edited.amount = dec!(950);
    edited.day_of_month = Some(15);
    recurrence::update_recurring(&mut s, edited).unwrap();

    let rule = s.recurring(id).unwrap();
    assert_eq!(rule.amount, dec!(950));
    assert_eq!(rule.last_processed_date, Some(today));
    assert_eq!(rule.next_due_date, d(2025, 2, 15));
    assert!(!rule.is_active);
}

#[test]
fn deleting_a_rule_keeps_its_transactions() {
    let today = d(2025, 1, 31);
    let mut s = state();
    let bank = with_account(&mut s, dec!(5000));
    let id = recurrence::create_recurring(&mut s, rent(bank)).unwrap();
    recurrence::process_recurring_transactions(&mut s, &[id], today).unwrap();

    recurrence::delete_recurring(&mut s, id).unwrap();
    assert_eq!(s.transactions.len(), 1);
    assert_eq!(s.transactions[0].recurring_transaction_id, None);
}

#[test]
fn recurring_add_arguments_build_a_rule() {
    let matches = cli::build_cli().get_matches_from([
        "tallybook",
        "recurring",
        "add",
        "--desc",
        "Gym",
        "--amount",
        "45.50",
        "--category",
        "other",
        "--frequency",
        "weekly",
        "--day-of-week",
        "1",
        "--start",
        "2025-09-01",
    ]);
    let Some(("recurring", rec)) = matches.subcommand() else {
        panic!("no recurring subcommand");
    };
    let Some(("add", add)) = rec.subcommand() else {
        panic!("no add subcommand");
    };
    let rule = recurring::rule_from_args(add).unwrap();
    assert_eq!(rule.amount, dec!(45.50));
    assert_eq!(rule.frequency, Frequency::Weekly);
    assert_eq!(rule.day_of_week, Some(1));
    assert_eq!(rule.payment_method, PaymentMethod::BankTransfer);
    assert_eq!(rule.r#type, TransactionType::Expense);

    // 2025-09-01 is a Monday, so it is its own first occurrence
    let mut s = state();
    let id = recurrence::create_recurring(&mut s, rule).unwrap();
    assert_eq!(s.recurring(id).unwrap().next_due_date, d(2025, 9, 1));
}
