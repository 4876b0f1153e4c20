// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{d, state, with_account};
use chrono::{Days, NaiveDate};
use rust_decimal_macros::dec;
use tallybook::engine::payments::{self, NewObligation, PaymentInput, PaymentTarget};
use tallybook::engine::projection::{self, EventSource};
use tallybook::cli;
use tallybook::engine::{ledger, net_worth, recurrence};
use tallybook::models::{
    Frequency, LongTermLiability, PaymentMethod, RecurringTransaction, TransactionDraft,
    TransactionType,
};
use uuid::Uuid;

fn weekly_groceries(bank: Uuid, start: NaiveDate) -> RecurringTransaction {
    RecurringTransaction {
        id: Uuid::nil(),
        description: "Groceries".into(),
        amount: dec!(100),
        r#type: TransactionType::Expense,
        category_id: "food".into(),
        payment_method: PaymentMethod::DebitCard,
        bank_account_id: Some(bank),
        credit_card_id: None,
        frequency: Frequency::Weekly,
        start_date: start,
        end_date: None,
        day_of_week: None,
        day_of_month: None,
        next_due_date: start,
        last_processed_date: None,
        is_active: true,
    }
}

#[test]
fn forecast_applies_rules_payables_and_receivables() {
    let today = d(2025, 5, 5);
    let mut s = state();
    let bank = with_account(&mut s, dec!(1000));
    recurrence::create_recurring(&mut s, weekly_groceries(bank, today)).unwrap();
    let rent = NewObligation {
        counterparty_name: "Landlord",
        description: "rent",
        total_amount: dec!(250),
        due_date: d(2025, 5, 8),
    };
    payments::add_payable(&mut s, rent, today).unwrap();
    let loan = NewObligation {
        counterparty_name: "Jo",
        description: "loan back",
        total_amount: dec!(300),
        due_date: d(2025, 5, 10),
    };
    payments::add_receivable(&mut s, loan, today).unwrap();

    let days = projection::project_state(&s, 7, today);
    assert_eq!(days.len(), 7);
    assert_eq!(days[0].start_balance, dec!(1000));
    assert_eq!(days[0].end_balance, dec!(900));
    assert_eq!(days[3].events[0].source, EventSource::Payable);
    assert_eq!(days[3].end_balance, dec!(650));
    assert_eq!(days[5].events[0].source, EventSource::Receivable);
    assert_eq!(days[6].end_balance, dec!(950));
    assert!(days.windows(2).all(|w| w[1].start_balance == w[0].end_balance));
}

#[test]
fn forecast_is_repeatable_and_leaves_state_alone() {
    let today = d(2025, 5, 5);
    let mut s = state();
    let bank = with_account(&mut s, dec!(400));
    recurrence::create_recurring(&mut s, weekly_groceries(bank, d(2025, 5, 6))).unwrap();
    let before = s.clone();

    let first = projection::project_state(&s, 7, today);
    let second = projection::project_state(&s, 7, today);
    assert_eq!(first, second);
    assert_eq!(s, before);

    // a longer horizon fires the weekly rule again on the local copy
    let month = projection::project_state(&s, 30, today);
    let fired = month.iter().flat_map(|day| &day.events).count();
    assert_eq!(fired, 5);
    assert_eq!(s.recurring_transactions[0].next_due_date, d(2025, 5, 6));
}

#[test]
fn forecast_stops_at_the_last_representable_date() {
    let today = NaiveDate::MAX.checked_sub_days(Days::new(2)).unwrap();
    let mut s = state();
    let bank = with_account(&mut s, dec!(1000));
    let mut rule = weekly_groceries(bank, today);
    rule.frequency = Frequency::Daily;
    recurrence::create_recurring(&mut s, rule).unwrap();

    let days = projection::project_state(&s, 10, today);
    assert_eq!(days.len(), 3);
    assert_eq!(days[2].date, NaiveDate::MAX);
    assert_eq!(days[2].end_balance, dec!(700));
}

#[test]
fn forecast_days_outside_range_are_refused_by_the_cli() {
    for days in ["0", "3651", "4294967295"] {
        let res = cli::build_cli().try_get_matches_from(["tallybook", "forecast", "--days", days]);
        assert!(res.is_err(), "{} days accepted", days);
    }
    let ok = cli::build_cli()
        .try_get_matches_from(["tallybook", "forecast", "--days", "3650"])
        .unwrap();
    let Some(("forecast", sub)) = ok.subcommand() else {
        panic!("no forecast subcommand");
    };
    assert_eq!(sub.get_one::<u32>("days"), Some(&3650));
}

#[test]
fn net_worth_nets_assets_against_liabilities() {
    let today = d(2025, 7, 1);
    let mut s = state();
    let bank = with_account(&mut s, dec!(5000));
    let card = ledger::add_credit_card(&mut s, "Visa", dec!(2000), None).unwrap();
    let draft = TransactionDraft::new(
        today,
        "flights",
        dec!(700),
        TransactionType::Expense,
        "transport",
        PaymentMethod::CreditCard,
    )
    .with_credit_card(card);
    ledger::create_transaction(&mut s, draft).unwrap();
    payments::add_asset(&mut s, "Car", dec!(12000), Some(dec!(9000))).unwrap();
    let mortgage = LongTermLiability {
        id: Uuid::nil(),
        name: "Mortgage".into(),
        original_amount: dec!(10000),
        monthly_payment: dec!(500),
        interest_rate: dec!(3.5),
        start_date: d(2024, 1, 1),
        payments: vec![],
    };
    let loan = payments::add_long_term_liability(&mut s, mortgage).unwrap();
    payments::record_payment(
        &mut s,
        PaymentTarget::LongTerm(loan),
        PaymentInput::from_bank(dec!(1000), today, bank),
        today,
    )
    .unwrap();

    let nw = net_worth::compute_net_worth(&s);
    assert_eq!(nw.bank_balances, dec!(4000));
    assert_eq!(nw.assets, dec!(9000));
    assert_eq!(nw.credit_card_debt, dec!(700));
    assert_eq!(nw.long_term_liabilities, dec!(9000));
    assert_eq!(nw.total_assets, dec!(13000));
    assert_eq!(nw.total_liabilities, dec!(9700));
    assert_eq!(nw.net_worth, dec!(3300));
}

#[test]
fn snapshot_taken_twice_in_a_day_is_overwritten() {
    let mut s = state();
    let bank = with_account(&mut s, dec!(100));
    let today = d(2025, 7, 1);
    net_worth::record_snapshot(&mut s, d(2025, 6, 30));
    net_worth::record_snapshot(&mut s, today);
    s.bank_account_mut(bank).unwrap().current_balance = dec!(250);
    let snap = net_worth::record_snapshot(&mut s, today);

    assert_eq!(s.net_worth_snapshots.len(), 2);
    assert_eq!(snap.net_worth, dec!(250));
    assert_eq!(s.net_worth_snapshots[1], snap);
    assert_eq!(s.net_worth_snapshots[0].date, d(2025, 6, 30));
}
