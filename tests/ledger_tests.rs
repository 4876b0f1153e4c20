// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{d, state, with_account, workspace};
use rust_decimal_macros::dec;
use tallybook::CoreError;
use tallybook::engine::{ledger, net_worth};
use tallybook::models::{PaymentMethod, SplitLine, TransactionDraft, TransactionType};

fn expense(amount: rust_decimal::Decimal, method: PaymentMethod) -> TransactionDraft {
    TransactionDraft::new(
        d(2025, 4, 10),
        "groceries",
        amount,
        TransactionType::Expense,
        "food",
        method,
    )
}

#[test]
fn update_then_delete_restores_opening_balance() {
    let mut s = state();
    let bank = with_account(&mut s, dec!(1000));

    let id = ledger::create_transaction(&mut s, expense(dec!(200), PaymentMethod::DebitCard).with_bank_account(bank))
        .unwrap();
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(800));

    // switching to cash detaches the bank effect entirely
    let mut txn = s.transaction(id).unwrap().clone();
    txn.amount = dec!(150);
    txn.payment_method = PaymentMethod::Cash;
    ledger::update_transaction(&mut s, txn.clone()).unwrap();
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(1000));

    txn.payment_method = PaymentMethod::BankTransfer;
    ledger::update_transaction(&mut s, txn).unwrap();
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(850));

    let report = ledger::delete_transaction(&mut s, id, d(2025, 4, 11)).unwrap();
    assert!(report.is_empty());
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(1000));
    assert!(s.transactions.is_empty());
}

#[test]
fn income_credits_bank_regardless_of_method() {
    let mut s = state();
    let bank = with_account(&mut s, dec!(0));
    let draft = TransactionDraft::new(
        d(2025, 4, 1),
        "salary",
        dec!(2500),
        TransactionType::Income,
        "salary",
        PaymentMethod::Other,
    )
    .with_bank_account(bank);
    ledger::create_transaction(&mut s, draft).unwrap();
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(2500));
}

#[test]
fn over_limit_card_charge_leaves_state_untouched() {
    let mut ws = workspace();
    let card = ws
        .apply(|s| ledger::add_credit_card(s, "Visa", dec!(500), None))
        .unwrap();
    ws.apply(|s| ledger::create_transaction(s, expense(dec!(400), PaymentMethod::CreditCard).with_credit_card(card)))
        .unwrap();
    assert_eq!(ws.state().credit_card(card).unwrap().available_balance, dec!(100));

    let before = ws.state().clone();
    let err = ws
        .apply(|s| ledger::create_transaction(s, expense(dec!(200), PaymentMethod::CreditCard).with_credit_card(card)))
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::CreditLimitExceeded { available, requested }
            if available == dec!(100) && requested == dec!(200)
    ));
    assert_eq!(ws.state(), &before);
}

#[test]
fn paying_a_card_from_the_bank_moves_both_balances() {
    let mut s = state();
    let bank = with_account(&mut s, dec!(1000));
    let card = ledger::add_credit_card(&mut s, "Visa", dec!(500), None).unwrap();
    ledger::create_transaction(&mut s, expense(dec!(400), PaymentMethod::CreditCard).with_credit_card(card))
        .unwrap();

    ledger::pay_credit_card(&mut s, card, Some(bank), dec!(150), d(2025, 4, 20)).unwrap();
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(850));
    assert_eq!(s.credit_card(card).unwrap().available_balance, dec!(250));

    let err = ledger::pay_credit_card(&mut s, card, Some(bank), dec!(300), d(2025, 4, 20)).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    // no cash on hand
    let err = ledger::pay_credit_card(&mut s, card, None, dec!(50), d(2025, 4, 20)).unwrap_err();
    assert!(matches!(err, CoreError::InsufficientFunds { .. }));
}

#[test]
fn transfer_requires_funds_and_moves_money() {
    let mut ws = workspace();
    let (a, b) = ws
        .apply(|s| {
            let a = ledger::add_bank_account(s, "A", "Bank", dec!(100))?;
            let b = ledger::add_bank_account(s, "B", "Bank", dec!(0))?;
            Ok((a, b))
        })
        .unwrap();

    let before = ws.state().clone();
    let err = ws
        .apply(|s| ledger::transfer_between_accounts(s, a, b, dec!(150), d(2025, 5, 1)))
        .unwrap_err();
    assert!(matches!(err, CoreError::InsufficientFunds { .. }));
    assert_eq!(ws.state(), &before);

    ws.apply(|s| ledger::transfer_between_accounts(s, a, b, dec!(60), d(2025, 5, 1)))
        .unwrap();
    assert_eq!(ws.state().bank_account(a).unwrap().current_balance, dec!(40));
    assert_eq!(ws.state().bank_account(b).unwrap().current_balance, dec!(60));
    assert_eq!(ws.state().transactions.len(), 2);
}

#[test]
fn cash_deposit_moves_cash_into_the_bank() {
    let mut s = state();
    let bank = with_account(&mut s, dec!(0));
    let gift = TransactionDraft::new(
        d(2025, 6, 1),
        "birthday",
        dec!(300),
        TransactionType::Income,
        "salary",
        PaymentMethod::Cash,
    );
    ledger::create_transaction(&mut s, gift).unwrap();
    assert_eq!(net_worth::cash_balance(&s), dec!(300));

    ledger::deposit_cash(&mut s, bank, dec!(100), d(2025, 6, 2)).unwrap();
    assert_eq!(net_worth::cash_balance(&s), dec!(200));
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(100));

    let err = ledger::deposit_cash(&mut s, bank, dec!(500), d(2025, 6, 2)).unwrap_err();
    assert!(matches!(err, CoreError::InsufficientFunds { .. }));
}

#[test]
fn split_lines_must_add_up() {
    let mut s = state();
    let mut draft = expense(dec!(100), PaymentMethod::Cash);
    draft.splits = vec![
        SplitLine {
            category_id: "food".into(),
            amount: dec!(60),
        },
        SplitLine {
            category_id: "other".into(),
            amount: dec!(30),
        },
    ];
    let err = ledger::create_transaction(&mut s, draft).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert!(s.transactions.is_empty());
}

#[test]
fn ledger_stays_newest_first() {
    let mut s = state();
    for day in [3, 1, 7] {
        let mut draft = expense(dec!(5), PaymentMethod::Cash);
        draft.date = d(2025, 4, day);
        ledger::create_transaction(&mut s, draft).unwrap();
    }
    let dates: Vec<_> = s.transactions.iter().map(|t| t.date).collect();
    assert_eq!(dates, vec![d(2025, 4, 7), d(2025, 4, 3), d(2025, 4, 1)]);
}

#[test]
fn account_with_history_cannot_be_removed() {
    let mut s = state();
    let bank = with_account(&mut s, dec!(50));
    ledger::create_transaction(&mut s, expense(dec!(10), PaymentMethod::DebitCard).with_bank_account(bank))
        .unwrap();
    assert!(ledger::remove_bank_account(&mut s, bank).is_err());
    assert!(matches!(
        ledger::remove_bank_account(&mut s, uuid::Uuid::new_v4()),
        Err(CoreError::NotFound { .. })
    ));
}

#[test]
fn moving_an_expense_between_accounts_and_onto_a_card() {
    let mut s = state();
    let checking = with_account(&mut s, dec!(1000));
    let savings = ledger::add_bank_account(&mut s, "Savings", "Other Bank", dec!(500)).unwrap();
    let card = ledger::add_credit_card(&mut s, "Visa", dec!(500), None).unwrap();

    let id = ledger::create_transaction(
        &mut s,
        expense(dec!(200), PaymentMethod::BankTransfer).with_bank_account(checking),
    )
    .unwrap();
    assert_eq!(s.bank_account(checking).unwrap().current_balance, dec!(800));

    let mut txn = s.transaction(id).unwrap().clone();
    txn.bank_account_id = Some(savings);
    ledger::update_transaction(&mut s, txn.clone()).unwrap();
    assert_eq!(s.bank_account(checking).unwrap().current_balance, dec!(1000));
    assert_eq!(s.bank_account(savings).unwrap().current_balance, dec!(300));

    txn.bank_account_id = None;
    txn.credit_card_id = Some(card);
    txn.payment_method = PaymentMethod::CreditCard;
    ledger::update_transaction(&mut s, txn).unwrap();
    assert_eq!(s.bank_account(savings).unwrap().current_balance, dec!(500));
    assert_eq!(s.credit_card(card).unwrap().available_balance, dec!(300));
}

#[test]
fn card_id_unused_by_the_payment_method_is_ignored() {
    let mut s = state();
    let bank = with_account(&mut s, dec!(1000));
    let card = ledger::add_credit_card(&mut s, "Visa", dec!(500), None).unwrap();

    let by_transfer = expense(dec!(100), PaymentMethod::BankTransfer)
        .with_bank_account(bank)
        .with_credit_card(card);
    ledger::create_transaction(&mut s, by_transfer).unwrap();
    ledger::create_transaction(&mut s, expense(dec!(40), PaymentMethod::Cash).with_credit_card(card))
        .unwrap();

    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(900));
    assert_eq!(s.credit_card(card).unwrap().available_balance, dec!(500));
    assert_eq!(net_worth::cash_balance(&s), dec!(-40));
}

#[test]
fn unknown_transaction_id_is_not_found_and_changes_nothing() {
    let mut s = state();
    let bank = with_account(&mut s, dec!(1000));
    let id = ledger::create_transaction(&mut s, expense(dec!(50), PaymentMethod::Cheque).with_bank_account(bank))
        .unwrap();
    let before = s.clone();

    let mut stranger = s.transaction(id).unwrap().clone();
    stranger.id = uuid::Uuid::new_v4();
    let err = ledger::update_transaction(&mut s, stranger.clone()).unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
    let err = ledger::delete_transaction(&mut s, stranger.id, d(2025, 4, 11)).unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
    assert_eq!(s, before);
}

#[test]
fn update_refused_by_the_card_limit_keeps_old_balances() {
    let mut s = state();
    let bank = with_account(&mut s, dec!(1000));
    let card = ledger::add_credit_card(&mut s, "Visa", dec!(500), None).unwrap();
    let id = ledger::create_transaction(
        &mut s,
        expense(dec!(200), PaymentMethod::BankTransfer).with_bank_account(bank),
    )
    .unwrap();
    let before = s.clone();

    let mut txn = s.transaction(id).unwrap().clone();
    txn.amount = dec!(600);
    txn.bank_account_id = None;
    txn.credit_card_id = Some(card);
    txn.payment_method = PaymentMethod::CreditCard;
    let err = ledger::update_transaction(&mut s, txn).unwrap_err();
    assert!(matches!(err, CoreError::CreditLimitExceeded { .. }));

    assert_eq!(s, before);
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(800));
    assert_eq!(s.credit_card(card).unwrap().available_balance, dec!(500));
    assert_eq!(s.transaction(id).unwrap().amount, dec!(200));
}

#[test]
fn only_the_deposit_posting_draws_down_cash() {
    let mut s = state();
    let bank = with_account(&mut s, dec!(100));
    let wages = TransactionDraft::new(
        d(2025, 4, 1),
        "tips",
        dec!(300),
        TransactionType::Income,
        "salary",
        PaymentMethod::Cash,
    );
    ledger::create_transaction(&mut s, wages).unwrap();
    ledger::deposit_cash(&mut s, bank, dec!(120), d(2025, 4, 2)).unwrap();
    assert_eq!(net_worth::cash_balance(&s), dec!(180));

    let fee = TransactionDraft::new(
        d(2025, 4, 3),
        "deposit fee",
        dec!(5),
        TransactionType::Expense,
        "cash-deposit",
        PaymentMethod::BankTransfer,
    )
    .with_bank_account(bank);
    ledger::create_transaction(&mut s, fee).unwrap();
    assert_eq!(net_worth::cash_balance(&s), dec!(180));
    assert_eq!(s.bank_account(bank).unwrap().current_balance, dec!(215));
}
