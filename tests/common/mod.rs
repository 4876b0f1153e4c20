// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tallybook::engine::ledger;
use tallybook::{AppState, MemoryStore, Workspace};
use uuid::Uuid;

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn state() -> AppState {
    AppState::with_defaults()
}

pub fn with_account(state: &mut AppState, opening: Decimal) -> Uuid {
    ledger::add_bank_account(state, "Checking", "First Bank", opening).unwrap()
}

pub fn workspace() -> Workspace<MemoryStore> {
    Workspace::load(MemoryStore::new()).unwrap()
}
