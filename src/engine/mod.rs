// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure state transitions over [`crate::state::AppState`]. Nothing in here
//! touches storage; the [`crate::store::Workspace`] decides what to persist.

pub mod audit;
pub mod budgets;
pub mod cascade;
pub mod debts;
pub mod ledger;
pub mod net_worth;
pub mod payments;
pub mod projection;
pub mod recurrence;
pub mod stats;
