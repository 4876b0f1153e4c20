// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod backup;
pub mod budgets;
pub mod cards;
pub mod categories;
pub mod debts;
pub mod doctor;
pub mod forecast;
pub mod goals;
pub mod liabilities;
pub mod networth;
pub mod obligations;
pub mod recurring;
pub mod transactions;
