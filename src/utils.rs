// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use std::sync::Once;
use uuid::Uuid;

use crate::models::{Frequency, PaymentMethod, TransactionType};

static TRACING_INIT: Once = Once::new();

/// Installs the global subscriber once. `RUST_LOG` overrides the default
/// `tallybook=info`; output goes to stderr so `--json` stays parseable.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tallybook=info"));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s.trim()).with_context(|| format!("Invalid id '{}'", s))
}

/// Required string argument; clap enforces presence, this keeps the lookup fallible.
pub fn req<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a str> {
    m.get_one::<String>(id)
        .map(|s| s.as_str())
        .with_context(|| format!("missing --{}", id))
}

/// Optional `--date`-style argument, falling back to `today`.
pub fn date_or(m: &clap::ArgMatches, id: &str, today: NaiveDate) -> Result<NaiveDate> {
    match m.get_one::<String>(id) {
        Some(s) => parse_date(s),
        None => Ok(today),
    }
}

pub fn opt_id(m: &clap::ArgMatches, id: &str) -> Result<Option<Uuid>> {
    m.get_one::<String>(id).map(|s| parse_id(s)).transpose()
}

pub fn opt_decimal(m: &clap::ArgMatches, id: &str) -> Result<Option<Decimal>> {
    m.get_one::<String>(id).map(|s| parse_decimal(s)).transpose()
}

pub fn parse_type(s: &str) -> Result<TransactionType> {
    match s.trim().to_lowercase().as_str() {
        "income" => Ok(TransactionType::Income),
        "expense" => Ok(TransactionType::Expense),
        other => bail!("Unknown transaction type '{}'", other),
    }
}

pub fn parse_method(s: &str) -> Result<PaymentMethod> {
    Ok(match s.trim().to_lowercase().replace('_', "-").as_str() {
        "cash" => PaymentMethod::Cash,
        "bank-transfer" => PaymentMethod::BankTransfer,
        "credit-card" => PaymentMethod::CreditCard,
        "cheque" => PaymentMethod::Cheque,
        "debit-card" => PaymentMethod::DebitCard,
        "other" => PaymentMethod::Other,
        other => bail!("Unknown payment method '{}'", other),
    })
}

pub fn parse_frequency(s: &str) -> Result<Frequency> {
    Ok(match s.trim().to_lowercase().as_str() {
        "daily" => Frequency::Daily,
        "weekly" => Frequency::Weekly,
        "monthly" => Frequency::Monthly,
        "yearly" => Frequency::Yearly,
        other => bail!("Unknown frequency '{}'", other),
    })
}

pub fn fmt_opt_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
    }
}

/// Builds `year-month-day`, pulling `day` back to the month's last day when it overflows.
pub fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// First day of the month `months` after (or before) the month containing `date`.
pub fn shift_month(date: NaiveDate, months: i32) -> (i32, u32) {
    let idx = date.year() * 12 + date.month0() as i32 + months;
    (idx.div_euclid(12), idx.rem_euclid(12) as u32 + 1)
}

/// `YYYY-MM` key of a date, matching the budget month format.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}
