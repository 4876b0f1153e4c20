// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::recurrence;
use crate::models::RecurringTransaction;
use crate::store::{KeyValueStore, Workspace};
use crate::utils::{
    fmt_opt_date, maybe_print_json, opt_id, parse_date, parse_decimal, parse_frequency, parse_id,
    parse_method, parse_type, pretty_table, req,
};
use anyhow::Result;
use chrono::NaiveDate;
use uuid::Uuid;

pub fn handle<S: KeyValueStore>(
    ws: &mut Workspace<S>,
    m: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let rule = rule_from_args(sub)?;
            let id = ws.apply(|s| recurrence::create_recurring(s, rule))?;
            let next = ws.state().recurring(id)?.next_due_date;
            println!("Added recurring rule {} (first due {})", id, next);
        }
        Some(("edit", sub)) => {
            let mut rule = rule_from_args(sub)?;
            rule.id = parse_id(req(sub, "id")?)?;
            let id = rule.id;
            ws.apply(|s| recurrence::update_recurring(s, rule))?;
            let next = ws.state().recurring(id)?.next_due_date;
            println!("Updated recurring rule {} (next due {})", id, next);
        }
        Some(("list", sub)) => {
            let rules = &ws.state().recurring_transactions;
            if !maybe_print_json(sub.get_flag("json"), rules)? {
                let rows = rules
                    .iter()
                    .map(|r| {
                        vec![
                            r.id.to_string(),
                            r.description.clone(),
                            (r.amount * r.r#type.sign()).to_string(),
                            format!("{:?}", r.frequency),
                            r.next_due_date.to_string(),
                            fmt_opt_date(r.last_processed_date),
                            if r.is_active { "yes" } else { "no" }.into(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Id", "Description", "Amount", "Frequency", "Next", "Last", "Active"],
                        rows
                    )
                );
            }
        }
        Some(("process", _)) => {
            let run = ws.apply(|s| Ok(recurrence::process_due_rules(s, today)))?;
            if run.generated.is_empty() && run.failed.is_empty() {
                println!("No recurring transactions due");
            }
            for t in &run.generated {
                println!("Generated {} on {}: {} {}", t.id, t.date, t.description, t.amount);
            }
            for (id, err) in &run.failed {
                eprintln!("Skipped rule {}: {}", id, err);
            }
        }
        Some(("pause", sub)) => {
            let id = parse_id(req(sub, "id")?)?;
            ws.apply(|s| recurrence::set_recurring_active(s, id, false))?;
            println!("Paused {}", id);
        }
        Some(("resume", sub)) => {
            let id = parse_id(req(sub, "id")?)?;
            ws.apply(|s| recurrence::set_recurring_active(s, id, true))?;
            println!("Resumed {}", id);
        }
        Some(("rm", sub)) => {
            let id = parse_id(req(sub, "id")?)?;
            ws.apply(|s| recurrence::delete_recurring(s, id))?;
            println!("Removed recurring rule {}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn rule_from_args(sub: &clap::ArgMatches) -> Result<RecurringTransaction> {
    let start = parse_date(req(sub, "start")?)?;
    let end = sub.get_one::<String>("end").map(|s| parse_date(s)).transpose()?;
    Ok(RecurringTransaction {
        id: Uuid::nil(),
        description: req(sub, "desc")?.to_string(),
        amount: parse_decimal(req(sub, "amount")?)?,
        r#type: parse_type(req(sub, "type")?)?,
        category_id: req(sub, "category")?.to_string(),
        payment_method: parse_method(req(sub, "method")?)?,
        bank_account_id: opt_id(sub, "account")?,
        credit_card_id: opt_id(sub, "card")?,
        frequency: parse_frequency(req(sub, "frequency")?)?,
        start_date: start,
        end_date: end,
        day_of_week: sub.get_one::<u32>("day-of-week").copied(),
        day_of_month: sub.get_one::<u32>("day-of-month").copied(),
        next_due_date: start,
        last_processed_date: None,
        is_active: true,
    })
}
