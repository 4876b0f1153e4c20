// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::ledger;
use crate::models::{Category, CategoryKind};
use crate::store::{KeyValueStore, Workspace};
use crate::utils::{maybe_print_json, pretty_table, req};
use anyhow::{Result, bail};

pub fn handle<S: KeyValueStore>(ws: &mut Workspace<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let id = req(sub, "id")?.trim().to_lowercase();
            let name = sub
                .get_one::<String>("name")
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| id.clone());
            let kind = match req(sub, "kind")? {
                "income" => CategoryKind::Income,
                "expense" => CategoryKind::Expense,
                "transfer" => CategoryKind::Transfer,
                other => bail!("Unknown category kind '{}'", other),
            };
            let category = Category {
                id: id.clone(),
                name,
                kind,
            };
            ws.apply(|s| ledger::add_category(s, category))?;
            println!("Added category '{}'", id);
        }
        Some(("list", sub)) => {
            let cats = &ws.state().categories;
            if !maybe_print_json(sub.get_flag("json"), cats)? {
                let rows = cats
                    .iter()
                    .map(|c| vec![c.id.clone(), c.name.clone(), format!("{:?}", c.kind)])
                    .collect();
                println!("{}", pretty_table(&["Id", "Name", "Kind"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
