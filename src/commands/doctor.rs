// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::audit;
use crate::store::{KeyValueStore, Workspace};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle<S: KeyValueStore>(ws: &mut Workspace<S>, m: &clap::ArgMatches) -> Result<()> {
    let issues = audit::audit(ws.state());
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
        return Ok(());
    }

    let rows = issues
        .iter()
        .map(|i| vec![i.code().to_string(), i.detail()])
        .collect();
    println!("{}", pretty_table(&["Issue", "Detail"], rows));

    if m.get_flag("fix") {
        let fixed = ws.apply(|s| Ok(audit::repair_balances(s)))?;
        println!("Repaired {} balance(s) from the ledger", fixed);
    }
    Ok(())
}
