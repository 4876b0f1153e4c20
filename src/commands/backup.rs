// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! `export` and `import`: whole-book JSON snapshots.

use crate::store::{KeyValueStore, Workspace};
use crate::utils::req;
use anyhow::{Context, Result};
use std::path::Path;

pub fn export<S: KeyValueStore>(ws: &Workspace<S>, m: &clap::ArgMatches) -> Result<()> {
    let out = req(m, "out")?;
    write_export(ws, Path::new(out))?;
    println!("Exported all data to {}", out);
    Ok(())
}

pub fn write_export<S: KeyValueStore>(ws: &Workspace<S>, out: &Path) -> Result<()> {
    let snapshot = ws.export_all()?;
    std::fs::write(out, serde_json::to_string_pretty(&snapshot)?)
        .with_context(|| format!("Write export to {}", out.display()))?;
    Ok(())
}

pub fn import<S: KeyValueStore>(ws: &mut Workspace<S>, m: &clap::ArgMatches) -> Result<()> {
    let file = req(m, "file")?;
    read_import(ws, Path::new(file))?;
    let state = ws.state();
    println!(
        "Imported {} transactions, {} accounts, {} cards from {}",
        state.transactions.len(),
        state.bank_accounts.len(),
        state.credit_cards.len(),
        file
    );
    Ok(())
}

pub fn read_import<S: KeyValueStore>(ws: &mut Workspace<S>, file: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Read import file {}", file.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("Parse {}", file.display()))?;
    ws.import_all(value)?;
    Ok(())
}
