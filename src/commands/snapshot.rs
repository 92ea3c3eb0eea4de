use anyhow::{Context as _, Result};
use std::collections::BTreeMap;

use crate::Context;
use crate::cli::SnapshotArgs;
use crate::config::StoreConfig;
use crate::ui;
use roster::{RosterEntry, SnapshotStore};

pub fn run(ctx: &Context, args: &SnapshotArgs) -> Result<()> {
    let store = StoreConfig::from_args(&args.store).context("Invalid store configuration")?;
    let blobs = store.open()?;
    let snapshots = SnapshotStore::with_key(&blobs, store.snapshot_key());

    let Some(entries) = snapshots
        .load_previous()
        .with_context(|| format!("Failed to load snapshot {}", store.describe()))?
    else {
        ui::info(&format!("No snapshot at {}", store.describe()));
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    ui::header("Security Champions snapshot");
    ui::kv("Location", &store.describe());
    ui::kv("Champions", &entries.len().to_string());

    let teams = group_by_team(&entries);
    ui::kv("Teams", &teams.len().to_string());

    if ctx.quiet {
        return Ok(());
    }
    for (team, members) in &teams {
        ui::section(team);
        for member in members {
            ui::dim(&ui::format_member(member));
        }
    }
    Ok(())
}

/// Entries keyed by team name, sorted
fn group_by_team(entries: &[RosterEntry]) -> BTreeMap<String, Vec<&RosterEntry>> {
    let mut teams: BTreeMap<String, Vec<&RosterEntry>> = BTreeMap::new();
    for entry in entries {
        let name = if entry.group.name.is_empty() {
            entry.group.id.clone()
        } else {
            entry.group.name.clone()
        };
        teams.entry(name).or_default().push(entry);
    }
    teams
}
