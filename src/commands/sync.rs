use anyhow::{Context as _, Result};

use crate::Context;
use crate::cli::SyncArgs;
use crate::config::SyncConfig;
use crate::ui;
use roster::backend::slack::SlackClient;
use roster::backend::teamkatalog::TeamkatalogClient;
use roster::{SnapshotStore, SyncOutcome, UserCache, run_cycle};

pub fn run(ctx: &Context, args: &SyncArgs) -> Result<()> {
    let config = SyncConfig::from_args(args).context("Invalid sync configuration")?;

    if !ctx.quiet {
        ui::header("Syncing Security Champions");
        ui::kv("Role", &config.options.role);
        ui::kv("Snapshot", &config.store.describe());
        if config.options.dry_run {
            ui::warn("Dry run: snapshot and user cache will not be saved");
        }
    }

    let mut directory = TeamkatalogClient::new(&config.teamkatalog_url);
    if let Some(token) = &config.teamkatalog_token {
        directory = directory.with_token(token);
    }
    let slack = SlackClient::new(&config.slack_token);

    let blobs = config.store.open()?;
    let snapshots = SnapshotStore::with_key(&blobs, config.store.snapshot_key());
    let user_cache = config.user_cache.then(|| UserCache::new(&blobs));

    let outcome = run_cycle(
        &config.options,
        &directory,
        &slack,
        &snapshots,
        user_cache.as_ref(),
    );

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            ui::error(&e.to_string());
            ui::dim(e.category().advice());
            return Err(e).context("Sync failed");
        }
    };

    if ctx.quiet {
        return Ok(());
    }

    println!();
    match outcome {
        SyncOutcome::NoChanges { unchanged } => {
            ui::success(&format!(
                "No changes detected ({} unchanged)",
                ui::count(unchanged, "champion")
            ));
        }
        SyncOutcome::Notified {
            summary,
            unresolved,
        } => {
            ui::success(&format!("Announced {}", ui::format_summary(&summary)));
            if unresolved > 0 {
                ui::warn(&format!(
                    "{} not found in Slack and left out of the messages",
                    ui::count(unresolved, "champion")
                ));
            }
            if ctx.verbose > 0 {
                ui::kv("Admin channel", &config.options.channels.admin);
                ui::kv("Public channel", &config.options.channels.public);
            }
        }
    }
    Ok(())
}
