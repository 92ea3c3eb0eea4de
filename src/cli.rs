use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "champion-sync")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Announce Security Champion changes from Teamkatalog in Slack", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Diff the roster against the last snapshot and announce changes
    Sync(SyncArgs),

    /// Show the stored snapshot
    Snapshot(SnapshotArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Storage
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Files in a local state directory
    Local,
    /// Objects in a Google Cloud Storage bucket
    Gcs,
}

#[derive(Args, Clone, Debug)]
pub struct StoreArgs {
    /// Where the snapshot is kept
    #[arg(long, value_enum, env = "SNAPSHOT_STORE", default_value = "local")]
    pub store: StoreKind,

    /// State directory for the local store (default: ~/.local/state/champion-sync)
    #[arg(long, env = "STATE_DIR")]
    pub state_dir: Option<String>,

    /// Bucket for the gcs store
    #[arg(long, env = "GCS_BUCKET")]
    pub bucket: Option<String>,

    /// OAuth access token for the gcs store
    #[arg(long, env = "GCS_TOKEN", hide_env_values = true)]
    pub gcs_token: Option<String>,

    /// Blob key of the snapshot
    #[arg(long, default_value = roster::DEFAULT_SNAPSHOT_KEY)]
    pub snapshot_key: String,
}

// ============================================================================
// Sync
// ============================================================================

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Compute and announce changes without saving the snapshot
    #[arg(short, long, env = "DRY_RUN", value_parser = BoolishValueParser::new())]
    pub dry_run: bool,

    /// Teamkatalog role to track
    #[arg(long, default_value = roster::DEFAULT_ROLE)]
    pub role: String,

    /// Slack channel receiving the full change list
    #[arg(long, env = "SECURITY_CHAMPION_ADMIN_CHANNEL")]
    pub admin_channel: Option<String>,

    /// Slack channel receiving welcomes for new champions
    #[arg(long, env = "SECURITY_CHAMPION_CHANNEL")]
    pub channel: Option<String>,

    /// Slack bot token
    #[arg(long, env = "SLACK_TOKEN", hide_env_values = true)]
    pub slack_token: Option<String>,

    /// Teamkatalog API base URL
    #[arg(long, env = "TEAMKATALOG_API_URL")]
    pub teamkatalog_url: Option<String>,

    /// Teamkatalog bearer token, if the API requires one
    #[arg(long, env = "TEAMKATALOG_TOKEN", hide_env_values = true)]
    pub teamkatalog_token: Option<String>,

    /// Cache the Slack user list next to the snapshot
    #[arg(long)]
    pub user_cache: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

// ============================================================================
// Snapshot
// ============================================================================

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Print the raw JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}
