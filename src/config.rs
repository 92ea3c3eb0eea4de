use crate::cli::{StoreArgs, StoreKind, SyncArgs};
use roster::store::file::FileStore;
use roster::store::gcs::GcsStore;
use roster::{BlobStore, Channels, SyncOptions};

/// Configuration problems found before anything is fetched
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing {flag} (or {env})")]
    Missing {
        flag: &'static str,
        env: &'static str,
    },

    #[error("{0}")]
    Store(#[from] roster::Error),
}

fn required(
    value: Option<&String>,
    flag: &'static str,
    env: &'static str,
) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .ok_or(ConfigError::Missing { flag, env })
}

// ============================================================================
// Sync Config
// ============================================================================

/// Everything a sync run needs, validated
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub options: SyncOptions,
    pub slack_token: String,
    pub teamkatalog_url: String,
    pub teamkatalog_token: Option<String>,
    pub user_cache: bool,
    pub store: StoreConfig,
}

impl SyncConfig {
    pub fn from_args(args: &SyncArgs) -> Result<Self, ConfigError> {
        let channels = Channels {
            admin: required(
                args.admin_channel.as_ref(),
                "--admin-channel",
                "SECURITY_CHAMPION_ADMIN_CHANNEL",
            )?,
            public: required(args.channel.as_ref(), "--channel", "SECURITY_CHAMPION_CHANNEL")?,
        };

        Ok(Self {
            options: SyncOptions {
                role: args.role.clone(),
                dry_run: args.dry_run,
                channels,
            },
            slack_token: required(args.slack_token.as_ref(), "--slack-token", "SLACK_TOKEN")?,
            teamkatalog_url: required(
                args.teamkatalog_url.as_ref(),
                "--teamkatalog-url",
                "TEAMKATALOG_API_URL",
            )?,
            teamkatalog_token: args
                .teamkatalog_token
                .clone()
                .filter(|t| !t.trim().is_empty()),
            user_cache: args.user_cache,
            store: StoreConfig::from_args(&args.store)?,
        })
    }
}

// ============================================================================
// Store Config
// ============================================================================

/// Snapshot location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Local {
        state_dir: Option<String>,
        snapshot_key: String,
    },
    Gcs {
        bucket: String,
        token: String,
        snapshot_key: String,
    },
}

impl StoreConfig {
    pub fn from_args(args: &StoreArgs) -> Result<Self, ConfigError> {
        Ok(match args.store {
            StoreKind::Local => Self::Local {
                state_dir: args.state_dir.clone(),
                snapshot_key: args.snapshot_key.clone(),
            },
            StoreKind::Gcs => Self::Gcs {
                bucket: required(args.bucket.as_ref(), "--bucket", "GCS_BUCKET")?,
                token: required(args.gcs_token.as_ref(), "--gcs-token", "GCS_TOKEN")?,
                snapshot_key: args.snapshot_key.clone(),
            },
        })
    }

    pub fn snapshot_key(&self) -> &str {
        match self {
            Self::Local { snapshot_key, .. } | Self::Gcs { snapshot_key, .. } => snapshot_key,
        }
    }

    /// Human-readable location, for output
    pub fn describe(&self) -> String {
        match self {
            Self::Local {
                state_dir: Some(dir),
                snapshot_key,
            } => format!("{dir}/{snapshot_key}"),
            Self::Local {
                state_dir: None,
                snapshot_key,
            } => format!("~/.local/state/champion-sync/{snapshot_key}"),
            Self::Gcs {
                bucket,
                snapshot_key,
                ..
            } => format!("gs://{bucket}/{snapshot_key}"),
        }
    }

    /// Open the configured blob store
    pub fn open(&self) -> Result<Box<dyn BlobStore>, ConfigError> {
        let store: Box<dyn BlobStore> = match self {
            Self::Local {
                state_dir: Some(dir),
                ..
            } => Box::new(FileStore::new(dir)),
            Self::Local { state_dir: None, .. } => Box::new(FileStore::default_location()?),
            Self::Gcs { bucket, token, .. } => Box::new(GcsStore::new(bucket, token)),
        };
        Ok(store)
    }
}
