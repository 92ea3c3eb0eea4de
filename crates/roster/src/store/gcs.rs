//! Google Cloud Storage backend.
//!
//! Talks to the XML API with a bearer token, one object per key:
//!
//! - `HEAD {base}/{bucket}/{key}` for existence (404 means absent)
//! - `GET {base}/{bucket}/{key}` to read
//! - `PUT {base}/{bucket}/{key}` to write
//!
//! Token acquisition (metadata server, workload identity) is left to the
//! deployment; pass the token in through configuration.

use crate::error::{Error, Result};
use crate::store::BlobStore;

/// Maximum blob size accepted on read (rosters are small).
const MAX_BODY_SIZE: u64 = 16 * 1024 * 1024;

/// Bucket-backed blob store.
pub struct GcsStore {
    agent: ureq::Agent,
    api_base: String,
    bucket: String,
    token: String,
}

impl GcsStore {
    /// Store backed by `bucket`, authenticated with `token`.
    pub fn new(bucket: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_api_base("https://storage.googleapis.com", bucket, token)
    }

    /// Create a store with a custom API base (for testing).
    pub fn with_api_base(
        api_base: impl Into<String>,
        bucket: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            api_base: api_base.into(),
            bucket: bucket.into(),
            token: token.into(),
        }
    }

    /// Bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.api_base.trim_end_matches('/'),
            self.bucket,
            key.trim_start_matches('/')
        )
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl BlobStore for GcsStore {
    fn exists(&self, key: &str) -> Result<bool> {
        let url = self.object_url(key);
        match self
            .agent
            .head(&url)
            .header("Authorization", self.bearer())
            .call()
        {
            Ok(_) => Ok(true),
            Err(ureq::Error::StatusCode(404)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn read(&self, key: &str) -> Result<Vec<u8>> {
        let url = self.object_url(key);
        let mut response = match self
            .agent
            .get(&url)
            .header("Authorization", self.bearer())
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(404)) => {
                return Err(Error::BlobNotFound(format!("gs://{}/{}", self.bucket, key)));
            }
            Err(e) => return Err(e.into()),
        };

        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_SIZE)
            .read_to_vec()?;
        log::debug!("Read {} bytes from gs://{}/{}", bytes.len(), self.bucket, key);
        Ok(bytes)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let url = self.object_url(key);
        self.agent
            .put(&url)
            .header("Authorization", self.bearer())
            .header("Content-Type", "application/json; charset=utf-8")
            .send(bytes)?;
        log::debug!("Wrote {} bytes to gs://{}/{}", bytes.len(), self.bucket, key);
        Ok(())
    }
}
