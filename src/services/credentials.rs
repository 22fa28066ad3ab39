use std::fmt;
use std::path::{Path, PathBuf};

/// Name of the key file inside the configured credentials directory.
pub const HOD_APIKEY_FILENAME: &str = "hod.apikey";

/// Haven OnDemand API key. Never printed in full.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "ApiKey({prefix}***)")
    }
}

/// Load the API key from `<dir>/hod.apikey`, dropping the trailing line break.
pub fn load_api_key(dir: &Path) -> Result<ApiKey, CredentialError> {
    let path = dir.join(HOD_APIKEY_FILENAME);
    let raw = std::fs::read_to_string(&path).map_err(|source| CredentialError::Read {
        path: path.clone(),
        source,
    })?;

    let key = raw.trim_end_matches(['\n', '\r']);
    if key.is_empty() {
        return Err(CredentialError::Empty(path));
    }

    tracing::debug!(path = %path.display(), "Loaded Haven OnDemand API key");
    Ok(ApiKey::new(key))
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Failed to read API key from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("API key file {0} is empty")]
    Empty(PathBuf),
}
