use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::config_directory;
use crate::error::{AppError, AppResult};

const CACHE_FILE_NAME: &str = "token_cache.json";

/// Tokens within this many seconds of expiry are treated as expired so a
/// request never goes out with a token that dies in flight.
const EXPIRY_SKEW_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: u64,
}

/// Persisted copy of the most recent access token, so repeated runs skip
/// the interactive login until the token actually expires.
pub struct TokenCache {
    file_path: PathBuf,
    token: Option<CachedToken>,
}

impl TokenCache {
    pub fn load() -> AppResult<Self> {
        let path = config_directory()?.join(CACHE_FILE_NAME);
        let token = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<CachedToken>(&contents)
                .map_err(|err| {
                    AppError::Configuration(format!("invalid token cache file: {err}"))
                })
                .map(Some)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => return Err(AppError::Io(err)),
        };

        Ok(Self {
            file_path: path,
            token,
        })
    }

    /// The cached token, if it is still comfortably inside its lifetime.
    pub fn valid_token(&self) -> Option<&CachedToken> {
        self.token
            .as_ref()
            .filter(|token| token.expires_at > now_secs() + EXPIRY_SKEW_SECS)
    }

    pub fn store(&mut self, access_token: String, expires_in_secs: u64) -> AppResult<()> {
        self.token = Some(CachedToken {
            access_token,
            expires_at: now_secs() + expires_in_secs,
        });
        self.save()
    }

    fn save(&self) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.token)
            .map_err(|err| AppError::Configuration(format!("failed to write token cache: {err}")))?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
