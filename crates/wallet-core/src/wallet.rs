//! Single-identity wallet file.

use std::fmt;
use std::path::{Path, PathBuf};

use chain_eth::keys::{
    encode_private_key, generate_private_key, parse_private_key, private_key_to_address,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::storage::{read_optional, write_json_atomic};

/// The persisted keypair record.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct WalletData {
    /// EIP-55 checksummed address.
    pub address: String,
    /// `0x` + 64 lowercase hex characters.
    pub private_key: String,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub created_at: String,
}

impl WalletData {
    fn from_key(key: &[u8; 32]) -> Result<Self, WalletError> {
        Ok(Self {
            address: private_key_to_address(key)?,
            private_key: encode_private_key(key),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    /// Decodes the stored private key.
    pub fn secret_key(&self) -> Result<Zeroizing<[u8; 32]>, WalletError> {
        parse_private_key(&self.private_key)
            .map(Zeroizing::new)
            .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))
    }
}

impl fmt::Debug for WalletData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletData")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Reads and writes the wallet file at one path.
#[derive(Debug, Clone)]
pub struct WalletStore {
    path: PathBuf,
}

impl WalletStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &WalletConfig) -> Self {
        Self::new(config.wallet_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a wallet file is present. Never fails.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Generates and persists a fresh key. Refuses to replace an existing file.
    pub fn create(&self) -> Result<WalletData, WalletError> {
        if self.exists() {
            return Err(WalletError::WalletAlreadyExists(self.path.clone()));
        }

        let key = Zeroizing::new(generate_private_key());
        let wallet = WalletData::from_key(&key)?;
        self.save(&wallet)?;

        info!(path = %self.path.display(), address = %wallet.address, "wallet created");
        Ok(wallet)
    }

    /// Persists an existing key, with or without the `0x` prefix.
    ///
    /// An existing wallet file is replaced. The key is validated before
    /// anything is written.
    pub fn import_key(&self, private_key_hex: &str) -> Result<WalletData, WalletError> {
        let key = parse_private_key(private_key_hex.trim())
            .map(Zeroizing::new)
            .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))?;
        let wallet = WalletData::from_key(&key)?;

        let replaced = self.exists();
        self.save(&wallet)?;

        info!(path = %self.path.display(), address = %wallet.address, replaced, "wallet imported");
        Ok(wallet)
    }

    /// Loads the wallet file.
    pub fn load(&self) -> Result<WalletData, WalletError> {
        let contents = read_optional(&self.path)?
            .ok_or_else(|| WalletError::WalletNotFound(self.path.clone()))?;

        let value: Value =
            serde_json::from_slice(&contents).map_err(|e| WalletError::WalletFileCorrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        let field = |name: &str| -> Result<String, WalletError> {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| WalletError::WalletFileMalformed {
                    path: self.path.clone(),
                    reason: format!("missing or non-string field `{name}`"),
                })
        };

        Ok(WalletData {
            address: field("address")?,
            private_key: field("privateKey")?,
            created_at: field("createdAt")?,
        })
    }

    fn save(&self, wallet: &WalletData) -> Result<(), WalletError> {
        write_json_atomic(&self.path, wallet)
    }
}
