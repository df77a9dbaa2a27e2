//! Configuration fingerprinting.
//!
//! A run is identified by the BLAKE3 hash of its configuration's canonical
//! JSON. Two configurations with the same hash produce identical output for
//! identical bars.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::LorentzianConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigHash([u8; 32]);

impl ConfigHash {
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(12);
        hex
    }
}

impl fmt::Display for ConfigHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl LorentzianConfig {
    /// Structural + parameter hash of this configuration.
    ///
    /// Field order is fixed by the struct definitions, so the JSON is canonical.
    pub fn config_hash(&self) -> Result<ConfigHash, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(ConfigHash::from_bytes(&json))
    }
}
