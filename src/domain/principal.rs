use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity carried by a verified credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time, seconds since the epoch
    pub exp: u64,
    /// Issued at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    /// Any other claims
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl Principal {
    pub fn new(sub: impl Into<String>, exp: u64) -> Self {
        Self {
            sub: sub.into(),
            exp,
            iat: None,
            claims: Map::new(),
        }
    }

    pub fn with_claim(mut self, name: impl Into<String>, value: Value) -> Self {
        self.claims.insert(name.into(), value);
        self
    }
}

/// Raw credentials that were presented and accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
}
