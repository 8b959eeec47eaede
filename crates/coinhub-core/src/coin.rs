//! Listed coin definitions.
//!
//! A `ListedCoin` is a locally listed ticker mapped to an upstream
//! price-feed symbol. Trading is only allowed against active listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique id of a listed coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinId(pub Uuid);

impl CoinId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CoinId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public ticker symbol of a listed coin, normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinSymbol(String);

impl CoinSymbol {
    /// Normalize a raw symbol string: trimmed, uppercased.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CoinSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CoinSymbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A coin listed for trading.
///
/// `feed_symbol` is the upstream ticker the price oracle quotes against.
/// It is operator-facing and not exposed on public listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListedCoin {
    pub id: CoinId,
    /// Public ticker (unique across listings).
    pub symbol: CoinSymbol,
    /// Upstream feed ticker, e.g. "BTCUSDT".
    pub feed_symbol: String,
    /// Display name, e.g. "Coinhub Bitcoin".
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Inactive listings reject trades but stay visible to admins.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListedCoin {
    pub fn new(symbol: CoinSymbol, feed_symbol: &str, name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: CoinId::new(),
            symbol,
            feed_symbol: feed_symbol.trim().to_ascii_uppercase(),
            name: name.trim().to_string(),
            description: None,
            icon_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
