//! Data models for wallet persona analysis
//!
//! A [`WalletActivityRecord`] is what a chain-data provider hands us, a
//! [`FeatureVector`] is what the extractor derives from it, and a
//! [`ClassificationResult`] is what the engine returns.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{PersonaError, PersonaResult};

/// Days assumed since the last transaction when the provider doesn't know.
pub const UNKNOWN_RECENCY_DAYS: u64 = 365;

// =============================================================================
// Input
// =============================================================================

/// Raw activity counters for a single address.
///
/// Immutable for the duration of one analysis. Missing counters default to
/// zero and a missing recency gap defaults to [`UNKNOWN_RECENCY_DAYS`]. A
/// counter the provider sent but that isn't a non-negative integer is `None`,
/// which degrades only the features that read it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletActivityRecord {
    /// Total transactions ever sent or received
    #[serde(default = "zero_count", deserialize_with = "lenient_count")]
    pub transaction_count: Option<u64>,

    /// Distinct fungible tokens held
    #[serde(default = "zero_count", deserialize_with = "lenient_count")]
    pub token_count: Option<u64>,

    /// Distinct NFTs held
    #[serde(default = "zero_count", deserialize_with = "lenient_count")]
    pub nft_count: Option<u64>,

    #[serde(default = "default_recency_days", deserialize_with = "lenient_count")]
    pub days_since_last_transaction: Option<u64>,

    /// Interactions with recognized DeFi protocols
    #[serde(default = "zero_count", deserialize_with = "lenient_count")]
    pub defi_interaction_count: Option<u64>,

    /// Governance votes cast
    #[serde(default = "zero_count", deserialize_with = "lenient_count")]
    pub dao_vote_count: Option<u64>,

    /// Transaction history in provider order (may be empty)
    #[serde(default, deserialize_with = "or_default")]
    pub transactions: Vec<RawTransaction>,

    /// Symbols of held tokens, most significant first
    #[serde(default, deserialize_with = "or_default")]
    pub token_symbols: Vec<String>,

    /// DeFi protocol name -> interaction count
    #[serde(default, deserialize_with = "or_default")]
    pub defi_protocols: BTreeMap<String, u64>,

    /// DAO name -> votes cast
    #[serde(default, deserialize_with = "or_default")]
    pub dao_participation: BTreeMap<String, u64>,
}

fn zero_count() -> Option<u64> {
    Some(0)
}

fn default_recency_days() -> Option<u64> {
    Some(UNKNOWN_RECENCY_DAYS)
}

impl Default for WalletActivityRecord {
    fn default() -> Self {
        Self {
            transaction_count: zero_count(),
            token_count: zero_count(),
            nft_count: zero_count(),
            days_since_last_transaction: default_recency_days(),
            defi_interaction_count: zero_count(),
            dao_vote_count: zero_count(),
            transactions: Vec::new(),
            token_symbols: Vec::new(),
            defi_protocols: BTreeMap::new(),
            dao_participation: BTreeMap::new(),
        }
    }
}

/// Read a counter from an integer, a whole float or a numeric string.
/// Anything else (null, negatives, fractions, text) becomes `None`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().and_then(whole_count)),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(whole_count))
        }
        _ => None,
    })
}

fn whole_count(n: f64) -> Option<u64> {
    (n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64).then_some(n as u64)
}

/// Holdings context collapses to empty rather than rejecting the record.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// A single transaction as reported by an indexer.
///
/// Indexers disagree on whether `value` and `timestamp` are strings or
/// numbers, so both are kept as raw text and parsed by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawTransaction {
    /// Native-asset amount in 18-decimal fixed point units
    #[serde(default, deserialize_with = "raw_text", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Seconds since epoch
    #[serde(
        default,
        alias = "timeStamp",
        deserialize_with = "raw_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl RawTransaction {
    pub fn new(value: impl ToString, timestamp: impl ToString) -> Self {
        Self {
            value: Some(value.to_string()),
            timestamp: Some(timestamp.to_string()),
            ..Default::default()
        }
    }
}

/// Accept a string, a number, or anything else as raw text. Never fails, so
/// one bad entry can't reject the whole record.
fn raw_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

// =============================================================================
// Features
// =============================================================================

/// Normalized signals derived from a [`WalletActivityRecord`].
///
/// The five ratio fields live in [0, 1]. `avg_tx_value` and `tx_frequency`
/// are finite and non-negative but otherwise unbounded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    pub transaction_count: u64,
    pub token_count: u64,
    pub nft_count: u64,

    /// 1.0 = active today, approaching 0 for long-dormant wallets
    pub activity_recency: f64,

    /// Share of holdings that are fungible tokens
    pub token_diversity: f64,

    /// Share of holdings that are NFTs
    pub nft_focus: f64,

    pub dao_engagement: f64,
    pub defi_engagement: f64,

    /// Mean transaction value in whole native units
    pub avg_tx_value: f64,

    /// Transactions per day over the observed span
    pub tx_frequency: f64,
}

impl FeatureVector {
    /// Reject vectors the engine can't reason about.
    pub fn validate(&self) -> PersonaResult<()> {
        let bounded = [
            ("activity_recency", self.activity_recency),
            ("token_diversity", self.token_diversity),
            ("nft_focus", self.nft_focus),
            ("dao_engagement", self.dao_engagement),
            ("defi_engagement", self.defi_engagement),
        ];
        for (field, value) in bounded {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PersonaError::InvalidFeatureVector { field, value });
            }
        }

        let unbounded = [
            ("avg_tx_value", self.avg_tx_value),
            ("tx_frequency", self.tx_frequency),
        ];
        for (field, value) in unbounded {
            if !value.is_finite() || value < 0.0 {
                return Err(PersonaError::InvalidFeatureVector { field, value });
            }
        }

        Ok(())
    }
}

// =============================================================================
// Personas
// =============================================================================

/// Behavioral archetype assigned to a wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PersonaType {
    #[serde(rename = "Investor")]
    Investor,
    #[serde(rename = "NFT Collector")]
    NFTCollector,
    #[serde(rename = "DAO Member")]
    DAOMember,
    #[serde(rename = "Degen Trader")]
    DegenTrader,
    #[serde(rename = "Dormant/Inactive")]
    DormantInactive,
}

impl PersonaType {
    pub const ALL: [PersonaType; 5] = [
        PersonaType::Investor,
        PersonaType::NFTCollector,
        PersonaType::DAOMember,
        PersonaType::DegenTrader,
        PersonaType::DormantInactive,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PersonaType::Investor => "Investor",
            PersonaType::NFTCollector => "NFT Collector",
            PersonaType::DAOMember => "DAO Member",
            PersonaType::DegenTrader => "Degen Trader",
            PersonaType::DormantInactive => "Dormant/Inactive",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            PersonaType::Investor => "investor",
            PersonaType::NFTCollector => "nft_collector",
            PersonaType::DAOMember => "dao_member",
            PersonaType::DegenTrader => "degen_trader",
            PersonaType::DormantInactive => "dormant_inactive",
        }
    }
}

impl fmt::Display for PersonaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PersonaType {
    type Err = PersonaError;

    /// Accepts the display label, the slug, or the variant name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "investor" => Ok(PersonaType::Investor),
            "nftcollector" => Ok(PersonaType::NFTCollector),
            "daomember" => Ok(PersonaType::DAOMember),
            "degentrader" => Ok(PersonaType::DegenTrader),
            "dormantinactive" | "dormant" | "inactive" => Ok(PersonaType::DormantInactive),
            _ => Err(PersonaError::UnknownPersona(s.to_string())),
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// Outcome of one classification call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    /// Label chosen by the ordered rule list
    pub persona: PersonaType,

    /// Entry for `persona` in `all_confidences`
    pub confidence: f64,

    /// Normalized weight per persona, summing to 100 within rounding
    pub all_confidences: BTreeMap<PersonaType, f64>,

    /// 0-100, higher = riskier
    pub risk_score: f64,

    /// 0-100, higher = healthier
    pub health_score: f64,

    pub features: FeatureVector,
}
