//! Feature extraction
//!
//! Turns raw activity counters into bounded numeric signals. Extraction never
//! fails: each feature is computed on its own and collapses to `0.0` if its
//! inputs are unusable, so one bad field can't take the others down with it.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{FeatureVector, RawTransaction, WalletActivityRecord};

/// Fixed-point scale of native-asset amounts (18 decimals)
pub const NATIVE_UNIT: f64 = 1e18;

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Error)]
enum FeatureError {
    #[error("malformed counter {0}")]
    MalformedCount(&'static str),

    #[error("malformed transaction value {0:?}")]
    MalformedValue(String),

    #[error("malformed timestamp {0:?}")]
    MalformedTimestamp(String),

    #[error("transaction has no timestamp")]
    MissingTimestamp,
}

type FeatureResult = Result<f64, FeatureError>;

/// Derive the feature vector for one wallet.
pub fn extract(record: &WalletActivityRecord) -> FeatureVector {
    FeatureVector {
        transaction_count: record.transaction_count.unwrap_or(0),
        token_count: record.token_count.unwrap_or(0),
        nft_count: record.nft_count.unwrap_or(0),
        activity_recency: degrade("activity_recency", activity_recency(record)),
        token_diversity: degrade("token_diversity", token_diversity(record)),
        nft_focus: degrade("nft_focus", nft_focus(record)),
        dao_engagement: degrade(
            "dao_engagement",
            engagement(record, "dao_vote_count", record.dao_vote_count),
        ),
        defi_engagement: degrade(
            "defi_engagement",
            engagement(record, "defi_interaction_count", record.defi_interaction_count),
        ),
        avg_tx_value: degrade("avg_tx_value", avg_tx_value(&record.transactions)),
        tx_frequency: degrade("tx_frequency", tx_frequency(&record.transactions)),
    }
}

/// Extract from loosely-typed provider output.
///
/// Malformed fields inside an object degrade only the features that read
/// them. A payload that isn't an object at all zeroes every feature.
pub fn extract_value(raw: &Value) -> FeatureVector {
    if !raw.is_object() {
        tracing::warn!("Wallet activity is not an object, using zeroed features");
        return FeatureVector::default();
    }
    match WalletActivityRecord::deserialize(raw) {
        Ok(record) => extract(&record),
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable wallet activity record, using zeroed features");
            FeatureVector::default()
        }
    }
}

/// Collapse a failed or non-finite feature to zero.
fn degrade(feature: &'static str, result: FeatureResult) -> f64 {
    match result {
        Ok(value) if value.is_finite() => value,
        Ok(value) => {
            tracing::debug!(feature, value, "Non-finite feature, defaulting to 0");
            0.0
        }
        Err(e) => {
            tracing::debug!(feature, error = %e, "Feature degraded to 0");
            0.0
        }
    }
}

fn count(field: &'static str, raw: Option<u64>) -> Result<u64, FeatureError> {
    raw.ok_or(FeatureError::MalformedCount(field))
}

fn activity_recency(record: &WalletActivityRecord) -> FeatureResult {
    let days = count("days_since_last_transaction", record.days_since_last_transaction)?;
    Ok(recency(days))
}

fn token_diversity(record: &WalletActivityRecord) -> FeatureResult {
    let tokens = count("token_count", record.token_count)?;
    let nfts = count("nft_count", record.nft_count)?;
    Ok(holding_share(tokens, nfts))
}

fn nft_focus(record: &WalletActivityRecord) -> FeatureResult {
    let tokens = count("token_count", record.token_count)?;
    let nfts = count("nft_count", record.nft_count)?;
    Ok(holding_share(nfts, tokens))
}

/// Per-transaction rate of `raw`, clamped to [0, 1] since upstream counts can disagree.
fn engagement(record: &WalletActivityRecord, field: &'static str, raw: Option<u64>) -> FeatureResult {
    let tx_count = count("transaction_count", record.transaction_count)?;
    Ok(rate(count(field, raw)?, tx_count))
}

fn recency(days_since_last_tx: u64) -> f64 {
    1.0 / (1.0 + days_since_last_tx as f64)
}

/// Share of `part` among all holdings; 0 when nothing is held.
fn holding_share(part: u64, other: u64) -> f64 {
    let total = part.saturating_add(other).max(1);
    part as f64 / total as f64
}

fn rate(count: u64, tx_count: u64) -> f64 {
    (count as f64 / tx_count.max(1) as f64).min(1.0)
}

fn avg_tx_value(transactions: &[RawTransaction]) -> FeatureResult {
    if transactions.is_empty() {
        return Ok(0.0);
    }

    let mut total = 0.0;
    for tx in transactions {
        total += native_value(tx.value.as_deref())?;
    }
    Ok(total / transactions.len() as f64)
}

/// Convert a raw fixed-point amount to whole units. A missing value counts as zero.
fn native_value(raw: Option<&str>) -> FeatureResult {
    let Some(raw) = raw else {
        return Ok(0.0);
    };
    let trimmed = raw.trim();

    if let Ok(units) = trimmed.parse::<u128>() {
        return Ok(units as f64 / NATIVE_UNIT);
    }
    // Large JSON numbers arrive in exponent form
    match trimmed.parse::<f64>() {
        Ok(units) if units.is_finite() && units >= 0.0 => Ok(units / NATIVE_UNIT),
        _ => Err(FeatureError::MalformedValue(raw.to_string())),
    }
}

fn tx_frequency(transactions: &[RawTransaction]) -> FeatureResult {
    let (Some(first), Some(last)) = (transactions.first(), transactions.last()) else {
        return Ok(0.0);
    };
    if transactions.len() < 2 {
        return Ok(0.0);
    }

    let first_ts = timestamp(first.timestamp.as_deref())?;
    let last_ts = timestamp(last.timestamp.as_deref())?;

    // Providers return either order, so only the distance matters
    let span_days = (first_ts.abs_diff(last_ts) as f64 / SECONDS_PER_DAY).max(1.0);
    Ok(transactions.len() as f64 / span_days)
}

fn timestamp(raw: Option<&str>) -> Result<u64, FeatureError> {
    let raw = raw.ok_or(FeatureError::MissingTimestamp)?;
    let trimmed = raw.trim();

    if let Ok(secs) = trimmed.parse::<u64>() {
        return Ok(secs);
    }
    match trimmed.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs as u64),
        _ => Err(FeatureError::MalformedTimestamp(raw.to_string())),
    }
}
