//! Persona classification engine
//!
//! Two passes over the same feature vector:
//!
//! 1. An ordered rule list picks the persona. First match wins, and the order
//!    is the tie-break policy.
//! 2. A table of additive adjustments shapes a confidence distribution over
//!    every persona.
//!
//! The reported persona always comes from the rule list; its confidence is
//! read from the distribution. The two passes usually agree on the leader but
//! nothing forces them to (see [`distribution_leader`]).

use std::collections::BTreeMap;

use crate::error::PersonaResult;
use crate::features::extract;
use crate::models::{ClassificationResult, FeatureVector, PersonaType, WalletActivityRecord};
use crate::scoring::WalletScores;

// =============================================================================
// Rule list
// =============================================================================

pub const DORMANT_MAX_TRANSACTIONS: u64 = 5;
/// About 99 days without activity under `1 / (1 + days)`
pub const DORMANT_RECENCY_THRESHOLD: f64 = 0.01;
pub const NFT_MIN_COUNT: u64 = 10;
pub const NFT_FOCUS_THRESHOLD: f64 = 0.5;
pub const DAO_ENGAGEMENT_THRESHOLD: f64 = 0.2;
/// Transactions per day
pub const DEGEN_FREQUENCY_THRESHOLD: f64 = 1.0;
/// Whole native units
pub const DEGEN_MAX_AVG_VALUE: f64 = 0.1;

/// One entry of the decision list
#[derive(Debug, Clone, Copy)]
pub struct PersonaRule {
    pub name: &'static str,
    pub persona: PersonaType,
    pub matches: fn(&FeatureVector) -> bool,
}

/// Evaluated top to bottom; the first match decides.
pub const PERSONA_RULES: &[PersonaRule] = &[
    PersonaRule {
        name: "few_or_stale_transactions",
        persona: PersonaType::DormantInactive,
        matches: is_dormant,
    },
    PersonaRule {
        name: "nft_heavy_holdings",
        persona: PersonaType::NFTCollector,
        matches: is_nft_collector,
    },
    PersonaRule {
        name: "governance_participation",
        persona: PersonaType::DAOMember,
        matches: is_dao_member,
    },
    PersonaRule {
        name: "frequent_small_trades",
        persona: PersonaType::DegenTrader,
        matches: is_degen_trader,
    },
];

/// Used when no rule matches
pub const FALLBACK_PERSONA: PersonaType = PersonaType::Investor;

fn is_dormant(f: &FeatureVector) -> bool {
    f.transaction_count < DORMANT_MAX_TRANSACTIONS || is_stale(f)
}

fn is_nft_collector(f: &FeatureVector) -> bool {
    f.nft_count > NFT_MIN_COUNT && f.nft_focus > NFT_FOCUS_THRESHOLD
}

fn is_dao_member(f: &FeatureVector) -> bool {
    dao_engaged(f)
}

fn is_degen_trader(f: &FeatureVector) -> bool {
    f.tx_frequency > DEGEN_FREQUENCY_THRESHOLD && f.avg_tx_value < DEGEN_MAX_AVG_VALUE
}

/// Run the decision list.
pub fn classify_persona(features: &FeatureVector) -> PersonaType {
    PERSONA_RULES
        .iter()
        .find(|rule| (rule.matches)(features))
        .map(|rule| rule.persona)
        .unwrap_or(FALLBACK_PERSONA)
}

// =============================================================================
// Confidence distribution
// =============================================================================

pub const BASE_CONFIDENCE: f64 = 0.2;

/// An additive tweak to the distribution, applied when `applies` holds
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceAdjustment {
    pub name: &'static str,
    pub applies: fn(&FeatureVector) -> bool,
    pub deltas: &'static [(PersonaType, f64)],
}

pub const CONFIDENCE_ADJUSTMENTS: &[ConfidenceAdjustment] = &[
    ConfidenceAdjustment {
        name: "nft_focus",
        applies: nft_focused,
        deltas: &[(PersonaType::NFTCollector, 0.3), (PersonaType::Investor, -0.1)],
    },
    ConfidenceAdjustment {
        name: "dao_engagement",
        applies: dao_engaged,
        deltas: &[(PersonaType::DAOMember, 0.3), (PersonaType::DegenTrader, -0.1)],
    },
    ConfidenceAdjustment {
        name: "tx_frequency",
        applies: trades_often,
        deltas: &[(PersonaType::DegenTrader, 0.3), (PersonaType::Investor, -0.1)],
    },
    ConfidenceAdjustment {
        name: "stale_activity",
        applies: is_stale,
        deltas: &[
            (PersonaType::DormantInactive, 0.5),
            (PersonaType::Investor, -0.1),
            (PersonaType::NFTCollector, -0.1),
            (PersonaType::DAOMember, -0.1),
            (PersonaType::DegenTrader, -0.1),
        ],
    },
];

fn nft_focused(f: &FeatureVector) -> bool {
    f.nft_focus > NFT_FOCUS_THRESHOLD
}

fn dao_engaged(f: &FeatureVector) -> bool {
    f.dao_engagement > DAO_ENGAGEMENT_THRESHOLD
}

fn trades_often(f: &FeatureVector) -> bool {
    f.tx_frequency > DEGEN_FREQUENCY_THRESHOLD
}

fn is_stale(f: &FeatureVector) -> bool {
    f.activity_recency < DORMANT_RECENCY_THRESHOLD
}

/// Weight every persona, normalized to percentages with two decimals.
pub fn confidence_distribution(features: &FeatureVector) -> BTreeMap<PersonaType, f64> {
    let mut weights: BTreeMap<PersonaType, f64> =
        PersonaType::ALL.iter().map(|p| (*p, BASE_CONFIDENCE)).collect();

    for adjustment in CONFIDENCE_ADJUSTMENTS {
        if !(adjustment.applies)(features) {
            continue;
        }
        tracing::trace!(adjustment = adjustment.name, "Applying confidence adjustment");
        for (persona, delta) in adjustment.deltas {
            *weights.entry(*persona).or_insert(BASE_CONFIDENCE) += delta;
        }
    }

    for weight in weights.values_mut() {
        *weight = weight.max(0.0);
    }

    normalize_to_percent(&weights)
}

/// Scale to 100 and round each share to two decimals. The rounded values
/// can drift from 100 by a hundredth or so.
fn normalize_to_percent(weights: &BTreeMap<PersonaType, f64>) -> BTreeMap<PersonaType, f64> {
    let total: f64 = weights.values().sum();
    if !total.is_finite() || total <= 0.0 {
        let uniform = 100.0 / weights.len().max(1) as f64;
        return weights.keys().map(|p| (*p, uniform)).collect();
    }

    weights
        .iter()
        .map(|(persona, weight)| (*persona, round_cents(weight / total * 100.0)))
        .collect()
}

fn round_cents(percent: f64) -> f64 {
    (percent * 100.0).round() / 100.0
}

/// Highest-weighted persona; ties go to the earlier persona in [`PersonaType::ALL`].
///
/// This can differ from the rule-list label, e.g. a two-transaction wallet
/// full of NFTs is Dormant/Inactive by rule but leads on NFT Collector here.
pub fn distribution_leader(distribution: &BTreeMap<PersonaType, f64>) -> PersonaType {
    let mut leader = PersonaType::ALL[0];
    let mut best = f64::NEG_INFINITY;
    for persona in PersonaType::ALL {
        let weight = distribution.get(&persona).copied().unwrap_or(0.0);
        if weight > best {
            leader = persona;
            best = weight;
        }
    }
    leader
}

// =============================================================================
// Entry points
// =============================================================================

/// Classify and score an already-extracted feature vector.
///
/// Rejects vectors with non-finite or out-of-range values.
pub fn classify(features: &FeatureVector) -> PersonaResult<ClassificationResult> {
    features.validate()?;

    let persona = classify_persona(features);
    let all_confidences = confidence_distribution(features);
    let confidence = all_confidences.get(&persona).copied().unwrap_or(0.0);
    let scores = WalletScores::compute(features);

    let leader = distribution_leader(&all_confidences);
    if leader != persona {
        tracing::debug!(
            persona = %persona,
            distribution_leader = %leader,
            "Rule-list persona differs from confidence leader"
        );
    }

    tracing::debug!(
        persona = %persona,
        confidence,
        risk_score = scores.risk_score,
        health_score = scores.health_score,
        "Wallet classified"
    );

    Ok(ClassificationResult {
        persona,
        confidence,
        all_confidences,
        risk_score: scores.risk_score,
        health_score: scores.health_score,
        features: *features,
    })
}

/// Extract features from a raw record, then classify and score them.
pub fn classify_and_score(record: &WalletActivityRecord) -> PersonaResult<ClassificationResult> {
    classify(&extract(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PersonaError;
    use crate::models::RawTransaction;

    fn active(tx_count: u64) -> WalletActivityRecord {
        WalletActivityRecord {
            transaction_count: Some(tx_count),
            days_since_last_transaction: Some(1),
            ..Default::default()
        }
    }

    fn features() -> FeatureVector {
        FeatureVector {
            transaction_count: 50,
            token_count: 10,
            nft_count: 2,
            activity_recency: 0.5,
            token_diversity: 10.0 / 12.0,
            nft_focus: 2.0 / 12.0,
            dao_engagement: 0.0,
            defi_engagement: 0.0,
            avg_tx_value: 1.0,
            tx_frequency: 0.5,
        }
    }

    fn assert_distribution_valid(dist: &BTreeMap<PersonaType, f64>) {
        assert_eq!(dist.len(), PersonaType::ALL.len());
        assert!(dist.values().all(|v| *v >= 0.0), "negative weight in {dist:?}");
        let sum: f64 = dist.values().sum();
        assert!((sum - 100.0).abs() <= 0.01 + 1e-9, "sum {sum} in {dist:?}");
    }

    #[test]
    fn test_stale_low_activity_wallet_is_dormant() {
        let result = classify_and_score(&WalletActivityRecord {
            transaction_count: Some(2),
            days_since_last_transaction: Some(200),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(result.persona, PersonaType::DormantInactive);
    }

    #[test]
    fn test_stale_busy_wallet_is_dormant() {
        let mut record = active(500);
        record.days_since_last_transaction = Some(120);
        let result = classify_and_score(&record).unwrap();
        assert_eq!(result.persona, PersonaType::DormantInactive);
        assert_eq!(distribution_leader(&result.all_confidences), PersonaType::DormantInactive);
    }

    #[test]
    fn test_nft_heavy_wallet_is_collector() {
        let mut record = active(50);
        record.nft_count = Some(15);
        record.token_count = Some(5);
        let result = classify_and_score(&record).unwrap();
        assert!((result.features.nft_focus - 0.75).abs() < 1e-12);
        assert_eq!(result.persona, PersonaType::NFTCollector);
    }

    #[test]
    fn test_voting_wallet_is_dao_member() {
        let mut record = active(100);
        record.dao_vote_count = Some(25);
        let result = classify_and_score(&record).unwrap();
        assert!((result.features.dao_engagement - 0.25).abs() < 1e-12);
        assert_eq!(result.persona, PersonaType::DAOMember);
    }

    #[test]
    fn test_voter_with_null_nft_count_is_still_dao_member() {
        let features = crate::features::extract_value(&serde_json::json!({
            "transaction_count": 100,
            "dao_vote_count": 25,
            "days_since_last_transaction": 1,
            "nft_count": null
        }));
        let result = classify(&features).unwrap();
        assert_eq!(result.features.transaction_count, 100);
        assert_eq!(result.persona, PersonaType::DAOMember);
    }

    #[test]
    fn test_frequent_small_trader_is_degen() {
        let mut record = active(30);
        record.transactions = (0..30)
            .map(|i| RawTransaction::new(10_000_000_000_000_000u128, 1_700_000_000 + i * 3_600))
            .collect();
        let result = classify_and_score(&record).unwrap();
        assert!(result.features.tx_frequency > 1.0);
        assert!(result.features.avg_tx_value < 0.1);
        assert_eq!(result.persona, PersonaType::DegenTrader);
    }

    #[test]
    fn test_default_is_investor() {
        let result = classify_and_score(&active(20)).unwrap();
        assert_eq!(result.persona, PersonaType::Investor);
        assert_eq!(result.confidence, 20.0);
    }

    #[test]
    fn test_rule_order_is_tie_break() {
        // Dormant beats everything
        let mut f = features();
        f.transaction_count = 3;
        f.nft_count = 50;
        f.nft_focus = 0.9;
        f.dao_engagement = 0.9;
        assert_eq!(classify_persona(&f), PersonaType::DormantInactive);

        // NFT beats DAO
        f.transaction_count = 50;
        assert_eq!(classify_persona(&f), PersonaType::NFTCollector);

        // DAO beats Degen
        f.nft_focus = 0.1;
        f.tx_frequency = 5.0;
        f.avg_tx_value = 0.01;
        assert_eq!(classify_persona(&f), PersonaType::DAOMember);

        f.dao_engagement = 0.0;
        assert_eq!(classify_persona(&f), PersonaType::DegenTrader);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let mut f = features();
        f.transaction_count = DORMANT_MAX_TRANSACTIONS;
        f.activity_recency = DORMANT_RECENCY_THRESHOLD;
        f.dao_engagement = DAO_ENGAGEMENT_THRESHOLD;
        f.nft_count = NFT_MIN_COUNT;
        f.nft_focus = 0.9;
        f.tx_frequency = DEGEN_FREQUENCY_THRESHOLD;
        f.avg_tx_value = 0.0;
        assert_eq!(classify_persona(&f), PersonaType::Investor);
    }

    #[test]
    fn test_rule_list_order() {
        let order: Vec<PersonaType> = PERSONA_RULES.iter().map(|r| r.persona).collect();
        assert_eq!(
            order,
            vec![
                PersonaType::DormantInactive,
                PersonaType::NFTCollector,
                PersonaType::DAOMember,
                PersonaType::DegenTrader,
            ]
        );
    }

    #[test]
    fn test_uniform_distribution_without_adjustments() {
        let dist = confidence_distribution(&features());
        assert!(dist.values().all(|v| *v == 20.0));
    }

    #[test]
    fn test_stale_adjustment() {
        let mut f = features();
        f.activity_recency = 0.005;
        let dist = confidence_distribution(&f);
        assert_eq!(dist[&PersonaType::DormantInactive], 63.64);
        assert_eq!(dist[&PersonaType::Investor], 9.09);
        assert_distribution_valid(&dist);
    }

    #[test]
    fn test_negative_weights_clamped() {
        // Investor takes three penalties: 0.2 - 0.3 -> 0
        let f = FeatureVector {
            nft_focus: 0.9,
            dao_engagement: 0.9,
            tx_frequency: 9.0,
            activity_recency: 0.0,
            ..features()
        };
        let dist = confidence_distribution(&f);
        assert_eq!(dist[&PersonaType::Investor], 0.0);
        assert_distribution_valid(&dist);
    }

    #[test]
    fn test_distribution_always_sums_to_100() {
        let flags = [false, true];
        for nft in flags {
            for dao in flags {
                for freq in flags {
                    for stale in flags {
                        let f = FeatureVector {
                            nft_focus: if nft { 0.8 } else { 0.1 },
                            dao_engagement: if dao { 0.5 } else { 0.0 },
                            tx_frequency: if freq { 3.0 } else { 0.0 },
                            activity_recency: if stale { 0.001 } else { 0.5 },
                            ..features()
                        };
                        assert_distribution_valid(&confidence_distribution(&f));
                    }
                }
            }
        }
    }

    #[test]
    fn test_each_share_rounds_to_two_decimals() {
        let mut weights = BTreeMap::new();
        weights.insert(PersonaType::Investor, 0.1);
        weights.insert(PersonaType::NFTCollector, 0.5);
        weights.insert(PersonaType::DAOMember, 0.2);
        weights.insert(PersonaType::DegenTrader, 0.2);
        weights.insert(PersonaType::DormantInactive, 0.2);
        let dist = normalize_to_percent(&weights);
        assert_eq!(dist[&PersonaType::Investor], 8.33);
        assert_eq!(dist[&PersonaType::NFTCollector], 41.67);
        assert_eq!(dist[&PersonaType::DAOMember], 16.67);
        assert_eq!(dist[&PersonaType::DegenTrader], 16.67);
        assert_eq!(dist[&PersonaType::DormantInactive], 16.67);
        // 100.01 after rounding, within tolerance
        assert_distribution_valid(&dist);
    }

    #[test]
    fn test_zero_weights_fall_back_to_uniform() {
        let weights: BTreeMap<PersonaType, f64> =
            PersonaType::ALL.iter().map(|p| (*p, 0.0)).collect();
        let dist = normalize_to_percent(&weights);
        assert!(dist.values().all(|v| *v == 20.0));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let f = FeatureVector {
            nft_focus: 0.7,
            nft_count: 30,
            ..features()
        };
        let first = classify(&f).unwrap();
        for _ in 0..10 {
            assert_eq!(classify(&f).unwrap(), first);
        }
    }

    #[test]
    fn test_rule_and_distribution_agree_on_clear_cases() {
        let mut nft = active(50);
        nft.nft_count = Some(15);
        nft.token_count = Some(5);

        let mut dao = active(100);
        dao.dao_vote_count = Some(25);

        let mut stale = active(100);
        stale.days_since_last_transaction = Some(365);

        for record in [nft, dao, stale, active(20)] {
            let result = classify_and_score(&record).unwrap();
            assert_eq!(
                distribution_leader(&result.all_confidences),
                result.persona,
                "disagreement for {record:?}"
            );
        }
    }

    #[test]
    fn test_persona_comes_from_rules_not_argmax() {
        // Two transactions, recent, NFT-heavy: the rule list says dormant,
        // the distribution leans NFT Collector.
        let mut record = active(2);
        record.nft_count = Some(40);
        record.token_count = Some(2);
        let result = classify_and_score(&record).unwrap();

        assert_eq!(result.persona, PersonaType::DormantInactive);
        assert_eq!(distribution_leader(&result.all_confidences), PersonaType::NFTCollector);
        assert_eq!(result.confidence, result.all_confidences[&PersonaType::DormantInactive]);
        assert_eq!(result.confidence, 16.67);
    }

    #[test]
    fn test_frequent_large_trader_falls_through_to_investor() {
        let f = FeatureVector {
            tx_frequency: 4.0,
            avg_tx_value: 2.0,
            ..features()
        };
        let result = classify(&f).unwrap();
        assert_eq!(result.persona, PersonaType::Investor);
        assert_eq!(distribution_leader(&result.all_confidences), PersonaType::DegenTrader);
    }

    #[test]
    fn test_invalid_vector_rejected() {
        let f = FeatureVector {
            activity_recency: f64::INFINITY,
            ..features()
        };
        assert!(matches!(
            classify(&f),
            Err(PersonaError::InvalidFeatureVector { field: "activity_recency", .. })
        ));
    }

    #[test]
    fn test_scores_clamped_for_extreme_frequency() {
        let f = FeatureVector {
            tx_frequency: 1e9,
            avg_tx_value: 1e9,
            ..features()
        };
        let result = classify(&f).unwrap();
        assert!((0.0..=100.0).contains(&result.risk_score));
        assert!((0.0..=100.0).contains(&result.health_score));
    }
}
