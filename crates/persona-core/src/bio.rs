//! Persona bios
//!
//! Free-text generation belongs to an external model; [`BioGenerator`] is the
//! seam it plugs into. [`TemplateBioGenerator`] is the deterministic fallback:
//! a canned sentence per persona plus a few details from the wallet's holdings.

use serde::{Deserialize, Serialize};

use crate::models::{ClassificationResult, PersonaType, WalletActivityRecord};

const MAX_TOKENS_MENTIONED: usize = 3;
const MAX_PROTOCOLS_MENTIONED: usize = 2;
const MAX_DAOS_MENTIONED: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaBio {
    pub text: String,
    pub is_ai_generated: bool,
}

pub trait BioGenerator: Send + Sync {
    fn generate(&self, record: &WalletActivityRecord, result: &ClassificationResult) -> PersonaBio;
}

/// Canned bios for a persona, preferred one first
pub fn persona_templates(persona: PersonaType) -> &'static [&'static str] {
    match persona {
        PersonaType::Investor => &[
            "I'm a long-term DeFi believer focused on sustainable yields and strategic token acquisitions. My portfolio is carefully balanced across major ecosystems, with particular interest in governance tokens that offer both utility and appreciation potential.",
            "Building wealth through smart contract interactions is my passion. I regularly rebalance my positions based on market conditions, preferring established protocols with proven track records.",
        ],
        PersonaType::NFTCollector => &[
            "Digital art connoisseur with a growing collection of unique NFTs spanning various genres and communities. I'm particularly drawn to generative art and projects with strong artistic vision.",
            "I hunt for hidden gems in the NFT space, balancing blue-chip collections with emerging artists. My collection reflects both aesthetic appreciation and community participation.",
        ],
        PersonaType::DAOMember => &[
            "Governance enthusiast actively shaping the future of decentralized protocols through proposal creation and voting. I believe in the power of collective decision-making to build better financial systems.",
            "I split my time between multiple DAOs, contributing proposals and voting on critical protocol changes. Community-driven development is the future of blockchain technology.",
        ],
        PersonaType::DegenTrader => &[
            "Living on the edge of DeFi with a taste for volatile assets and emerging protocols. I'm always chasing the next big opportunity, even if it means taking calculated risks.",
            "Fast moves and alpha hunting define my on-chain strategy. I've developed a sixth sense for emerging trends and don't mind the occasional high-risk position if the potential rewards are substantial.",
        ],
        PersonaType::DormantInactive => &[
            "I'm a patient hodler who believes in the long-term vision of crypto. I don't need to make daily moves to build wealth - time in the market beats timing the market.",
            "My wallet may seem quiet, but I've positioned myself in solid assets that don't require constant maintenance, allowing me to focus on life beyond the blockchain.",
        ],
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateBioGenerator;

impl BioGenerator for TemplateBioGenerator {
    fn generate(&self, record: &WalletActivityRecord, result: &ClassificationResult) -> PersonaBio {
        let mut text = persona_templates(result.persona)[0].to_string();
        append_holdings(&mut text, record);
        PersonaBio {
            text,
            is_ai_generated: false,
        }
    }
}

/// Append token, protocol and DAO details when the record carries them.
pub fn append_holdings(text: &mut String, record: &WalletActivityRecord) {
    let tokens: Vec<&str> = record
        .token_symbols
        .iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .take(MAX_TOKENS_MENTIONED)
        .collect();
    if !tokens.is_empty() {
        text.push_str(&format!(" Currently holding {} among other assets.", tokens.join(", ")));
    }

    let protocols: Vec<&str> = record
        .defi_protocols
        .keys()
        .map(String::as_str)
        .take(MAX_PROTOCOLS_MENTIONED)
        .collect();
    if !protocols.is_empty() {
        text.push_str(&format!(" Active in {} protocols.", protocols.join(", ")));
    }

    let daos: Vec<&str> = record
        .dao_participation
        .keys()
        .map(String::as_str)
        .take(MAX_DAOS_MENTIONED)
        .collect();
    if !daos.is_empty() {
        text.push_str(&format!(" Participated in governance for {}.", daos.join(", ")));
    }
}
