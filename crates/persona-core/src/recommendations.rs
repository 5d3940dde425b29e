//! Static persona -> recommendation table

use serde::Serialize;

use crate::models::PersonaType;

/// Suggested destinations for a persona, by category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub dapps: &'static [&'static str],
    pub nfts: &'static [&'static str],
    pub defi: &'static [&'static str],
    pub daos: &'static [&'static str],
}

static INVESTOR: Recommendations = Recommendations {
    dapps: &["DeBank", "Zapper.fi", "Zerion"],
    nfts: &[],
    defi: &["Aave", "Compound", "Yearn Finance"],
    daos: &["MakerDAO", "Aave Governance"],
};

static NFT_COLLECTOR: Recommendations = Recommendations {
    dapps: &["OpenSea", "Blur", "Rarible"],
    nfts: &["Art Blocks", "PROOF Collective", "Azuki"],
    defi: &["NFTfi", "Arcade"],
    daos: &[],
};

static DAO_MEMBER: Recommendations = Recommendations {
    dapps: &["Snapshot", "Tally", "Boardroom"],
    nfts: &[],
    defi: &["Index Coop", "Balancer"],
    daos: &["Gitcoin", "Optimism Collective", "ENS DAO"],
};

static DEGEN_TRADER: Recommendations = Recommendations {
    dapps: &["dYdX", "GMX", "PancakeSwap"],
    nfts: &["Memeland", "Pudgy Penguins"],
    defi: &["Curve", "Synthetix", "Perpetual Protocol"],
    daos: &[],
};

static DORMANT_INACTIVE: Recommendations = Recommendations {
    dapps: &["Revoke.cash", "Etherscan", "Zapper.fi"],
    nfts: &[],
    defi: &["Lido", "Rocket Pool", "Yearn Finance"],
    daos: &[],
};

pub fn recommendations_for(persona: PersonaType) -> &'static Recommendations {
    match persona {
        PersonaType::Investor => &INVESTOR,
        PersonaType::NFTCollector => &NFT_COLLECTOR,
        PersonaType::DAOMember => &DAO_MEMBER,
        PersonaType::DegenTrader => &DEGEN_TRADER,
        PersonaType::DormantInactive => &DORMANT_INACTIVE,
    }
}
