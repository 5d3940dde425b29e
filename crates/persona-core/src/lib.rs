//! # Persona Core
//!
//! Behavioral classification and scoring for on-chain wallets.
//!
//! Raw wallet activity is normalized into a [`FeatureVector`], assigned one of
//! five persona archetypes by an ordered rule list, weighted into a confidence
//! distribution, and summarized by independent risk and health scores.
//! Everything here is pure and synchronous; fetching chain data is the
//! caller's job.

pub mod bio;
pub mod classifier;
pub mod error;
pub mod features;
pub mod models;
pub mod recommendations;
pub mod scoring;

pub use bio::*;
pub use classifier::*;
pub use error::*;
pub use features::*;
pub use models::*;
pub use recommendations::*;
pub use scoring::*;
