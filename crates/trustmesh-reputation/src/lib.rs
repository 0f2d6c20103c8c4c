//! TrustMesh Reputation
//!
//! Client-side reputation over attestations:
//! - `ReputationAggregator`: pure grouping and averaging by category, plus a
//!   risk level derived from attestation volume
//! - `AttestationSource`: the seam through which a subject's attestations are
//!   fetched (registry-backed, static, or a fallback chain)
//! - `ReputationClient`: fetch then aggregate, for one subject or a batch

pub mod aggregator;
pub mod client;
pub mod error;
pub mod source;

pub use aggregator::{ReputationAggregator, ReputationQuery, RiskLevel, WeightedReputation};
pub use client::ReputationClient;
pub use error::ReputationError;
pub use source::{
    AttestationSource, CompositeAttestationSource, RegistryAttestationSource,
    StaticAttestationSource,
};
