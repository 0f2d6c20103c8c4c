//! TrustMesh Core — Fundamental types, errors, and configuration shared by
//! the TrustMesh registries and the reputation client.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ReputationConfig, RiskThresholds};
pub use error::CoreError;
pub use types::{
    payload_hash, AgentId, Attestation, AttestationId, AttestationSchema, CategoryKey,
    Interaction, InteractionId,
};
