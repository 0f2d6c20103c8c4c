use trustmesh_core::{AgentId, CategoryKey, InteractionId};

/// Registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("schema not found: {0}")]
    SchemaNotFound(CategoryKey),

    #[error("schema already registered: {0}")]
    SchemaAlreadyRegistered(CategoryKey),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("score {score} outside schema range [{min}, {max}]")]
    ScoreOutOfRange { score: i64, min: i64, max: i64 },

    #[error("interaction not found: {0}")]
    InteractionNotFound(InteractionId),

    #[error("interaction {interaction} is not between {from} and {to}")]
    InteractionMismatch {
        interaction: InteractionId,
        from: AgentId,
        to: AgentId,
    },

    #[error("invalid interaction: {0}")]
    InvalidInteraction(String),

    #[error("agent cannot attest about itself: {0}")]
    SelfAttestation(AgentId),

    #[error("invalid trust weight: {0} (must be in [-1.0, 1.0])")]
    InvalidTrustWeight(f64),

    #[error("agent cannot set trust in itself: {0}")]
    SelfTrust(AgentId),

    #[error("core error: {0}")]
    Core(#[from] trustmesh_core::CoreError),
}
