/// Reputation client errors.
///
/// Aggregation itself never fails; these come from configuration and from
/// fetching attestations.
#[derive(Debug, thiserror::Error)]
pub enum ReputationError {
    #[error("attestation source error: {0}")]
    Source(String),

    #[error("registry error: {0}")]
    Registry(#[from] trustmesh_registry::RegistryError),

    #[error("invalid configuration: {0}")]
    Config(#[from] trustmesh_core::CoreError),
}
