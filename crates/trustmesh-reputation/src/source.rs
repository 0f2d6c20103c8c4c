use async_trait::async_trait;
use std::sync::Arc;

use trustmesh_core::{AgentId, Attestation};
use trustmesh_registry::AttestationRegistry;

use crate::error::ReputationError;

/// Supplies the full set of attestations about a subject.
#[async_trait]
pub trait AttestationSource: Send + Sync {
    async fn attestations_for(&self, subject: AgentId)
        -> Result<Vec<Attestation>, ReputationError>;
}

/// Reads attestations from an in-process `AttestationRegistry`.
pub struct RegistryAttestationSource {
    registry: Arc<AttestationRegistry>,
}

impl RegistryAttestationSource {
    pub fn new(registry: Arc<AttestationRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl AttestationSource for RegistryAttestationSource {
    async fn attestations_for(
        &self,
        subject: AgentId,
    ) -> Result<Vec<Attestation>, ReputationError> {
        Ok(self.registry.for_subject(subject))
    }
}

/// A fixed set of attestations, e.g. loaded from an export file.
///
/// Returns the records whose `to_agent` is the subject.
pub struct StaticAttestationSource {
    attestations: Vec<Attestation>,
}

impl StaticAttestationSource {
    pub fn new(attestations: Vec<Attestation>) -> Self {
        Self { attestations }
    }

    pub fn len(&self) -> usize {
        self.attestations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attestations.is_empty()
    }
}

#[async_trait]
impl AttestationSource for StaticAttestationSource {
    async fn attestations_for(
        &self,
        subject: AgentId,
    ) -> Result<Vec<Attestation>, ReputationError> {
        Ok(self
            .attestations
            .iter()
            .filter(|a| a.to_agent == subject)
            .cloned()
            .collect())
    }
}

/// Chain of attestation sources, e.g. a remote indexer backed by a local
/// registry mirror.
///
/// Sources are asked in insertion order. Records that are not about the
/// requested subject are dropped before a source's answer is accepted. With
/// `skip_empty` set, a source that knows nothing about the subject yields to
/// the next one; an empty result is only returned when no later source has
/// records either. Without any answer, the error of the last source is kept.
pub struct CompositeAttestationSource {
    sources: Vec<Box<dyn AttestationSource>>,
    skip_empty: bool,
}

impl CompositeAttestationSource {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            skip_empty: false,
        }
    }

    /// Treat an empty answer like a miss and keep asking later sources.
    pub fn skip_empty(mut self, skip: bool) -> Self {
        self.skip_empty = skip;
        self
    }

    /// Append a source to the chain.
    pub fn add_source(&mut self, source: Box<dyn AttestationSource>) {
        self.sources.push(source);
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

impl Default for CompositeAttestationSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttestationSource for CompositeAttestationSource {
    async fn attestations_for(
        &self,
        subject: AgentId,
    ) -> Result<Vec<Attestation>, ReputationError> {
        let mut last_error = None;
        let mut answered = false;

        for (index, source) in self.sources.iter().enumerate() {
            let fetched = match source.attestations_for(subject).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    tracing::warn!(
                        subject = subject.0,
                        source = index,
                        error = %e,
                        "attestation source failed"
                    );
                    last_error = Some(e);
                    continue;
                }
            };

            let fetched_count = fetched.len();
            let attestations: Vec<Attestation> =
                fetched.into_iter().filter(|a| a.to_agent == subject).collect();
            if attestations.len() < fetched_count {
                tracing::warn!(
                    subject = subject.0,
                    source = index,
                    dropped = fetched_count - attestations.len(),
                    "attestation source returned records about other agents"
                );
            }

            if attestations.is_empty() && self.skip_empty {
                answered = true;
                continue;
            }
            tracing::debug!(
                subject = subject.0,
                source = index,
                count = attestations.len(),
                "attestations fetched"
            );
            return Ok(attestations);
        }

        if answered {
            return Ok(Vec::new());
        }
        Err(last_error.unwrap_or_else(|| {
            ReputationError::Source(format!(
                "no attestation sources configured for {}",
                subject
            ))
        }))
    }
}
