use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use trustmesh_core::{AgentId, Attestation, AttestationId, CategoryKey, InteractionId};

use crate::error::RegistryError;
use crate::interaction::InteractionRegistry;
use crate::schema::SchemaRegistry;

/// Parameters of a new attestation; the registry assigns id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttestation {
    pub from_agent: AgentId,
    pub to_agent: AgentId,
    pub namespace: String,
    pub tag: String,
    pub score: i64,
    pub interaction_id: InteractionId,
    #[serde(default)]
    pub comment: String,
}

/// Registry of attestations.
///
/// Every accepted attestation has a registered schema for its category, a
/// score within that schema's range, and a corroborating interaction between
/// exactly the attester and the subject.
pub struct AttestationRegistry {
    schemas: Arc<SchemaRegistry>,
    interactions: Arc<InteractionRegistry>,
    attestations: DashMap<AttestationId, Attestation>,
    next_id: AtomicU64,
}

impl AttestationRegistry {
    pub fn new(schemas: Arc<SchemaRegistry>, interactions: Arc<InteractionRegistry>) -> Self {
        Self {
            schemas,
            interactions,
            attestations: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Schema registry used for score validation.
    pub fn schemas(&self) -> &Arc<SchemaRegistry> {
        &self.schemas
    }

    /// Interaction registry used for corroboration.
    pub fn interactions(&self) -> &Arc<InteractionRegistry> {
        &self.interactions
    }

    /// Validate and store a new attestation.
    pub fn attest(&self, request: NewAttestation) -> Result<Attestation, RegistryError> {
        if request.from_agent == request.to_agent {
            return Err(RegistryError::SelfAttestation(request.from_agent));
        }

        let category = CategoryKey::new(request.namespace.clone(), request.tag.clone());
        self.schemas.validate_score(&category, request.score)?;

        if self.interactions.get(request.interaction_id).is_none() {
            return Err(RegistryError::InteractionNotFound(request.interaction_id));
        }
        if !self
            .interactions
            .involves(request.interaction_id, request.from_agent, request.to_agent)
        {
            return Err(RegistryError::InteractionMismatch {
                interaction: request.interaction_id,
                from: request.from_agent,
                to: request.to_agent,
            });
        }

        let id = AttestationId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let attestation = Attestation {
            id,
            from_agent: request.from_agent,
            to_agent: request.to_agent,
            namespace: request.namespace,
            tag: request.tag,
            score: request.score,
            interaction_id: request.interaction_id,
            comment: request.comment,
            timestamp: Utc::now(),
        };
        self.attestations.insert(id, attestation.clone());

        tracing::info!(
            id = id.0,
            from = attestation.from_agent.0,
            to = attestation.to_agent.0,
            category = %category,
            score = attestation.score,
            "attestation recorded"
        );
        Ok(attestation)
    }

    /// Get an attestation by id.
    pub fn get(&self, id: AttestationId) -> Option<Attestation> {
        self.attestations.get(&id).map(|e| e.clone())
    }

    /// All attestations about `subject`, oldest first.
    pub fn for_subject(&self, subject: AgentId) -> Vec<Attestation> {
        self.collect_sorted(|a| a.to_agent == subject)
    }

    /// All attestations made by `attester`, oldest first.
    pub fn by_attester(&self, attester: AgentId) -> Vec<Attestation> {
        self.collect_sorted(|a| a.from_agent == attester)
    }

    pub fn count(&self) -> usize {
        self.attestations.len()
    }

    fn collect_sorted(&self, keep: impl Fn(&Attestation) -> bool) -> Vec<Attestation> {
        let mut found: Vec<Attestation> = self
            .attestations
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by_key(|a| a.id);
        found
    }
}
