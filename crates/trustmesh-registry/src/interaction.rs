use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use trustmesh_core::{payload_hash, AgentId, Interaction, InteractionId};

use crate::error::RegistryError;

/// Registry of interactions between agents.
///
/// Ids are assigned sequentially starting at 1.
pub struct InteractionRegistry {
    interactions: DashMap<InteractionId, Interaction>,
    next_id: AtomicU64,
}

impl InteractionRegistry {
    pub fn new() -> Self {
        Self {
            interactions: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Record an interaction between two distinct agents.
    ///
    /// Only the BLAKE3 hash of `payload` is kept.
    pub fn record(
        &self,
        agent_a: AgentId,
        agent_b: AgentId,
        interaction_type: &str,
        payload: &[u8],
    ) -> Result<Interaction, RegistryError> {
        if agent_a == agent_b {
            return Err(RegistryError::InvalidInteraction(format!(
                "{} cannot interact with itself",
                agent_a
            )));
        }
        if interaction_type.trim().is_empty() {
            return Err(RegistryError::InvalidInteraction(
                "interaction type must not be empty".into(),
            ));
        }

        let id = InteractionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let interaction = Interaction {
            id,
            agent_a,
            agent_b,
            interaction_type: interaction_type.to_string(),
            data_hash: payload_hash(payload),
            timestamp: Utc::now(),
        };
        self.interactions.insert(id, interaction.clone());

        tracing::debug!(
            id = id.0,
            agent_a = agent_a.0,
            agent_b = agent_b.0,
            interaction_type,
            "recorded interaction"
        );
        Ok(interaction)
    }

    /// Get an interaction by id.
    pub fn get(&self, id: InteractionId) -> Option<Interaction> {
        self.interactions.get(&id).map(|e| e.clone())
    }

    /// All interactions an agent took part in, oldest first.
    pub fn for_agent(&self, agent: AgentId) -> Vec<Interaction> {
        let mut found: Vec<Interaction> = self
            .interactions
            .iter()
            .filter(|entry| entry.counterparty(agent).is_some())
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by_key(|i| i.id);
        found
    }

    /// Whether interaction `id` exists and was between exactly `a` and `b`.
    pub fn involves(&self, id: InteractionId, a: AgentId, b: AgentId) -> bool {
        self.interactions
            .get(&id)
            .map_or(false, |entry| entry.involves(a, b))
    }

    pub fn count(&self) -> usize {
        self.interactions.len()
    }
}

impl Default for InteractionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
