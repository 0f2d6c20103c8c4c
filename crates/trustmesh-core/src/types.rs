use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Opaque numeric identifier of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u64);

impl AgentId {
    /// Raw numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for AgentId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Registry-assigned identifier of an interaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionId(pub u64);

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry-assigned identifier of an attestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttestationId(pub u64);

impl fmt::Display for AttestationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Two-level attestation category: application namespace plus sub-metric tag.
///
/// Grouping always goes through this composite key, so a colon inside either
/// field can never merge two distinct categories. `Display` renders
/// `namespace:tag` for humans only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryKey {
    pub namespace: String,
    pub tag: String,
}

impl CategoryKey {
    /// Create a category key without validation.
    pub fn new(namespace: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            tag: tag.into(),
        }
    }

    /// Reject empty namespaces and tags.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.namespace.is_empty() {
            return Err(CoreError::InvalidCategory("namespace must not be empty".into()));
        }
        if self.tag.is_empty() {
            return Err(CoreError::InvalidCategory("tag must not be empty".into()));
        }
        Ok(())
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.tag)
    }
}

/// A scored claim made by one agent about another within a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
    pub id: AttestationId,
    /// The attesting agent.
    pub from_agent: AgentId,
    /// The subject of the attestation.
    pub to_agent: AgentId,
    pub namespace: String,
    pub tag: String,
    /// Score within the category schema's `[min_score, max_score]`.
    pub score: i64,
    /// Interaction that corroborates this attestation.
    pub interaction_id: InteractionId,
    #[serde(default)]
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}

impl Attestation {
    /// The `(namespace, tag)` category of this attestation.
    pub fn category(&self) -> CategoryKey {
        CategoryKey::new(self.namespace.clone(), self.tag.clone())
    }

    /// Whether this attestation passes an optional namespace and tag filter.
    pub fn matches(&self, namespace: Option<&str>, tag: Option<&str>) -> bool {
        namespace.map_or(true, |ns| self.namespace == ns) && tag.map_or(true, |t| self.tag == t)
    }
}

/// Record that two agents interacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    pub agent_a: AgentId,
    pub agent_b: AgentId,
    /// Free-form kind, e.g. "task", "trade", "message".
    pub interaction_type: String,
    /// Hex-encoded BLAKE3 hash of the interaction payload.
    pub data_hash: String,
    pub timestamp: DateTime<Utc>,
}

impl Interaction {
    /// True when the participants are exactly `{a, b}`, in either order.
    pub fn involves(&self, a: AgentId, b: AgentId) -> bool {
        (self.agent_a == a && self.agent_b == b) || (self.agent_a == b && self.agent_b == a)
    }

    /// The other participant, if `agent` took part.
    pub fn counterparty(&self, agent: AgentId) -> Option<AgentId> {
        if self.agent_a == agent {
            Some(self.agent_b)
        } else if self.agent_b == agent {
            Some(self.agent_a)
        } else {
            None
        }
    }
}

/// Hex-encoded BLAKE3 hash of an interaction payload.
pub fn payload_hash(payload: &[u8]) -> String {
    hex::encode(blake3::hash(payload).as_bytes())
}

/// Score range and description registered for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationSchema {
    pub category: CategoryKey,
    pub min_score: i64,
    pub max_score: i64,
    pub description: String,
    pub registered_at: DateTime<Utc>,
}

impl AttestationSchema {
    /// Create a schema, validating the category and the score range.
    pub fn new(
        category: CategoryKey,
        min_score: i64,
        max_score: i64,
        description: impl Into<String>,
    ) -> Result<Self, CoreError> {
        category.validate()?;
        if min_score >= max_score {
            return Err(CoreError::InvalidScoreRange {
                min: min_score,
                max: max_score,
            });
        }
        Ok(Self {
            category,
            min_score,
            max_score,
            description: description.into(),
            registered_at: Utc::now(),
        })
    }

    /// Whether `score` lies inside the inclusive range.
    pub fn contains(&self, score: i64) -> bool {
        (self.min_score..=self.max_score).contains(&score)
    }
}
