use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use trustmesh_core::AgentId;

use crate::error::RegistryError;

/// A directed trust edge between two agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustEdge {
    /// The truster.
    pub from: AgentId,
    /// The trusted agent.
    pub to: AgentId,
    /// Trust weight in range [-1.0, 1.0].
    /// Positive = trust, negative = distrust, 0 = neutral.
    pub weight: f64,
    /// How many times this edge has been set.
    pub updates: u64,
    pub last_updated: DateTime<Utc>,
}

/// Directed weighted trust graph between agents.
///
/// Edges are keyed by `(from, to)`.
pub struct TrustGraph {
    edges: DashMap<(AgentId, AgentId), TrustEdge>,
}

impl TrustGraph {
    pub fn new() -> Self {
        Self {
            edges: DashMap::new(),
        }
    }

    /// Add or update a trust edge.
    ///
    /// Updating replaces the weight and bumps the update count.
    pub fn set_trust(&self, from: AgentId, to: AgentId, weight: f64) -> Result<(), RegistryError> {
        if !(-1.0..=1.0).contains(&weight) {
            return Err(RegistryError::InvalidTrustWeight(weight));
        }
        if from == to {
            return Err(RegistryError::SelfTrust(from));
        }

        self.edges
            .entry((from, to))
            .and_modify(|edge| {
                edge.weight = weight;
                edge.updates += 1;
                edge.last_updated = Utc::now();
            })
            .or_insert_with(|| TrustEdge {
                from,
                to,
                weight,
                updates: 1,
                last_updated: Utc::now(),
            });

        tracing::debug!(from = from.0, to = to.0, weight, "trust edge set");
        Ok(())
    }

    /// Direct trust weight from one agent to another.
    pub fn trust(&self, from: AgentId, to: AgentId) -> Option<f64> {
        self.edges.get(&(from, to)).map(|edge| edge.weight)
    }

    pub fn edge(&self, from: AgentId, to: AgentId) -> Option<TrustEdge> {
        self.edges.get(&(from, to)).map(|e| e.clone())
    }

    /// Remove a trust edge, returning it if it existed.
    pub fn revoke(&self, from: AgentId, to: AgentId) -> Option<TrustEdge> {
        self.edges.remove(&(from, to)).map(|(_, edge)| edge)
    }

    /// Outgoing edges of `from`, sorted by target.
    pub fn trusted_by(&self, from: AgentId) -> Vec<TrustEdge> {
        let mut edges: Vec<TrustEdge> = self
            .edges
            .iter()
            .filter(|entry| entry.key().0 == from)
            .map(|entry| entry.value().clone())
            .collect();
        edges.sort_by_key(|e| e.to);
        edges
    }

    /// Incoming edges of `to`, sorted by source.
    pub fn trusters_of(&self, to: AgentId) -> Vec<TrustEdge> {
        let mut edges: Vec<TrustEdge> = self
            .edges
            .iter()
            .filter(|entry| entry.key().1 == to)
            .map(|entry| entry.value().clone())
            .collect();
        edges.sort_by_key(|e| e.from);
        edges
    }

    /// Whether `to` is reachable from `from` over at most `max_depth`
    /// strictly positive edges.
    pub fn has_trust_path(&self, from: AgentId, to: AgentId, max_depth: usize) -> bool {
        if from == to {
            return true;
        }

        let mut visited = HashSet::from([from]);
        let mut queue = VecDeque::from([(from, 0usize)]);

        while let Some((agent, depth)) = queue.pop_front() {
            if depth == max_depth {
                continue;
            }
            for edge in self.trusted_by(agent) {
                if edge.weight <= 0.0 {
                    continue;
                }
                if edge.to == to {
                    return true;
                }
                if visited.insert(edge.to) {
                    queue.push_back((edge.to, depth + 1));
                }
            }
        }

        false
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl Default for TrustGraph {
    fn default() -> Self {
        Self::new()
    }
}
