use futures::future::try_join_all;
use std::sync::Arc;

use trustmesh_core::AgentId;

use crate::aggregator::{ReputationAggregator, ReputationQuery, WeightedReputation};
use crate::error::ReputationError;
use crate::source::AttestationSource;

/// Fetches a subject's attestations from an injected source and aggregates
/// them into a `WeightedReputation`.
pub struct ReputationClient {
    source: Arc<dyn AttestationSource>,
    aggregator: ReputationAggregator,
}

impl ReputationClient {
    pub fn new(source: Arc<dyn AttestationSource>, aggregator: ReputationAggregator) -> Self {
        Self { source, aggregator }
    }

    pub fn aggregator(&self) -> &ReputationAggregator {
        &self.aggregator
    }

    /// Reputation of one subject. Source errors propagate unchanged.
    pub async fn get_weighted_reputation(
        &self,
        subject: AgentId,
        query: &ReputationQuery,
    ) -> Result<WeightedReputation, ReputationError> {
        let attestations = self.source.attestations_for(subject).await?;
        tracing::debug!(
            subject = subject.0,
            fetched = attestations.len(),
            "fetched attestations"
        );
        Ok(self.aggregator.aggregate(&attestations, query))
    }

    /// Reputations of several subjects, fetched concurrently.
    ///
    /// Reports come back in input order; the first source error fails the
    /// whole batch.
    pub async fn get_weighted_reputations(
        &self,
        subjects: &[AgentId],
        query: &ReputationQuery,
    ) -> Result<Vec<WeightedReputation>, ReputationError> {
        let fetched = try_join_all(
            subjects
                .iter()
                .map(|subject| self.source.attestations_for(*subject)),
        )
        .await?;

        tracing::debug!(subjects = subjects.len(), "fetched attestation batch");
        Ok(fetched
            .iter()
            .map(|attestations| self.aggregator.aggregate(attestations, query))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use trustmesh_core::{Attestation, AttestationId, InteractionId};

    use crate::aggregator::RiskLevel;
    use crate::source::StaticAttestationSource;

    struct RejectingSource {
        bad_subject: AgentId,
        inner: StaticAttestationSource,
    }

    #[async_trait]
    impl AttestationSource for RejectingSource {
        async fn attestations_for(
            &self,
            subject: AgentId,
        ) -> Result<Vec<Attestation>, ReputationError> {
            if subject == self.bad_subject {
                return Err(ReputationError::Source("ledger unavailable".into()));
            }
            self.inner.attestations_for(subject).await
        }
    }

    fn attestation(to: u64, namespace: &str, tag: &str, score: i64) -> Attestation {
        Attestation {
            id: AttestationId(0),
            from_agent: AgentId(100),
            to_agent: AgentId(to),
            namespace: namespace.into(),
            tag: tag.into(),
            score,
            interaction_id: InteractionId(1),
            comment: String::new(),
            timestamp: Utc::now(),
        }
    }

    fn records() -> Vec<Attestation> {
        vec![
            attestation(1, "a", "x", 80),
            attestation(1, "a", "x", 100),
            attestation(1, "a", "y", 50),
            attestation(2, "b", "z", 10),
        ]
    }

    fn client() -> ReputationClient {
        ReputationClient::new(
            Arc::new(StaticAttestationSource::new(records())),
            ReputationAggregator::default(),
        )
    }

    #[tokio::test]
    async fn test_get_weighted_reputation() {
        let report = client()
            .get_weighted_reputation(AgentId(1), &ReputationQuery::all())
            .await
            .unwrap();
        assert_eq!(report.overall, 70.0);
        assert_eq!(report.total_attestations, 3);
        assert_eq!(report.risk_level, RiskLevel::Critical);
    }

    #[tokio::test]
    async fn test_unknown_subject_is_empty_report() {
        let report = client()
            .get_weighted_reputation(AgentId(42), &ReputationQuery::all())
            .await
            .unwrap();
        assert_eq!(report.total_attestations, 0);
        assert_eq!(report.overall, 0.0);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let reports = client()
            .get_weighted_reputations(&[AgentId(2), AgentId(1)], &ReputationQuery::all())
            .await
            .unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].overall, 10.0);
        assert_eq!(reports[1].overall, 70.0);
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let client = ReputationClient::new(
            Arc::new(RejectingSource {
                bad_subject: AgentId(2),
                inner: StaticAttestationSource::new(records()),
            }),
            ReputationAggregator::default(),
        );

        let single = client
            .get_weighted_reputation(AgentId(2), &ReputationQuery::all())
            .await;
        assert!(matches!(single, Err(ReputationError::Source(_))));

        let batch = client
            .get_weighted_reputations(&[AgentId(1), AgentId(2)], &ReputationQuery::all())
            .await;
        assert!(matches!(batch, Err(ReputationError::Source(_))));
    }
}
