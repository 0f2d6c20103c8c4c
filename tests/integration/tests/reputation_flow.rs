//! Integration test: registries feeding the reputation client.
//!
//! Interactions and schemas gate what the attestation registry accepts; the
//! registry-backed source then feeds `ReputationClient`.

use std::sync::Arc;

use async_trait::async_trait;
use trustmesh_core::{AgentId, Attestation, AttestationSchema, CategoryKey, InteractionId};
use trustmesh_registry::{
    AttestationRegistry, InteractionRegistry, NewAttestation, RegistryError, SchemaRegistry,
    TrustGraph,
};
use trustmesh_reputation::{
    AttestationSource, CompositeAttestationSource, RegistryAttestationSource,
    ReputationAggregator, ReputationClient, ReputationError, ReputationQuery, RiskLevel,
};

const SUBJECT: AgentId = AgentId(1);

/// Source that always fails, standing in for an unreachable indexer.
struct Unreachable;

#[async_trait]
impl AttestationSource for Unreachable {
    async fn attestations_for(
        &self,
        subject: AgentId,
    ) -> Result<Vec<Attestation>, ReputationError> {
        Err(ReputationError::Source(format!("indexer offline for {}", subject)))
    }
}

fn registries() -> Arc<AttestationRegistry> {
    let schemas = Arc::new(SchemaRegistry::new());
    for (namespace, tag, min, max) in [
        ("market", "quality", 0, 100),
        ("market", "speed", 0, 100),
        ("social", "vouch", 1, 5),
    ] {
        schemas
            .register(
                AttestationSchema::new(CategoryKey::new(namespace, tag), min, max, "test")
                    .unwrap(),
            )
            .unwrap();
    }
    Arc::new(AttestationRegistry::new(
        schemas,
        Arc::new(InteractionRegistry::new()),
    ))
}

fn attest(
    registry: &AttestationRegistry,
    from: AgentId,
    namespace: &str,
    tag: &str,
    score: i64,
) -> Result<(), RegistryError> {
    let interaction = registry
        .interactions()
        .record(from, SUBJECT, "trade", format!("{}-{}", from, score).as_bytes())?;
    registry.attest(NewAttestation {
        from_agent: from,
        to_agent: SUBJECT,
        namespace: namespace.into(),
        tag: tag.into(),
        score,
        interaction_id: interaction.id,
        comment: String::new(),
    })?;
    Ok(())
}

fn client(registry: Arc<AttestationRegistry>) -> ReputationClient {
    ReputationClient::new(
        Arc::new(RegistryAttestationSource::new(registry)),
        ReputationAggregator::default(),
    )
}

#[tokio::test]
async fn test_registry_to_report() {
    let registry = registries();
    attest(&registry, AgentId(10), "market", "quality", 80).unwrap();
    attest(&registry, AgentId(11), "market", "quality", 100).unwrap();
    attest(&registry, AgentId(12), "market", "speed", 50).unwrap();

    let report = client(registry)
        .get_weighted_reputation(SUBJECT, &ReputationQuery::all())
        .await
        .unwrap();

    assert_eq!(report.category("market", "quality"), Some(90.0));
    assert_eq!(report.category("market", "speed"), Some(50.0));
    assert_eq!(report.overall, 70.0);
    assert_eq!(report.total_attestations, 3);
    assert_eq!(report.risk_level, RiskLevel::Critical);
    assert_eq!(report.suspicion_score, 0.0);
}

#[tokio::test]
async fn test_rejected_attestations_never_reach_report() {
    let registry = registries();
    attest(&registry, AgentId(10), "market", "quality", 60).unwrap();

    // Out of range for the 1..=5 vouch schema.
    let err = attest(&registry, AgentId(11), "social", "vouch", 9).unwrap_err();
    assert!(matches!(err, RegistryError::ScoreOutOfRange { .. }));

    // No schema for this category.
    let err = attest(&registry, AgentId(12), "market", "price", 10).unwrap_err();
    assert!(matches!(err, RegistryError::SchemaNotFound(_)));

    // Interaction between other agents cannot corroborate.
    let unrelated = registry
        .interactions()
        .record(AgentId(20), AgentId(21), "trade", b"")
        .unwrap();
    let err = registry
        .attest(NewAttestation {
            from_agent: AgentId(20),
            to_agent: SUBJECT,
            namespace: "market".into(),
            tag: "quality".into(),
            score: 10,
            interaction_id: unrelated.id,
            comment: String::new(),
        })
        .unwrap_err();
    assert!(matches!(err, RegistryError::InteractionMismatch { .. }));

    let err = registry
        .attest(NewAttestation {
            from_agent: AgentId(20),
            to_agent: SUBJECT,
            namespace: "market".into(),
            tag: "quality".into(),
            score: 10,
            interaction_id: InteractionId(999),
            comment: String::new(),
        })
        .unwrap_err();
    assert!(matches!(err, RegistryError::InteractionNotFound(_)));

    let report = client(registry)
        .get_weighted_reputation(SUBJECT, &ReputationQuery::all())
        .await
        .unwrap();
    assert_eq!(report.total_attestations, 1);
    assert_eq!(report.overall, 60.0);
}

#[tokio::test]
async fn test_filters_keep_risk_on_full_count() {
    let registry = registries();
    for i in 0..11 {
        attest(&registry, AgentId(100 + i), "market", "quality", 40).unwrap();
    }
    attest(&registry, AgentId(200), "social", "vouch", 5).unwrap();

    let client = client(registry);
    let unfiltered = client
        .get_weighted_reputation(SUBJECT, &ReputationQuery::all())
        .await
        .unwrap();
    let social = client
        .get_weighted_reputation(SUBJECT, &ReputationQuery::all().namespace("social"))
        .await
        .unwrap();

    assert_eq!(unfiltered.total_attestations, 12);
    assert_eq!(unfiltered.risk_level, RiskLevel::Medium);
    assert_eq!(unfiltered.by_category.len(), 2);
    assert_eq!(unfiltered.overall, 22.5);

    assert_eq!(social.total_attestations, 12);
    assert_eq!(social.risk_level, RiskLevel::Medium);
    assert_eq!(social.by_category.len(), 1);
    assert_eq!(social.overall, 5.0);
    for key in social.by_category.keys() {
        assert!(unfiltered.by_category.contains_key(key));
    }
}

#[tokio::test]
async fn test_composite_source_falls_back_to_registry() {
    let registry = registries();
    attest(&registry, AgentId(10), "market", "speed", 30).unwrap();

    let mut composite = CompositeAttestationSource::new();
    composite.add_source(Box::new(Unreachable));
    composite.add_source(Box::new(RegistryAttestationSource::new(registry)));

    let client = ReputationClient::new(Arc::new(composite), ReputationAggregator::default());
    let report = client
        .get_weighted_reputation(SUBJECT, &ReputationQuery::all())
        .await
        .unwrap();
    assert_eq!(report.overall, 30.0);
}

#[tokio::test]
async fn test_unreachable_source_surfaces_error() {
    let client = ReputationClient::new(Arc::new(Unreachable), ReputationAggregator::default());
    let err = client
        .get_weighted_reputation(SUBJECT, &ReputationQuery::all())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("indexer offline for agent#1"));
}

#[tokio::test]
async fn test_report_serializes_for_consumers() {
    let registry = registries();
    attest(&registry, AgentId(10), "market", "quality", 75).unwrap();

    let report = client(registry)
        .get_weighted_reputation(SUBJECT, &ReputationQuery::all())
        .await
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["risk_level"], "critical");
    assert_eq!(json["by_category"][0]["namespace"], "market");
    assert_eq!(json["by_category"][0]["score"], 75.0);
}

#[test]
fn test_trust_graph_alongside_attestations() {
    let registry = registries();
    let graph = TrustGraph::new();

    // Attesters who scored the subject highly also trust it.
    for (attester, score) in [(AgentId(10), 95), (AgentId(11), 20)] {
        attest(&registry, attester, "market", "quality", score).unwrap();
        let weight = if score >= 50 { 0.9 } else { -0.5 };
        graph.set_trust(attester, SUBJECT, weight).unwrap();
    }
    graph.set_trust(AgentId(12), AgentId(10), 0.8).unwrap();

    let trusters: Vec<AgentId> = graph.trusters_of(SUBJECT).iter().map(|e| e.from).collect();
    assert_eq!(trusters, vec![AgentId(10), AgentId(11)]);
    assert!(graph.has_trust_path(AgentId(12), SUBJECT, 2));
    assert!(!graph.has_trust_path(AgentId(11), SUBJECT, 2));
    assert_eq!(registry.by_attester(AgentId(10)).len(), 1);
}
