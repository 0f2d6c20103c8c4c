use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use trustmesh_core::{Attestation, CategoryKey, ReputationConfig, RiskThresholds};

use crate::error::ReputationError;

/// Optional namespace/tag filter. Both filters compose with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationQuery {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl ReputationQuery {
    /// No filter: every attestation counts.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    fn admits(&self, attestation: &Attestation) -> bool {
        attestation.matches(self.namespace.as_deref(), self.tag.as_deref())
    }
}

/// Coarse fraud/novelty classification from attestation volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Classify a total attestation count.
    pub fn classify(count: usize, thresholds: &RiskThresholds) -> Self {
        if count > thresholds.low {
            Self::Low
        } else if count > thresholds.medium {
            Self::Medium
        } else if count > thresholds.high {
            Self::High
        } else {
            Self::Critical
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Reputation summary for one subject.
///
/// Despite the name, category means and the overall score are plain
/// unweighted averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedReputation {
    /// Mean of the per-category means; 0 when no category survives filtering.
    pub overall: f64,
    /// Mean score per `(namespace, tag)` after filtering.
    #[serde(with = "category_scores")]
    pub by_category: BTreeMap<CategoryKey, f64>,
    /// Reported only; not applied to any score.
    pub decay_factor: f64,
    /// Derived from the unfiltered attestation count.
    pub risk_level: RiskLevel,
    /// Always 0; sybil/collusion scoring belongs to an external indexer.
    pub suspicion_score: f64,
    /// Unfiltered attestation count for the subject.
    pub total_attestations: usize,
}

impl WeightedReputation {
    /// Mean score of a single category, if present.
    pub fn category(&self, namespace: &str, tag: &str) -> Option<f64> {
        self.by_category
            .get(&CategoryKey::new(namespace, tag))
            .copied()
    }
}

/// Computes `WeightedReputation` reports from already-fetched attestations.
#[derive(Debug, Clone, Default)]
pub struct ReputationAggregator {
    config: ReputationConfig,
}

impl ReputationAggregator {
    /// Build an aggregator from a validated configuration.
    pub fn new(config: ReputationConfig) -> Result<Self, ReputationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReputationConfig {
        &self.config
    }

    /// Aggregate a subject's attestations.
    ///
    /// `attestations` is the full, unfiltered set for the subject: the filter
    /// in `query` narrows the category averages only, while the total count
    /// and risk level always reflect every attestation.
    pub fn aggregate(
        &self,
        attestations: &[Attestation],
        query: &ReputationQuery,
    ) -> WeightedReputation {
        let mut groups: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
        let mut filtered = 0usize;

        for attestation in attestations.iter().filter(|a| query.admits(a)) {
            let group = groups
                .entry((attestation.namespace.as_str(), attestation.tag.as_str()))
                .or_insert((0.0, 0));
            group.0 += attestation.score as f64;
            group.1 += 1;
            filtered += 1;
        }

        let by_category: BTreeMap<CategoryKey, f64> = groups
            .into_iter()
            .map(|((namespace, tag), (sum, count))| {
                (CategoryKey::new(namespace, tag), sum / count as f64)
            })
            .collect();

        // Summation can round one ulp past the extremes; keep the mean within them.
        let overall = if by_category.is_empty() {
            0.0
        } else {
            let (min_mean, max_mean) = by_category
                .values()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(*v), hi.max(*v))
                });
            let mean = by_category.values().sum::<f64>() / by_category.len() as f64;
            mean.min(max_mean).max(min_mean)
        };

        let total_attestations = attestations.len();
        let risk_level = RiskLevel::classify(total_attestations, &self.config.risk_thresholds);

        tracing::debug!(
            total = total_attestations,
            filtered,
            categories = by_category.len(),
            overall,
            risk = %risk_level,
            "aggregated reputation"
        );

        WeightedReputation {
            overall,
            by_category,
            decay_factor: self.config.decay_factor,
            risk_level,
            suspicion_score: 0.0,
            total_attestations,
        }
    }
}

/// JSON objects cannot carry composite keys, so the category map travels as
/// a list of `{namespace, tag, score}` entries.
mod category_scores {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    use trustmesh_core::CategoryKey;

    #[derive(Serialize)]
    struct EntryRef<'a> {
        namespace: &'a str,
        tag: &'a str,
        score: f64,
    }

    #[derive(Deserialize)]
    struct Entry {
        namespace: String,
        tag: String,
        score: f64,
    }

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<CategoryKey, f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(map.iter().map(|(key, score)| EntryRef {
            namespace: &key.namespace,
            tag: &key.tag,
            score: *score,
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<CategoryKey, f64>, D::Error> {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|e| (CategoryKey::new(e.namespace, e.tag), e.score))
            .collect())
    }
}
