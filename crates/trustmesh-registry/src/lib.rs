//! TrustMesh Registries
//!
//! In-memory counterparts of the three TrustMesh registries, each an owned
//! capability object that callers share through `Arc`:
//! - Interaction registry (who interacted with whom, payload hash)
//! - Attestation schema registry (score range per namespace/tag)
//! - Attestation registry (scored claims backed by an interaction)
//! - Trust graph (directed trust weights between agents)

pub mod attestation;
pub mod error;
pub mod interaction;
pub mod schema;
pub mod trust_graph;

pub use attestation::{AttestationRegistry, NewAttestation};
pub use error::RegistryError;
pub use interaction::InteractionRegistry;
pub use schema::SchemaRegistry;
pub use trust_graph::{TrustEdge, TrustGraph};
