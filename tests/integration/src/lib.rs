//! Cross-crate integration tests for TrustMesh live in `tests/`.
