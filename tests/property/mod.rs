//! Property-based tests for determinism and naming guarantees
