//! Shared helpers for geo-enricher integration tests.
