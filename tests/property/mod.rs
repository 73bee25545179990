//! Property-based tests for ordering and rotation guarantees

mod rotation;
