//! Outbound adapters (persistence, etc.) that implement domain ports while
//! keeping infrastructure details at the edge.

pub mod persistence;
