//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Every external collaborator of the reporting subsystem is reached
//! through one of these traits: the host's fill storage, its exchange
//! connectors, the performance engine, the outbound message channel, the
//! snapshot store, and the preflight gates consulted by status checks.

pub mod outbound;
