//! Chat session abstractions consumed by the relay.

pub mod port;
pub mod registry;
