//! Log-to-chat relay core.
//!
//! Forwards log records to group and/or private chats through sessions owned by the
//! host. Chat transports (Telegram, ...) live behind [`messaging::port::ChatSession`],
//! implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod relay;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{Error, Result};
