use async_trait::async_trait;

use crate::{
    domain::{GroupTarget, RecipientId},
    Result,
};

/// An already-established chat session (a logged-on bot).
///
/// The relay only reads `identity` / `is_connected` and asks for sends; connecting,
/// authenticating and tearing down belong to whoever owns the session.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// The account this session is logged on as.
    fn identity(&self) -> RecipientId;

    fn is_connected(&self) -> bool;

    async fn send_group_message(&self, target: GroupTarget, text: &str) -> Result<()>;
    async fn send_direct_message(&self, recipient: RecipientId, text: &str) -> Result<()>;
}
