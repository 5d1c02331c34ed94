use tt_domain::error::Result;
use tt_domain::message::ChatMessage;

/// Trait every model transport must implement.
///
/// Implementations are endpoint-specific adapters that translate between
/// our chat messages and the wire format of one model-serving API, and
/// hand back the raw reply text untouched.
#[async_trait::async_trait]
pub trait ModelTransport: Send + Sync {
    /// Send the conversation and wait for the model's raw reply text.
    async fn send(&self, messages: &[ChatMessage]) -> Result<String>;

    /// A unique identifier for this transport instance (used in logs).
    fn transport_id(&self) -> &str;
}
