//! Message Channel
//!
//! Typed layer on top of the raw registry. Outbound messages are serialized
//! to JSON and delivered to the host receiver; inbound JSON coming from the
//! host is decoded and fanned out to every subscribed listener.

use super::protocol::{InboundMessage, OutboundMessage};
use super::registry::{Delivery, ReceiverRegistry};
use crate::core::{BridgeError, BridgeResult};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Listener for inbound messages
pub type InboundListener = dyn Fn(&InboundMessage) + Send + Sync;

/// Handle returned by [`MessageChannel::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

static GLOBAL_CHANNEL: OnceLock<MessageChannel> = OnceLock::new();

pub struct MessageChannel {
    registry: Arc<ReceiverRegistry>,
    listeners: RwLock<Vec<(SubscriptionId, Arc<InboundListener>)>>,
    next_id: AtomicU64,
}

impl MessageChannel {
    pub fn new(registry: Arc<ReceiverRegistry>) -> Self {
        Self {
            registry,
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Process-wide channel bound to [`ReceiverRegistry::global`]
    pub fn global() -> &'static MessageChannel {
        GLOBAL_CHANNEL.get_or_init(|| Self::new(Arc::clone(ReceiverRegistry::global())))
    }

    pub fn registry(&self) -> &Arc<ReceiverRegistry> {
        &self.registry
    }

    /// Serialize `message` and hand it to the host receiver
    pub fn send(&self, message: &OutboundMessage) -> BridgeResult<Delivery> {
        let json = serde_json::to_string(message).map_err(|e| {
            tracing::error!(target: "bridge::channel", "Failed to send native message: {}", e);
            BridgeError::Encode(e)
        })?;

        let delivery = self.registry.deliver(&json);
        tracing::debug!(
            target: "bridge::channel",
            message_type = message.message_type(),
            ?delivery,
            "Outbound message sent"
        );
        Ok(delivery)
    }

    /// Tell the host the engine is ready to receive messages
    pub fn announce_initialized(&self) -> BridgeResult<Delivery> {
        self.send(&OutboundMessage::Initialized)
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&InboundMessage) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Returns false when `id` was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Decode a raw JSON string from the host and dispatch it
    pub fn on_message_received(&self, json: &str) -> BridgeResult<InboundMessage> {
        let message: InboundMessage = serde_json::from_str(json).map_err(|source| {
            tracing::error!(
                target: "bridge::channel",
                raw = json,
                "Failed to deserialize inbound native message: {}",
                source
            );
            BridgeError::Decode {
                source,
                raw: json.to_owned(),
            }
        })?;

        self.dispatch(&message);
        Ok(message)
    }

    /// Deliver an already decoded message to every listener, in subscription
    /// order. Returns the number of listeners notified.
    pub fn dispatch(&self, message: &InboundMessage) -> usize {
        // Snapshot so listeners can subscribe or unsubscribe while handling
        let listeners: Vec<Arc<InboundListener>> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in &listeners {
            listener(message);
        }

        tracing::trace!(
            target: "bridge::channel",
            message_type = message.message_type(),
            listeners = listeners.len(),
            "Inbound message dispatched"
        );
        listeners.len()
    }
}

impl fmt::Debug for MessageChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageChannel")
            .field("registry", &self.registry)
            .field("listeners", &self.listener_count())
            .finish()
    }
}
