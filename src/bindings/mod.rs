//! Engine/Host Binding Layer (FFI)
//!
//! This module connects the embedded engine with the native host
//! application that embeds it.
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Native Host Application                     │
//! │   implements receive(ctx, msg)      posts inbound JSON      │
//! └───────────────▲───────────────────────────┬─────────────────┘
//!                 │                           │
//!                 │        C ABI (ffi)        │
//!                 │                           v
//! │  ┌────────────┴──────────────┐  ┌─────────────────────────┐ │
//! │  │     ReceiverRegistry      │  │     MessageChannel      │ │
//! │  │  single host receiver     │  │  typed JSON protocol,   │ │
//! │  │  slot + pending buffer    │◄─┤  inbound listeners      │ │
//! │  └───────────────────────────┘  └────────────▲────────────┘ │
//! │                                              │              │
//! │                    Engine-side code ─────────┘              │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod channel;
pub mod ffi;
pub mod protocol;
pub mod receivers;
pub mod registry;

pub use channel::{InboundListener, MessageChannel, SubscriptionId};
pub use ffi::{CallbackReceiver, ReceiveCallback};
pub use protocol::*;
pub use receivers::{ChannelReceiver, LoggingReceiver};
pub use registry::{
    register_receiver, send_message, unregister_receiver, Delivery, DeliveryStats,
    MessageReceiver, ReceiverRegistry,
};

use crate::config::BridgeConfig;
use crate::core::{init_logging, BridgeResult};
use std::sync::Arc;

/// Bring the bridge up from a configuration.
///
/// Applies `BRIDGE_*` environment overrides, validates and creates the
/// process-wide registry with the configured pending policy. Logging is
/// installed only once the registry has been created, so a rejected call
/// leaves the host's tracing setup untouched.
pub fn initialize(mut config: BridgeConfig) -> BridgeResult<&'static Arc<ReceiverRegistry>> {
    config.apply_env_overrides();
    config.validate()?;
    let registry = ReceiverRegistry::configure_global(config.pending)?;
    init_logging(&config.logging);
    Ok(registry)
}
