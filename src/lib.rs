//! # Engine Bridge
//!
//! Messaging bridge between an embedded game engine and the native mobile
//! application hosting it.
//!
//! ## Features
//!
//! - **Receiver Registry**: one process-wide slot for the host-side message receiver
//! - **Typed Protocol**: JSON messages discriminated by `messageType`
//! - **Message Channel**: outbound sends and inbound listener fan-out
//! - **C ABI**: `#[no_mangle]` exports for the host, built as a `cdylib`
//!
//! ### Example
//!
//! ```
//! use std::sync::Arc;
//! use engine_bridge::bindings::{ChannelReceiver, Delivery, ReceiverRegistry};
//!
//! let registry = ReceiverRegistry::new();
//! let (receiver, rx) = ChannelReceiver::unbounded();
//! registry.set(Arc::new(receiver));
//!
//! assert_eq!(registry.deliver("hello"), Delivery::Delivered);
//! assert_eq!(rx.try_recv().unwrap(), "hello");
//! ```
//!
//! ## Modules
//!
//! - [`bindings`]: registry, protocol, channel and C exports
//! - [`config`]: bridge configuration
//! - [`core`]: errors and logging

/// Errors, logging and shared macros
pub mod core;
/// Configuration system
pub mod config;
/// Engine/host bindings
pub mod bindings;

pub use bindings::{initialize, register_receiver, send_message, unregister_receiver};
pub use crate::core::{BridgeError, BridgeResult, BridgeStatus};
