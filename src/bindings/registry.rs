//! Receiver Registry
//!
//! Holds the single host-side [`MessageReceiver`] that engine messages are
//! forwarded to. The registry is an ordinary object so it can be created per
//! test or per embedding; [`ReceiverRegistry::global`] provides the
//! process-wide instance used by the exported C entry points.

use crate::config::{PendingConfig, PendingPolicy};
use crate::core::{BridgeError, BridgeResult};
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock};

/// Host-side capability receiving messages from the engine.
///
/// Implementations may be invoked from any thread, concurrently, and are
/// responsible for their own synchronization.
pub trait MessageReceiver: Send + Sync {
    fn receive(&self, message: &str);
}

impl<F> MessageReceiver for F
where
    F: Fn(&str) + Send + Sync,
{
    fn receive(&self, message: &str) {
        self(message)
    }
}

/// Outcome of a single send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the registered receiver
    Delivered,
    /// No receiver yet; kept for replay
    Buffered,
    /// No receiver and nothing kept
    Dropped,
}

/// Snapshot of the registry counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub delivered: u64,
    pub buffered: u64,
    pub dropped: u64,
    pub replayed: u64,
}

#[derive(Default)]
struct Counters {
    delivered: AtomicU64,
    buffered: AtomicU64,
    dropped: AtomicU64,
    replayed: AtomicU64,
}

type ReceiverSlot = Option<Arc<dyn MessageReceiver>>;

static GLOBAL_REGISTRY: OnceLock<Arc<ReceiverRegistry>> = OnceLock::new();

/// Single-slot registry of the host receiver.
///
/// Lock order is `pending` before `slot`. Receivers are always invoked with
/// no lock held, so a receiver may send or re-register from inside `receive`.
pub struct ReceiverRegistry {
    slot: RwLock<ReceiverSlot>,
    pending: Mutex<VecDeque<String>>,
    config: PendingConfig,
    counters: Counters,
}

impl Default for ReceiverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiverRegistry {
    pub fn new() -> Self {
        Self::with_config(PendingConfig::default())
    }

    /// Create a registry with the given undelivered-message policy.
    ///
    /// A `Buffer` policy with zero capacity behaves like `Drop`.
    pub fn with_config(config: PendingConfig) -> Self {
        Self {
            slot: RwLock::new(None),
            pending: Mutex::new(VecDeque::new()),
            config,
            counters: Counters::default(),
        }
    }

    /// Process-wide registry, created with the default policy on first use
    pub fn global() -> &'static Arc<ReceiverRegistry> {
        GLOBAL_REGISTRY.get_or_init(|| Arc::new(Self::new()))
    }

    /// Install the process-wide registry with a specific policy.
    ///
    /// Must run before anything touches [`ReceiverRegistry::global`].
    pub fn configure_global(config: PendingConfig) -> BridgeResult<&'static Arc<ReceiverRegistry>> {
        config.validate()?;

        let mut installed = false;
        let registry = GLOBAL_REGISTRY.get_or_init(|| {
            installed = true;
            Arc::new(Self::with_config(config))
        });

        if installed {
            tracing::info!(target: "bridge", policy = ?registry.config.policy, "Global receiver registry configured");
            Ok(registry)
        } else {
            Err(BridgeError::AlreadyInitialized("receiver registry"))
        }
    }

    pub fn config(&self) -> &PendingConfig {
        &self.config
    }

    /// Register `receiver`, replacing the current one.
    ///
    /// Buffered messages are replayed to the new receiver in send order.
    /// A replayed message whose `receive` panics is counted as dropped and
    /// the replay carries on with the next one.
    /// Returns the previously registered receiver, if any.
    pub fn set(&self, receiver: Arc<dyn MessageReceiver>) -> Option<Arc<dyn MessageReceiver>> {
        let (previous, replay) = {
            let mut pending = self.lock_pending();
            let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);

            if let Some(current) = slot.as_ref() {
                if same_receiver(current, &receiver) {
                    tracing::debug!(target: "bridge", "Receiver re-registered");
                } else {
                    tracing::info!(target: "bridge", "Replacing registered receiver");
                }
            } else {
                tracing::info!(target: "bridge", "Receiver registered");
            }

            let previous = slot.replace(Arc::clone(&receiver));
            let replay: Vec<String> = pending.drain(..).collect();
            (previous, replay)
        };

        if !replay.is_empty() {
            tracing::info!(target: "bridge", count = replay.len(), "Replaying buffered messages");
            for message in &replay {
                self.replay_one(receiver.as_ref(), message);
            }
        }

        previous
    }

    /// Currently registered receiver
    pub fn get(&self) -> Option<Arc<dyn MessageReceiver>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove the registered receiver, returning it
    pub fn clear(&self) -> Option<Arc<dyn MessageReceiver>> {
        let previous = self
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            tracing::info!(target: "bridge", "Receiver unregistered");
        }
        previous
    }

    pub fn is_registered(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Forward `message` to the registered receiver.
    ///
    /// Never fails: without a receiver the message is buffered or dropped
    /// according to the registry policy.
    pub fn deliver(&self, message: &str) -> Delivery {
        if let Some(receiver) = self.get() {
            return self.hand_over(receiver.as_ref(), message);
        }

        let mut pending = self.lock_pending();
        // set() drains under this lock; recheck so nothing is stranded
        if let Some(receiver) = self.get() {
            drop(pending);
            return self.hand_over(receiver.as_ref(), message);
        }

        if self.config.policy == PendingPolicy::Drop || self.config.capacity == 0 {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(target: "bridge", len = message.len(), "No receiver registered, message dropped");
            return Delivery::Dropped;
        }

        if pending.len() >= self.config.capacity {
            pending.pop_front();
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(target: "bridge", capacity = self.config.capacity, "Pending buffer full, oldest message dropped");
        }
        pending.push_back(message.to_owned());
        self.counters.buffered.fetch_add(1, Ordering::Relaxed);
        Delivery::Buffered
    }

    /// Number of messages waiting for a receiver
    pub fn pending_len(&self) -> usize {
        self.lock_pending().len()
    }

    /// Discard buffered messages, returning how many were discarded
    pub fn clear_pending(&self) -> usize {
        let mut pending = self.lock_pending();
        let count = pending.len();
        pending.clear();
        self.counters
            .dropped
            .fetch_add(count as u64, Ordering::Relaxed);
        count
    }

    pub fn stats(&self) -> DeliveryStats {
        DeliveryStats {
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            buffered: self.counters.buffered.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
            replayed: self.counters.replayed.load(Ordering::Relaxed),
        }
    }

    fn hand_over(&self, receiver: &dyn MessageReceiver, message: &str) -> Delivery {
        receiver.receive(message);
        self.counters.delivered.fetch_add(1, Ordering::Relaxed);
        Delivery::Delivered
    }

    fn replay_one(&self, receiver: &dyn MessageReceiver, message: &str) {
        match panic::catch_unwind(AssertUnwindSafe(|| receiver.receive(message))) {
            Ok(()) => {
                self.counters.replayed.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::error!(target: "bridge", len = message.len(), "Receiver panicked on a replayed message; dropped");
            }
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ReceiverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiverRegistry")
            .field("registered", &self.is_registered())
            .field("pending", &self.pending_len())
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

fn same_receiver(a: &Arc<dyn MessageReceiver>, b: &Arc<dyn MessageReceiver>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Register `receiver` with the process-wide registry
pub fn register_receiver(receiver: Arc<dyn MessageReceiver>) {
    ReceiverRegistry::global().set(receiver);
}

/// Remove the receiver from the process-wide registry
pub fn unregister_receiver() {
    ReceiverRegistry::global().clear();
}

/// Send a raw message through the process-wide registry
pub fn send_message(message: &str) -> Delivery {
    ReceiverRegistry::global().deliver(message)
}
