//! Typed Message Protocol
//!
//! JSON messages exchanged with the host application. Every message is an
//! object carrying a `messageType` discriminator next to its own fields:
//!
//! ```json
//! {"messageType":"CameraViewChanged","view":"simulation"}
//! ```

use serde::{Deserialize, Serialize};

/// Name of the discriminator field on every message
pub const DISCRIMINATOR_FIELD: &str = "messageType";

/// Messages sent from the host application to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "messageType")]
pub enum InboundMessage {
    UpgradesChanged(UpgradesChanged),
    CameraViewChanged(CameraViewChanged),
}

impl InboundMessage {
    pub fn message_type(&self) -> &'static str {
        match self {
            InboundMessage::UpgradesChanged(_) => "UpgradesChanged",
            InboundMessage::CameraViewChanged(_) => "CameraViewChanged",
        }
    }
}

/// Messages sent from the engine to the host application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "messageType")]
pub enum OutboundMessage {
    /// The engine finished initializing and is ready to receive messages
    Initialized,
}

impl OutboundMessage {
    pub fn message_type(&self) -> &'static str {
        match self {
            OutboundMessage::Initialized => "Initialized",
        }
    }
}

/// The player's active upgrades changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradesChanged {
    #[serde(default)]
    pub upgrades: Vec<UpgradeId>,
}

impl UpgradesChanged {
    pub fn is_active(&self, upgrade: UpgradeId) -> bool {
        self.upgrades.contains(&upgrade)
    }
}

/// The active camera view changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraViewChanged {
    pub view: CameraView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeId {
    SignCardboardSign,
    CoolStyrofoamBox,
    StorExtraCrate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraView {
    Day,
    Simulation,
}
