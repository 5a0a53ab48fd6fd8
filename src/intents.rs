// Copyright 2025 Cowboy AI, LLC.

//! Outbound intents
//!
//! The core never writes records. Validated mutations are expressed as
//! intent values handed to the external persistence collaborator, which
//! performs the actual write and owns conflict resolution across concurrent
//! operators. Every intent carries an id and a timestamp so the collaborator
//! can correlate and order them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use uuid::Uuid;

use crate::value_objects::{DeviceId, RackId, RackUnit};

/// Unique identifier for an outbound intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentId(Uuid);

impl IntentId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for IntentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IntentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request to create a static address record at `ip`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentIntent {
    pub intent_id: IntentId,
    pub ip: Ipv4Addr,
    pub requested_at: DateTime<Utc>,
}

impl AssignmentIntent {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            intent_id: IntentId::new(),
            ip,
            requested_at: Utc::now(),
        }
    }

    /// Wire form for the persistence collaborator
    pub fn to_payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Request to mount or relocate a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementIntent {
    pub intent_id: IntentId,
    pub device_id: DeviceId,
    pub rack_id: RackId,
    pub u_position: RackUnit,
    pub requested_at: DateTime<Utc>,
}

impl PlacementIntent {
    pub fn new(device_id: DeviceId, rack_id: RackId, u_position: RackUnit) -> Self {
        Self {
            intent_id: IntentId::new(),
            device_id,
            rack_id,
            u_position,
            requested_at: Utc::now(),
        }
    }

    pub fn to_payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Request to take a device off its rack position
///
/// `rack_id` is the rack the device remains staged in, `None` when the device
/// is removed from the rack entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmountIntent {
    pub intent_id: IntentId,
    pub device_id: DeviceId,
    pub rack_id: Option<RackId>,
    pub requested_at: DateTime<Utc>,
}

impl UnmountIntent {
    pub fn new(device_id: DeviceId, rack_id: Option<RackId>) -> Self {
        Self {
            intent_id: IntentId::new(),
            device_id,
            rack_id,
            requested_at: Utc::now(),
        }
    }

    pub fn to_payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
