// Copyright 2025 Cowboy AI, LLC.

//! Error types for the DCIM allocation domain
//!
//! Two kinds of failure live here. Precondition violations (malformed
//! prefixes, out-of-range units, empty identifiers) are programming errors
//! surfaced loudly at value-object construction. Rejected intents
//! (`NonAssignableAddress`, `MoveOutOfBounds`, `MoveCollision`) are expected
//! runtime outcomes that the hosting layer presents to the operator.
//!
//! Interactive validation uses [`crate::rack::MoveValidation`] instead of an
//! error type; only the commit path converts a rejection into a `DcimError`.

use std::net::Ipv4Addr;
use thiserror::Error;

/// Errors that can occur in DCIM allocation operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DcimError {
    /// Subnet prefix is not three dotted octets
    #[error("Invalid subnet prefix: {0} (expected three dotted octets, e.g. \"10.0.0\")")]
    InvalidSubnetPrefix(String),

    /// DHCP range start exceeds end
    #[error("Invalid DHCP range: start {start} > end {end}")]
    InvalidDhcpRange { start: u8, end: u8 },

    /// Invalid device ID
    #[error("Invalid device ID: {0}")]
    InvalidDeviceId(String),

    /// Invalid customer ID
    #[error("Invalid customer ID: {0}")]
    InvalidCustomerId(String),

    /// Invalid session ID
    #[error("Invalid session ID: {0}")]
    InvalidSessionId(String),

    /// Invalid rack ID
    #[error("Invalid rack ID: {0}")]
    InvalidRackId(String),

    /// Rack unit outside the rack
    #[error("Invalid rack unit: {0} (must be 1-42)")]
    InvalidRackUnit(u8),

    /// Device height outside the rack
    #[error("Invalid unit height: {0} (must be 1-42)")]
    InvalidUnitHeight(u8),

    /// Mounting would place part of the device below unit 1
    #[error("Device {device_id} does not fit: a {height}U device anchored at unit {top} would extend below unit 1")]
    PlacementBelowRack {
        device_id: String,
        top: u8,
        height: u8,
    },

    /// Assignment intent requested for an address that is not Free or Rogue
    #[error("Address {ip} is not assignable: currently {classification}")]
    NonAssignableAddress { ip: Ipv4Addr, classification: String },

    /// Move rejected: target span extends below unit 1
    #[error("Cannot move device {device_id} to unit {target_top}: a {height}U device would extend below unit 1")]
    MoveOutOfBounds {
        device_id: String,
        target_top: u8,
        height: u8,
    },

    /// Move rejected: target units already occupied by another device
    #[error("Cannot move device {device_id}: unit {unit} is occupied by device {blocking_id}")]
    MoveCollision {
        device_id: String,
        blocking_id: String,
        unit: u8,
    },

    /// Rogue scan failed in the external probe
    #[error("Rogue scan failed: {0}")]
    ScanFailed(String),
}

/// Result type for DCIM allocation operations
pub type DcimResult<T> = Result<T, DcimError>;
