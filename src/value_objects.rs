// Copyright 2025 Cowboy AI, LLC.

//! DCIM Domain Value Objects
//!
//! These are the building blocks of the allocation domain model.
//! All value objects are immutable and validated on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::errors::{DcimError, DcimResult};

/// Total units in a standard rack
pub const RACK_TOTAL_UNITS: u8 = 42;

// ============================================================================
// Identity Value Objects
// ============================================================================

/// Unique identifier for devices (inventory-owned, opaque to this crate)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> DcimResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DcimError::InvalidDeviceId(
                "Device ID cannot be empty".into(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeviceId {
    type Err = DcimError;

    fn from_str(s: &str) -> DcimResult<Self> {
        Self::new(s)
    }
}

/// Unique identifier for customers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> DcimResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DcimError::InvalidCustomerId(
                "Customer ID cannot be empty".into(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CustomerId {
    type Err = DcimError;

    fn from_str(s: &str) -> DcimResult<Self> {
        Self::new(s)
    }
}

/// Unique identifier for active DHCP lease sessions
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> DcimResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DcimError::InvalidSessionId(
                "Session ID cannot be empty".into(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = DcimError;

    fn from_str(s: &str) -> DcimResult<Self> {
        Self::new(s)
    }
}

/// Unique identifier for racks
///
/// A rack is not a stored entity: it is derived as the set of devices whose
/// `rack_id` matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RackId(String);

impl RackId {
    pub fn new(id: impl Into<String>) -> DcimResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DcimError::InvalidRackId("Rack ID cannot be empty".into()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RackId {
    type Err = DcimError;

    fn from_str(s: &str) -> DcimResult<Self> {
        Self::new(s)
    }
}

// ============================================================================
// Subnet Value Objects
// ============================================================================

/// First three octets of a /24 network (e.g. `"10.0.0"`)
///
/// Invariants:
/// - Exactly three dot-separated decimal octets
/// - Canonical representation (no leading zeros survive parsing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubnetPrefix([u8; 3]);

impl SubnetPrefix {
    /// Parse a prefix from dotted form
    pub fn new(prefix: impl AsRef<str>) -> DcimResult<Self> {
        let prefix = prefix.as_ref();
        let mut octets = [0u8; 3];
        let mut parts = prefix.split('.');

        for slot in octets.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| DcimError::InvalidSubnetPrefix(prefix.to_string()))?;
            *slot = part
                .parse::<u8>()
                .map_err(|_| DcimError::InvalidSubnetPrefix(prefix.to_string()))?;
        }

        if parts.next().is_some() {
            return Err(DcimError::InvalidSubnetPrefix(prefix.to_string()));
        }

        Ok(Self(octets))
    }

    pub fn from_octets(octets: [u8; 3]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 3] {
        self.0
    }

    /// Complete the fourth octet into a full address
    pub fn address(&self, octet: u8) -> Ipv4Addr {
        Ipv4Addr::new(self.0[0], self.0[1], self.0[2], octet)
    }

    /// Whether `ip` lies inside this /24
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let [a, b, c, _] = ip.octets();
        [a, b, c] == self.0
    }

    /// Extract the host octet of an in-subnet address
    pub fn host_octet(&self, ip: Ipv4Addr) -> Option<u8> {
        self.contains(ip).then(|| ip.octets()[3])
    }
}

impl fmt::Display for SubnetPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0[0], self.0[1], self.0[2])
    }
}

impl FromStr for SubnetPrefix {
    type Err = DcimError;

    fn from_str(s: &str) -> DcimResult<Self> {
        Self::new(s)
    }
}

/// Inclusive octet range reserved for dynamic allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DhcpRange {
    start: u8,
    end: u8,
}

impl DhcpRange {
    pub fn new(start: u8, end: u8) -> DcimResult<Self> {
        if start > end {
            return Err(DcimError::InvalidDhcpRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u8 {
        self.start
    }

    pub fn end(&self) -> u8 {
        self.end
    }

    pub fn contains(&self, octet: u8) -> bool {
        octet >= self.start && octet <= self.end
    }
}

impl fmt::Display for DhcpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A /24 subnet and its optional dynamic-allocation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubnetDescriptor {
    prefix: SubnetPrefix,
    dhcp_range: Option<DhcpRange>,
}

impl SubnetDescriptor {
    pub fn new(prefix: SubnetPrefix, dhcp_range: Option<DhcpRange>) -> Self {
        Self { prefix, dhcp_range }
    }

    pub fn prefix(&self) -> SubnetPrefix {
        self.prefix
    }

    pub fn dhcp_range(&self) -> Option<DhcpRange> {
        self.dhcp_range
    }

    pub fn address(&self, octet: u8) -> Ipv4Addr {
        self.prefix.address(octet)
    }

    pub fn in_dhcp_range(&self, octet: u8) -> bool {
        self.dhcp_range.is_some_and(|r| r.contains(octet))
    }
}

impl fmt::Display for SubnetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.0/24", self.prefix)
    }
}

// ============================================================================
// Rack Value Objects
// ============================================================================

/// A single rack unit position, 1 (bottom) through 42 (top)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RackUnit(u8);

impl RackUnit {
    pub fn new(unit: u8) -> DcimResult<Self> {
        if unit == 0 || unit > RACK_TOTAL_UNITS {
            return Err(DcimError::InvalidRackUnit(unit));
        }
        Ok(Self(unit))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for RackUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U{}", self.0)
    }
}

/// Vertical size of a device in rack units
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UnitHeight(u8);

impl UnitHeight {
    pub fn new(height: u8) -> DcimResult<Self> {
        if height == 0 || height > RACK_TOTAL_UNITS {
            return Err(DcimError::InvalidUnitHeight(height));
        }
        Ok(Self(height))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for UnitHeight {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for UnitHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}U", self.0)
    }
}

/// Kind of rack-mountable device
///
/// Carries the nominal draw used for rack power aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    Server,
    Router,
    Switch,
    Firewall,
    UpsBattery,
    PatchPanel,
}

impl DeviceType {
    /// Nominal power draw, watts
    pub fn power_watts(&self) -> u32 {
        match self {
            DeviceType::Server => 250,
            DeviceType::Router => 80,
            DeviceType::Switch => 150,
            DeviceType::Firewall => 100,
            DeviceType::UpsBattery => 50,
            DeviceType::PatchPanel => 0,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Server => write!(f, "server"),
            DeviceType::Router => write!(f, "router"),
            DeviceType::Switch => write!(f, "switch"),
            DeviceType::Firewall => write!(f, "firewall"),
            DeviceType::UpsBattery => write!(f, "ups"),
            DeviceType::PatchPanel => write!(f, "patch-panel"),
        }
    }
}
