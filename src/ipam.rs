// Copyright 2025 Cowboy AI, LLC.

//! Address Space Classifier
//!
//! Classifies every address of a /24 subnet into exactly one category by
//! cross-referencing device, customer, and lease records against a strict
//! precedence order. Classification is a pure function of the inputs: it is
//! recomputed on every query over immutable record snapshots and owns no
//! state. The only transient piece is the [`RogueSet`], which callers own and
//! pass in explicitly.
//!
//! Precedence, first match wins:
//!
//! 1. Octet 0 → network address
//! 2. Octet 1 → gateway
//! 3. Octet 255 → broadcast
//! 4. Device static record
//! 5. Customer static record
//! 6. Active lease session
//! 7. Rogue scan result
//! 8. Free (DHCP pool or static pool)

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;
use tracing::debug;

use crate::errors::{DcimError, DcimResult};
use crate::intents::AssignmentIntent;
use crate::value_objects::{CustomerId, DeviceId, SessionId, SubnetDescriptor, SubnetPrefix};

/// Number of addresses in a /24
pub const SUBNET_SIZE: usize = 256;

// ============================================================================
// Input Records (owned by external collaborators, read-only here)
// ============================================================================

/// A device with a statically assigned management address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: DeviceId,
    pub ip: Ipv4Addr,
}

impl DeviceRecord {
    pub fn new(id: DeviceId, ip: Ipv4Addr) -> Self {
        Self { id, ip }
    }
}

/// A customer with a statically assigned service address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub ip: Ipv4Addr,
}

impl CustomerRecord {
    pub fn new(id: CustomerId, ip: Ipv4Addr) -> Self {
        Self { id, ip }
    }
}

/// An active dynamically leased session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseSession {
    pub id: SessionId,
    pub ip: Ipv4Addr,
}

impl LeaseSession {
    pub fn new(id: SessionId, ip: Ipv4Addr) -> Self {
        Self { id, ip }
    }
}

/// Borrowed snapshot of all address-bearing records
///
/// Passed by reference into the stateless query functions so that a whole
/// render pass observes one consistent snapshot.
#[derive(Debug, Clone, Copy)]
pub struct AddressRecords<'a> {
    pub devices: &'a [DeviceRecord],
    pub customers: &'a [CustomerRecord],
    pub sessions: &'a [LeaseSession],
}

impl<'a> AddressRecords<'a> {
    pub fn new(
        devices: &'a [DeviceRecord],
        customers: &'a [CustomerRecord],
        sessions: &'a [LeaseSession],
    ) -> Self {
        Self {
            devices,
            customers,
            sessions,
        }
    }

    fn device_at(&self, ip: Ipv4Addr) -> Option<&'a DeviceRecord> {
        self.devices.iter().find(|d| d.ip == ip)
    }

    fn customer_at(&self, ip: Ipv4Addr) -> Option<&'a CustomerRecord> {
        self.customers.iter().find(|c| c.ip == ip)
    }

    fn session_at(&self, ip: Ipv4Addr) -> Option<&'a LeaseSession> {
        self.sessions.iter().find(|s| s.ip == ip)
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Why an address is reserved by convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservedKind {
    Network,
    Gateway,
    Broadcast,
}

/// Which pool a free address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FreeKind {
    Dhcp,
    Static,
}

/// Holder of a static assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaticOwner {
    Device(DeviceId),
    Customer(CustomerId),
}

/// Derived category of one address; never stored, recomputed per query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Reserved(ReservedKind),
    StaticAssigned(StaticOwner),
    Leased(SessionId),
    Rogue,
    Free(FreeKind),
}

impl Classification {
    /// Counted as consumed in utilization figures
    pub fn is_used(&self) -> bool {
        matches!(
            self,
            Classification::Reserved(_)
                | Classification::StaticAssigned(_)
                | Classification::Leased(_)
        )
    }

    /// Eligible for a new static assignment intent
    pub fn is_assignable(&self) -> bool {
        matches!(self, Classification::Free(_) | Classification::Rogue)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Reserved(ReservedKind::Network) => write!(f, "reserved (network)"),
            Classification::Reserved(ReservedKind::Gateway) => write!(f, "reserved (gateway)"),
            Classification::Reserved(ReservedKind::Broadcast) => {
                write!(f, "reserved (broadcast)")
            }
            Classification::StaticAssigned(StaticOwner::Device(id)) => {
                write!(f, "static (device {id})")
            }
            Classification::StaticAssigned(StaticOwner::Customer(id)) => {
                write!(f, "static (customer {id})")
            }
            Classification::Leased(id) => write!(f, "leased (session {id})"),
            Classification::Rogue => write!(f, "rogue"),
            Classification::Free(FreeKind::Dhcp) => write!(f, "free (dhcp pool)"),
            Classification::Free(FreeKind::Static) => write!(f, "free (static pool)"),
        }
    }
}

// ============================================================================
// Rogue Set
// ============================================================================

/// Transient scan results for one subnet
///
/// Session-scoped and never persisted. Retargeting to a different subnet
/// clears the set, so stale candidates from a previous subnet can never leak
/// into classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RogueSet {
    prefix: SubnetPrefix,
    octets: BTreeSet<u8>,
}

impl RogueSet {
    pub fn for_subnet(prefix: SubnetPrefix) -> Self {
        Self {
            prefix,
            octets: BTreeSet::new(),
        }
    }

    pub fn prefix(&self) -> SubnetPrefix {
        self.prefix
    }

    /// Point the set at `prefix`, dropping all candidates if it differs
    pub fn retarget(&mut self, prefix: SubnetPrefix) {
        if self.prefix != prefix {
            debug!(old = %self.prefix, new = %prefix, "rogue set retargeted, clearing");
            self.prefix = prefix;
            self.octets.clear();
        }
    }

    /// Fold scan results in; addresses outside the subnet are ignored
    pub fn absorb(&mut self, candidates: &[Ipv4Addr]) {
        for ip in candidates {
            if let Some(octet) = self.prefix.host_octet(*ip) {
                self.octets.insert(octet);
            }
        }
    }

    pub fn contains(&self, octet: u8) -> bool {
        self.octets.contains(&octet)
    }

    pub fn clear(&mut self) {
        self.octets.clear();
    }

    pub fn len(&self) -> usize {
        self.octets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.octets.is_empty()
    }

    pub fn addresses(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.octets.iter().map(|o| self.prefix.address(*o))
    }

    fn applies_to(&self, subnet: &SubnetDescriptor) -> bool {
        self.prefix == subnet.prefix()
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Classify one octet of `subnet`
///
/// Total over the whole `u8` domain and deterministic for a given snapshot;
/// exactly one category holds per address.
pub fn classify(
    octet: u8,
    subnet: &SubnetDescriptor,
    records: AddressRecords<'_>,
    rogues: &RogueSet,
) -> Classification {
    match octet {
        0 => return Classification::Reserved(ReservedKind::Network),
        1 => return Classification::Reserved(ReservedKind::Gateway),
        255 => return Classification::Reserved(ReservedKind::Broadcast),
        _ => {}
    }

    let ip = subnet.address(octet);

    if let Some(device) = records.device_at(ip) {
        return Classification::StaticAssigned(StaticOwner::Device(device.id.clone()));
    }
    if let Some(customer) = records.customer_at(ip) {
        return Classification::StaticAssigned(StaticOwner::Customer(customer.id.clone()));
    }
    if let Some(session) = records.session_at(ip) {
        return Classification::Leased(session.id.clone());
    }
    if rogues.applies_to(subnet) && rogues.contains(octet) {
        return Classification::Rogue;
    }

    if subnet.in_dhcp_range(octet) {
        Classification::Free(FreeKind::Dhcp)
    } else {
        Classification::Free(FreeKind::Static)
    }
}

/// Classify the full 256-address space, indexed by octet
///
/// The per-slot form the rendering layer consumes for its address grid.
pub fn classify_all(
    subnet: &SubnetDescriptor,
    records: AddressRecords<'_>,
    rogues: &RogueSet,
) -> Vec<Classification> {
    (0..SUBNET_SIZE)
        .map(|octet| classify(octet as u8, subnet, records, rogues))
        .collect()
}

/// Addresses counted as consumed: reserved, statically assigned, or leased
pub fn used_count(subnet: &SubnetDescriptor, records: AddressRecords<'_>) -> usize {
    let no_rogues = RogueSet::for_subnet(subnet.prefix());
    (0..SUBNET_SIZE)
        .filter(|octet| classify(*octet as u8, subnet, records, &no_rogues).is_used())
        .count()
}

/// Percent of the subnet consumed, rounded to the nearest whole percent
pub fn utilization(subnet: &SubnetDescriptor, records: AddressRecords<'_>) -> u8 {
    percent(used_count(subnet, records), SUBNET_SIZE)
}

/// Utilization across all configured subnets; 0 when none are configured
pub fn global_utilization(subnets: &[SubnetDescriptor], records: AddressRecords<'_>) -> u8 {
    if subnets.is_empty() {
        return 0;
    }
    let used: usize = subnets.iter().map(|s| used_count(s, records)).sum();
    percent(used, SUBNET_SIZE * subnets.len())
}

fn percent(part: usize, whole: usize) -> u8 {
    ((part as f64 / whole as f64) * 100.0).round() as u8
}

/// Per-category counts over one subnet, for the dashboard legend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub reserved: usize,
    pub static_assigned: usize,
    pub leased: usize,
    pub rogue: usize,
    pub free_dhcp: usize,
    pub free_static: usize,
}

impl ClassificationSummary {
    pub fn compute(
        subnet: &SubnetDescriptor,
        records: AddressRecords<'_>,
        rogues: &RogueSet,
    ) -> Self {
        let mut summary = Self {
            reserved: 0,
            static_assigned: 0,
            leased: 0,
            rogue: 0,
            free_dhcp: 0,
            free_static: 0,
        };

        for octet in 0..SUBNET_SIZE {
            match classify(octet as u8, subnet, records, rogues) {
                Classification::Reserved(_) => summary.reserved += 1,
                Classification::StaticAssigned(_) => summary.static_assigned += 1,
                Classification::Leased(_) => summary.leased += 1,
                Classification::Rogue => summary.rogue += 1,
                Classification::Free(FreeKind::Dhcp) => summary.free_dhcp += 1,
                Classification::Free(FreeKind::Static) => summary.free_static += 1,
            }
        }

        summary
    }

    pub fn total(&self) -> usize {
        self.reserved
            + self.static_assigned
            + self.leased
            + self.rogue
            + self.free_dhcp
            + self.free_static
    }
}

// ============================================================================
// Mutation Surface
// ============================================================================

/// Request a static assignment of `octet` in `subnet`
///
/// Only `Free` and `Rogue` addresses are assignable. The returned intent is
/// handed to the external inventory collaborator; nothing is written here,
/// and a rejected request has no side effect.
pub fn request_assign(
    octet: u8,
    subnet: &SubnetDescriptor,
    records: AddressRecords<'_>,
    rogues: &RogueSet,
) -> DcimResult<AssignmentIntent> {
    let classification = classify(octet, subnet, records, rogues);
    let ip = subnet.address(octet);

    if !classification.is_assignable() {
        return Err(DcimError::NonAssignableAddress {
            ip,
            classification: classification.to_string(),
        });
    }

    debug!(%ip, %classification, "assignment intent issued");
    Ok(AssignmentIntent::new(ip))
}
