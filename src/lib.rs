// Copyright 2025 Cowboy AI, LLC.

//! DCIM Allocation Domain Module
//!
//! This module implements the resource allocation core of a DCIM system: an
//! IP Address Management (IPAM) classifier over /24 subnets and a rack-unit
//! placement engine for 42U racks. Both are pure-computation, in-process
//! components queried by a rendering layer and backed by external record
//! collaborators.
//!
//! ## Architecture
//!
//! 1. **Stateless queries**: classification and occupancy are recomputed per
//!    query over immutable record snapshots; nothing is cached
//! 2. **Validated mutation**: the only writers are narrow, re-validating
//!    operations (`request_assign`, `apply_move`, `unmount`)
//! 3. **Intents, not writes**: accepted mutations return intent values for an
//!    external persistence collaborator; this crate never owns the records
//! 4. **Value Objects**: immutable, validated data types
//! 5. **Failures as values**: expected rejections are typed results, nothing
//!    here is fatal to the hosting process
//!
//! ## Key Concepts
//!
//! - **Address classification**: every octet of a /24 resolves to exactly one
//!   of reserved, statically assigned, leased, rogue, or free, by strict
//!   precedence
//! - **Rogue set**: transient scan results, owned by the caller and cleared
//!   on subnet switch
//! - **Rack placement**: top-anchored multi-U spans with pairwise disjoint
//!   intervals inside `[1, 42]`, validated before and at commit
//!
//! ## Usage
//!
//! ```rust
//! use cim_domain_dcim::*;
//!
//! // Classify an address
//! let subnet = SubnetDescriptor::new(SubnetPrefix::new("10.0.0")?, None);
//! let devices = [DeviceRecord::new(DeviceId::new("core-rtr")?, subnet.address(5))];
//! let records = AddressRecords::new(&devices, &[], &[]);
//! let rogues = RogueSet::for_subnet(subnet.prefix());
//!
//! assert!(classify(5, &subnet, records, &rogues).is_used());
//!
//! // Validate and commit a rack move
//! let rack = RackId::new("R1")?;
//! let device = RackDevice::new(DeviceId::new("sw-01")?, DeviceType::Switch, UnitHeight::new(1)?);
//! let (mounted, intent) = apply_move(&device, &rack, RackUnit::new(11)?, &[])?;
//! assert!(mounted.is_mounted_in(&rack));
//! assert_eq!(intent.u_position.get(), 11);
//! # Ok::<(), cim_domain_dcim::DcimError>(())
//! ```

pub mod errors;
pub mod intents;
pub mod ipam;
pub mod rack;
pub mod scan;
pub mod value_objects;

// Re-export commonly used types
pub use errors::{DcimError, DcimResult};
pub use intents::{AssignmentIntent, IntentId, PlacementIntent, UnmountIntent};
pub use ipam::{
    classify, classify_all, global_utilization, request_assign, used_count, utilization,
    AddressRecords, Classification, ClassificationSummary, CustomerRecord, DeviceRecord,
    FreeKind, LeaseSession, ReservedKind, RogueSet, StaticOwner, SUBNET_SIZE,
};
pub use rack::{
    apply_move, occupant_at, rack_devices, unmount, unmounted_assets, validate_move,
    MoveValidation, RackDevice, RackStats, UnmountMode,
};
pub use scan::{scan_candidates, RogueScan, SimulatedScanner, DEFAULT_SCAN_LIMIT};
pub use value_objects::{
    CustomerId, DeviceId, DeviceType, DhcpRange, RackId, RackUnit, SessionId, SubnetDescriptor,
    SubnetPrefix, UnitHeight, RACK_TOTAL_UNITS,
};
