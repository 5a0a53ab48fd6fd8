// Copyright 2025 Cowboy AI, LLC.

//! Rack Placement Engine
//!
//! Positions devices inside a 42U rack. A device anchors at its highest
//! occupied unit (`u_position`) and spans downward over `u_height` units;
//! mounted devices in one rack must occupy pairwise disjoint intervals inside
//! `[1, 42]`.
//!
//! Occupancy is recomputed per query over the current device snapshot, never
//! cached. Moves are validated live during a drag interaction and re-validated
//! with the same predicate at commit time: the snapshot may have changed
//! between the two calls (another operator, another session), so a prior
//! validation result is never trusted.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::errors::{DcimError, DcimResult};
use crate::intents::{PlacementIntent, UnmountIntent};
use crate::value_objects::{DeviceId, DeviceType, RackId, RackUnit, UnitHeight, RACK_TOTAL_UNITS};

/// BTU/hr per watt of continuous draw
const BTU_PER_WATT: f64 = 3.41;

// ============================================================================
// Device Placement
// ============================================================================

/// A rack-mountable device and its current placement
///
/// Mounted iff both `rack_id` and `u_position` are present. `u_position:
/// None` is the explicit unmounted sentinel; a device may keep its `rack_id`
/// while destaged. Construction enforces that a mounted span stays inside the
/// rack, so every `RackDevice` in circulation satisfies the placement
/// invariant individually (pairwise disjointness is the move validator's
/// job).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RackDevice {
    id: DeviceId,
    device_type: DeviceType,
    u_height: UnitHeight,
    rack_id: Option<RackId>,
    u_position: Option<RackUnit>,
}

impl RackDevice {
    /// A device not assigned to any rack
    pub fn new(id: DeviceId, device_type: DeviceType, u_height: UnitHeight) -> Self {
        Self {
            id,
            device_type,
            u_height,
            rack_id: None,
            u_position: None,
        }
    }

    /// A device staged in a rack but not mounted
    pub fn staged(
        id: DeviceId,
        device_type: DeviceType,
        u_height: UnitHeight,
        rack_id: RackId,
    ) -> Self {
        Self {
            id,
            device_type,
            u_height,
            rack_id: Some(rack_id),
            u_position: None,
        }
    }

    /// A mounted device; rejects anchors whose span would leave the rack
    pub fn mounted(
        id: DeviceId,
        device_type: DeviceType,
        u_height: UnitHeight,
        rack_id: RackId,
        u_position: RackUnit,
    ) -> DcimResult<Self> {
        if span_low(u_position, u_height) < 1 {
            return Err(DcimError::PlacementBelowRack {
                device_id: id.to_string(),
                top: u_position.get(),
                height: u_height.get(),
            });
        }
        Ok(Self {
            id,
            device_type,
            u_height,
            rack_id: Some(rack_id),
            u_position: Some(u_position),
        })
    }

    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn u_height(&self) -> UnitHeight {
        self.u_height
    }

    pub fn rack_id(&self) -> Option<&RackId> {
        self.rack_id.as_ref()
    }

    pub fn u_position(&self) -> Option<RackUnit> {
        self.u_position
    }

    pub fn is_mounted(&self) -> bool {
        self.rack_id.is_some() && self.u_position.is_some()
    }

    pub fn is_mounted_in(&self, rack_id: &RackId) -> bool {
        self.u_position.is_some() && self.rack_id.as_ref() == Some(rack_id)
    }

    /// Occupied units as an inclusive `(low, high)` pair, if mounted
    pub fn span(&self) -> Option<(u8, u8)> {
        let top = self.u_position?;
        Some((span_low(top, self.u_height) as u8, top.get()))
    }

    /// Whether this device's span covers `u`
    pub fn covers(&self, u: RackUnit) -> bool {
        match self.span() {
            Some((low, high)) => u.get() >= low && u.get() <= high,
            None => false,
        }
    }
}

fn span_low(top: RackUnit, height: UnitHeight) -> i16 {
    top.get() as i16 - height.get() as i16 + 1
}

// ============================================================================
// Occupancy Queries
// ============================================================================

/// The device whose span covers unit `u` of `rack_id`, if any
///
/// The disjointness invariant guarantees at most one match.
pub fn occupant_at<'a>(
    devices: &'a [RackDevice],
    rack_id: &RackId,
    u: RackUnit,
) -> Option<&'a RackDevice> {
    devices
        .iter()
        .find(|d| d.is_mounted_in(rack_id) && d.covers(u))
}

/// Devices mounted in `rack_id`
pub fn rack_devices<'a>(devices: &'a [RackDevice], rack_id: &RackId) -> Vec<&'a RackDevice> {
    devices.iter().filter(|d| d.is_mounted_in(rack_id)).collect()
}

/// Devices with no unit position, whether rack-staged or fully unassigned
///
/// Both kinds are equally eligible for mounting; no further business meaning
/// attaches to the difference.
pub fn unmounted_assets(devices: &[RackDevice]) -> Vec<&RackDevice> {
    devices.iter().filter(|d| d.u_position.is_none()).collect()
}

// ============================================================================
// Move Validation
// ============================================================================

/// Outcome of a placement check
///
/// `OutOfBounds` and `Collision` are expected, recoverable results of an
/// interactive placement attempt, not errors; the caller retries with a
/// different target and no engine-side cleanup is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveValidation {
    /// Target interval is inside the rack and unoccupied
    Fits,
    /// Span would extend below unit 1
    OutOfBounds {
        target_top: RackUnit,
        height: UnitHeight,
    },
    /// A different device already occupies part of the target interval
    Collision { blocking: DeviceId, unit: RackUnit },
}

impl MoveValidation {
    pub fn is_fits(&self) -> bool {
        matches!(self, MoveValidation::Fits)
    }
}

impl fmt::Display for MoveValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveValidation::Fits => write!(f, "fits"),
            MoveValidation::OutOfBounds { target_top, height } => write!(
                f,
                "out of bounds: {height} device at {target_top} extends below U1"
            ),
            MoveValidation::Collision { blocking, unit } => {
                write!(f, "collision with {blocking} at {unit}")
            }
        }
    }
}

/// Check whether `device` can occupy the interval anchored at `target_top`
/// in `target_rack`
///
/// The device itself is excluded from the collision check, so moving within
/// its own footprint validates as `Fits`. `target_top` being a [`RackUnit`]
/// already rules out anchors above U42.
pub fn validate_move(
    device: &RackDevice,
    target_rack: &RackId,
    target_top: RackUnit,
    devices: &[RackDevice],
) -> MoveValidation {
    let low = span_low(target_top, device.u_height);
    if low < 1 {
        return MoveValidation::OutOfBounds {
            target_top,
            height: device.u_height,
        };
    }
    let low = low as u8;
    let high = target_top.get();

    for other in devices {
        if other.id == device.id || !other.is_mounted_in(target_rack) {
            continue;
        }
        if let Some((other_low, other_high)) = other.span() {
            if low <= other_high && other_low <= high {
                // First unit of the overlap, for operator feedback. Overlap
                // units are valid rack units by construction.
                let unit = RackUnit::new(low.max(other_low)).unwrap_or(target_top);
                return MoveValidation::Collision {
                    blocking: other.id.clone(),
                    unit,
                };
            }
        }
    }

    MoveValidation::Fits
}

/// Commit a validated move
///
/// Re-runs [`validate_move`] against the snapshot supplied *now*; on `Fits`
/// returns the updated placement together with the intent for the
/// persistence collaborator. On rejection nothing is applied and the specific
/// violation is returned.
pub fn apply_move(
    device: &RackDevice,
    rack_id: &RackId,
    target_top: RackUnit,
    devices: &[RackDevice],
) -> DcimResult<(RackDevice, PlacementIntent)> {
    match validate_move(device, rack_id, target_top, devices) {
        MoveValidation::Fits => {
            let mut moved = device.clone();
            moved.rack_id = Some(rack_id.clone());
            moved.u_position = Some(target_top);
            info!(device = %moved.id, rack = %rack_id, top = %target_top, "placement committed");
            let intent = PlacementIntent::new(moved.id.clone(), rack_id.clone(), target_top);
            Ok((moved, intent))
        }
        MoveValidation::OutOfBounds { target_top, height } => {
            debug!(device = %device.id, %target_top, "move rejected: out of bounds");
            Err(DcimError::MoveOutOfBounds {
                device_id: device.id.to_string(),
                target_top: target_top.get(),
                height: height.get(),
            })
        }
        MoveValidation::Collision { blocking, unit } => {
            debug!(device = %device.id, %blocking, %unit, "move rejected: collision");
            Err(DcimError::MoveCollision {
                device_id: device.id.to_string(),
                blocking_id: blocking.to_string(),
                unit: unit.get(),
            })
        }
    }
}

// ============================================================================
// Unmount
// ============================================================================

/// How far to take a device off the rack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnmountMode {
    /// Clear the unit position, keep the device staged in its rack
    Destage,
    /// Clear both position and rack assignment
    Remove,
}

/// Take `device` off its mounted position
///
/// Always succeeds; unmounting an already-unmounted device is a no-op apart
/// from the intent it emits.
pub fn unmount(device: &RackDevice, mode: UnmountMode) -> (RackDevice, UnmountIntent) {
    let mut updated = device.clone();
    updated.u_position = None;
    if matches!(mode, UnmountMode::Remove) {
        updated.rack_id = None;
    }
    info!(device = %updated.id, ?mode, "device unmounted");
    let intent = UnmountIntent::new(updated.id.clone(), updated.rack_id.clone());
    (updated, intent)
}

// ============================================================================
// Aggregate Stats
// ============================================================================

/// Pure aggregation over one rack's mounted devices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RackStats {
    pub rack_id: RackId,
    pub used_units: u32,
    pub utilization_percent: u8,
    pub power_load_watts: u32,
    pub thermal_btu_hr: u32,
}

impl RackStats {
    pub fn compute(rack_id: &RackId, devices: &[RackDevice]) -> Self {
        let mounted: Vec<&RackDevice> = rack_devices(devices, rack_id);

        let used_units: u32 = mounted.iter().map(|d| d.u_height.get() as u32).sum();
        let power_load_watts: u32 = mounted.iter().map(|d| d.device_type.power_watts()).sum();

        Self {
            rack_id: rack_id.clone(),
            used_units,
            utilization_percent: ((used_units as f64 / RACK_TOTAL_UNITS as f64) * 100.0).round()
                as u8,
            power_load_watts,
            thermal_btu_hr: (power_load_watts as f64 * BTU_PER_WATT).round() as u32,
        }
    }
}
