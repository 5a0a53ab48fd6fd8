// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Rack Placement Engine
//!
//! Generates arbitrary non-overlapping rack layouts and proves that the move
//! validator can never be talked into introducing an overlap, that self-moves
//! always validate, and that occupancy lookups agree with device spans.

use proptest::prelude::*;

use cim_domain_dcim::{
    apply_move, occupant_at, validate_move, DeviceId, DeviceType, MoveValidation, RackDevice,
    RackId, RackUnit, UnitHeight, RACK_TOTAL_UNITS,
};

// ============================================================================
// Strategies
// ============================================================================

fn rack() -> RackId {
    RackId::new("R1").unwrap()
}

/// Build a valid layout from (gap, height) pairs, packing upward from unit 1
/// and discarding anything that would spill past the top.
fn layout_from_pairs(pairs: &[(u8, u8)]) -> Vec<RackDevice> {
    let mut devices = Vec::new();
    let mut next_low: u16 = 1;

    for (i, (gap, height)) in pairs.iter().enumerate() {
        let low = next_low + *gap as u16;
        let top = low + *height as u16 - 1;
        if top > RACK_TOTAL_UNITS as u16 {
            break;
        }
        devices.push(
            RackDevice::mounted(
                DeviceId::new(format!("dev-{i}")).unwrap(),
                DeviceType::Server,
                UnitHeight::new(*height).unwrap(),
                rack(),
                RackUnit::new(top as u8).unwrap(),
            )
            .expect("packed layout stays in bounds"),
        );
        next_low = top + 1;
    }

    devices
}

fn layout_strategy() -> impl Strategy<Value = Vec<RackDevice>> {
    prop::collection::vec((0u8..3, 1u8..=4), 1..12).prop_map(|pairs| layout_from_pairs(&pairs))
}

fn spans_disjoint(devices: &[RackDevice]) -> bool {
    let spans: Vec<(u8, u8)> = devices.iter().filter_map(|d| d.span()).collect();
    for (i, a) in spans.iter().enumerate() {
        for b in spans.iter().skip(i + 1) {
            if a.0 <= b.1 && b.0 <= a.1 {
                return false;
            }
        }
    }
    true
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: generated layouts satisfy the disjointness invariant
    ///
    /// Sanity check on the strategy itself.
    #[test]
    fn prop_layouts_are_disjoint(devices in layout_strategy()) {
        prop_assert!(spans_disjoint(&devices));
    }

    /// Property: a validated move never introduces an overlap
    ///
    /// If `validate_move` says `Fits`, committing the move keeps all spans
    /// pairwise disjoint.
    #[test]
    fn prop_fits_never_overlaps(
        devices in layout_strategy(),
        device_index in any::<prop::sample::Index>(),
        target_top in 1u8..=RACK_TOTAL_UNITS,
    ) {
        let mover = device_index.get(&devices).clone();
        let target = RackUnit::new(target_top).unwrap();

        if validate_move(&mover, &rack(), target, &devices).is_fits() {
            let (moved, _) = apply_move(&mover, &rack(), target, &devices)
                .expect("validated move commits");
            let mut after: Vec<RackDevice> = devices
                .iter()
                .filter(|d| d.id() != mover.id())
                .cloned()
                .collect();
            after.push(moved);
            prop_assert!(spans_disjoint(&after));
        }
    }

    /// Property: self-move idempotence
    ///
    /// Moving any mounted device onto its current anchor always fits.
    #[test]
    fn prop_self_move_fits(
        devices in layout_strategy(),
        device_index in any::<prop::sample::Index>(),
    ) {
        let mover = device_index.get(&devices);
        let current = mover.u_position().expect("layout devices are mounted");

        prop_assert_eq!(
            validate_move(mover, &rack(), current, &devices),
            MoveValidation::Fits
        );
    }

    /// Property: rejected targets are exactly the occupied-or-out-of-bounds
    /// ones
    ///
    /// For a fresh 1U device, `Fits` must coincide with "no occupant at the
    /// target unit".
    #[test]
    fn prop_single_unit_fit_matches_occupancy(
        devices in layout_strategy(),
        target_top in 1u8..=RACK_TOTAL_UNITS,
    ) {
        let newcomer = RackDevice::new(
            DeviceId::new("newcomer").unwrap(),
            DeviceType::Switch,
            UnitHeight::new(1).unwrap(),
        );
        let target = RackUnit::new(target_top).unwrap();

        let fits = validate_move(&newcomer, &rack(), target, &devices).is_fits();
        let occupied = occupant_at(&devices, &rack(), target).is_some();
        prop_assert_eq!(fits, !occupied);
    }

    /// Property: occupancy agrees with spans
    ///
    /// Every unit inside a device's span reports that device as occupant.
    #[test]
    fn prop_occupant_matches_span(devices in layout_strategy()) {
        for device in &devices {
            let (low, high) = device.span().expect("mounted");
            for unit in low..=high {
                let occupant = occupant_at(&devices, &rack(), RackUnit::new(unit).unwrap());
                prop_assert_eq!(occupant.map(|d| d.id()), Some(device.id()));
            }
        }
    }
}
