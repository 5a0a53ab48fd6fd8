// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Address Space Classifier
//!
//! These tests prove the properties the classifier contract promises for all
//! record snapshots: totality, exclusivity, determinism, precedence, and
//! monotonic utilization.

use proptest::prelude::*;

use cim_domain_dcim::{
    classify, used_count, AddressRecords, Classification, ClassificationSummary, CustomerId,
    CustomerRecord, DeviceId, DeviceRecord, DhcpRange, LeaseSession, RogueSet, SessionId,
    SubnetDescriptor, SubnetPrefix, SUBNET_SIZE,
};

// ============================================================================
// Strategies
// ============================================================================

fn subnet_strategy() -> impl Strategy<Value = SubnetDescriptor> {
    (any::<[u8; 3]>(), proptest::option::of((any::<u8>(), any::<u8>()))).prop_map(
        |(octets, range)| {
            let prefix = SubnetPrefix::from_octets(octets);
            let dhcp = range.map(|(a, b)| {
                let (start, end) = if a <= b { (a, b) } else { (b, a) };
                DhcpRange::new(start, end).expect("ordered bounds")
            });
            SubnetDescriptor::new(prefix, dhcp)
        },
    )
}

fn octet_set() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..20)
}

struct Snapshot {
    devices: Vec<DeviceRecord>,
    customers: Vec<CustomerRecord>,
    sessions: Vec<LeaseSession>,
}

fn snapshot(
    subnet: &SubnetDescriptor,
    device_octets: &[u8],
    customer_octets: &[u8],
    session_octets: &[u8],
) -> Snapshot {
    Snapshot {
        devices: device_octets
            .iter()
            .enumerate()
            .map(|(i, o)| {
                DeviceRecord::new(DeviceId::new(format!("d-{i}")).unwrap(), subnet.address(*o))
            })
            .collect(),
        customers: customer_octets
            .iter()
            .enumerate()
            .map(|(i, o)| {
                CustomerRecord::new(
                    CustomerId::new(format!("c-{i}")).unwrap(),
                    subnet.address(*o),
                )
            })
            .collect(),
        sessions: session_octets
            .iter()
            .enumerate()
            .map(|(i, o)| {
                LeaseSession::new(SessionId::new(format!("s-{i}")).unwrap(), subnet.address(*o))
            })
            .collect(),
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: classification is deterministic
    ///
    /// The same snapshot always yields the same classification.
    #[test]
    fn prop_classify_deterministic(
        subnet in subnet_strategy(),
        devices in octet_set(),
        customers in octet_set(),
        sessions in octet_set(),
        rogue_octets in octet_set(),
        octet in any::<u8>(),
    ) {
        let snap = snapshot(&subnet, &devices, &customers, &sessions);
        let records = AddressRecords::new(&snap.devices, &snap.customers, &snap.sessions);
        let mut rogues = RogueSet::for_subnet(subnet.prefix());
        let rogue_ips: Vec<_> = rogue_octets.iter().map(|o| subnet.address(*o)).collect();
        rogues.absorb(&rogue_ips);

        let first = classify(octet, &subnet, records, &rogues);
        let second = classify(octet, &subnet, records, &rogues);
        prop_assert_eq!(first, second);
    }

    /// Property: totality and exclusivity
    ///
    /// Every octet resolves to exactly one category, so the per-category
    /// counts always sum to the size of the space.
    #[test]
    fn prop_summary_totals_space(
        subnet in subnet_strategy(),
        devices in octet_set(),
        customers in octet_set(),
        sessions in octet_set(),
        rogue_octets in octet_set(),
    ) {
        let snap = snapshot(&subnet, &devices, &customers, &sessions);
        let records = AddressRecords::new(&snap.devices, &snap.customers, &snap.sessions);
        let mut rogues = RogueSet::for_subnet(subnet.prefix());
        let rogue_ips: Vec<_> = rogue_octets.iter().map(|o| subnet.address(*o)).collect();
        rogues.absorb(&rogue_ips);

        let summary = ClassificationSummary::compute(&subnet, records, &rogues);
        prop_assert_eq!(summary.total(), SUBNET_SIZE);
    }

    /// Property: reserved octets outrank every record claim
    #[test]
    fn prop_reserved_octets_always_reserved(
        subnet in subnet_strategy(),
        devices in octet_set(),
        customers in octet_set(),
        sessions in octet_set(),
        reserved in prop_oneof![Just(0u8), Just(1u8), Just(255u8)],
    ) {
        let snap = snapshot(&subnet, &devices, &customers, &sessions);
        let records = AddressRecords::new(&snap.devices, &snap.customers, &snap.sessions);
        let rogues = RogueSet::for_subnet(subnet.prefix());

        prop_assert!(matches!(
            classify(reserved, &subnet, records, &rogues),
            Classification::Reserved(_)
        ));
    }

    /// Property: a device record always outranks customer and session claims
    /// on non-reserved octets
    #[test]
    fn prop_device_claim_wins(
        subnet in subnet_strategy(),
        customers in octet_set(),
        sessions in octet_set(),
        octet in 2u8..=254,
    ) {
        let mut snap = snapshot(&subnet, &[], &customers, &sessions);
        snap.devices.push(DeviceRecord::new(
            DeviceId::new("claimant").unwrap(),
            subnet.address(octet),
        ));
        let records = AddressRecords::new(&snap.devices, &snap.customers, &snap.sessions);
        let rogues = RogueSet::for_subnet(subnet.prefix());

        prop_assert!(matches!(
            classify(octet, &subnet, records, &rogues),
            Classification::StaticAssigned(_)
        ));
    }

    /// Property: adding one static assignment never decreases used_count,
    /// and removing it never increases it
    #[test]
    fn prop_used_count_monotonic(
        subnet in subnet_strategy(),
        devices in octet_set(),
        added in any::<u8>(),
    ) {
        let snap = snapshot(&subnet, &devices, &[], &[]);
        let before = used_count(&subnet, AddressRecords::new(&snap.devices, &[], &[]));

        let mut grown = snap.devices.clone();
        grown.push(DeviceRecord::new(
            DeviceId::new("extra").unwrap(),
            subnet.address(added),
        ));
        let after = used_count(&subnet, AddressRecords::new(&grown, &[], &[]));

        prop_assert!(after >= before);
        prop_assert!(after <= before + 1);
    }
}
