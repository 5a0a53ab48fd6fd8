// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Scan Contract
//!
//! The simulated scanner must behave like the external probe it stands in
//! for: bounded, in-subnet, and never contradicting current static records.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use cim_domain_dcim::{
    scan_candidates, CustomerId, CustomerRecord, DeviceId, DeviceRecord, SubnetDescriptor,
    SubnetPrefix,
};

fn subnet_strategy() -> impl Strategy<Value = SubnetDescriptor> {
    any::<[u8; 3]>()
        .prop_map(|octets| SubnetDescriptor::new(SubnetPrefix::from_octets(octets), None))
}

proptest! {
    /// Property: scan candidates honor the probe contract
    ///
    /// All candidates are in-subnet, non-reserved, unclaimed, within the
    /// requested bound, and free of duplicates.
    #[test]
    fn prop_scan_contract(
        subnet in subnet_strategy(),
        device_octets in prop::collection::vec(any::<u8>(), 0..15),
        customer_octets in prop::collection::vec(any::<u8>(), 0..15),
        limit in 0usize..20,
        seed in any::<u64>(),
    ) {
        let devices: Vec<DeviceRecord> = device_octets
            .iter()
            .enumerate()
            .map(|(i, o)| {
                DeviceRecord::new(DeviceId::new(format!("d-{i}")).unwrap(), subnet.address(*o))
            })
            .collect();
        let customers: Vec<CustomerRecord> = customer_octets
            .iter()
            .enumerate()
            .map(|(i, o)| {
                CustomerRecord::new(
                    CustomerId::new(format!("c-{i}")).unwrap(),
                    subnet.address(*o),
                )
            })
            .collect();

        let mut rng = StdRng::seed_from_u64(seed);
        let candidates = scan_candidates(&subnet, &devices, &customers, limit, &mut rng);

        prop_assert!(candidates.len() <= limit);

        let mut seen = std::collections::HashSet::new();
        for ip in &candidates {
            prop_assert!(subnet.prefix().contains(*ip));
            let octet = ip.octets()[3];
            prop_assert!(octet >= 2 && octet <= 254);
            prop_assert!(!devices.iter().any(|d| d.ip == *ip));
            prop_assert!(!customers.iter().any(|c| c.ip == *ip));
            prop_assert!(seen.insert(*ip), "duplicate candidate {}", ip);
        }
    }

    /// Property: a fully claimed subnet yields no candidates
    #[test]
    fn prop_saturated_subnet_scans_empty(seed in any::<u64>()) {
        let subnet = SubnetDescriptor::new(SubnetPrefix::new("10.9.9").unwrap(), None);
        let devices: Vec<DeviceRecord> = (2u8..=254)
            .map(|o| {
                DeviceRecord::new(DeviceId::new(format!("d-{o}")).unwrap(), subnet.address(o))
            })
            .collect();

        let mut rng = StdRng::seed_from_u64(seed);
        let candidates = scan_candidates(&subnet, &devices, &[], 10, &mut rng);
        prop_assert!(candidates.is_empty());
    }
}
