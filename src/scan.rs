// Copyright 2025 Cowboy AI, LLC.

//! Rogue address scan port
//!
//! The scan is an external collaborator: input (subnet, known static records)
//! → output (candidate addresses). Results are best-effort and possibly
//! empty, never authoritative, and never mutate device or customer state;
//! they only feed the [`crate::ipam::RogueSet`] the classifier consumes.
//!
//! Candidate selection itself is a pure function ([`scan_candidates`]); the
//! async trait wraps it for collaborators with real latency. A production
//! system plugs a network probe in behind the same trait.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::debug;

use crate::errors::DcimResult;
use crate::ipam::{CustomerRecord, DeviceRecord};
use crate::value_objects::SubnetDescriptor;

/// Default upper bound on candidates per scan
pub const DEFAULT_SCAN_LIMIT: usize = 5;

/// One-shot probe for addresses in use without a matching static record
///
/// Contract: returned addresses lie inside the subnet, exclude the reserved
/// octets 0, 1, and 255, never coincide with a known device or customer
/// record, and never exceed the implementation's candidate bound. Fewer
/// candidates than the bound (including none) is a valid outcome; repeated
/// calls carry no ordering or idempotence guarantee.
#[async_trait]
pub trait RogueScan: Send + Sync {
    async fn scan(
        &self,
        subnet: &SubnetDescriptor,
        devices: &[DeviceRecord],
        customers: &[CustomerRecord],
    ) -> DcimResult<Vec<Ipv4Addr>>;
}

/// Select up to `limit` eligible candidate octets from `subnet`
///
/// Pure apart from the supplied RNG, which makes the selection reproducible
/// under a seeded generator.
pub fn scan_candidates(
    subnet: &SubnetDescriptor,
    devices: &[DeviceRecord],
    customers: &[CustomerRecord],
    limit: usize,
    rng: &mut impl Rng,
) -> Vec<Ipv4Addr> {
    let claimed: HashSet<Ipv4Addr> = devices
        .iter()
        .map(|d| d.ip)
        .chain(customers.iter().map(|c| c.ip))
        .collect();

    // Octets 2..=254: 0/1/255 are reserved by precedence and never rogue.
    let mut eligible: Vec<Ipv4Addr> = (2u8..=254)
        .map(|octet| subnet.address(octet))
        .filter(|ip| !claimed.contains(ip))
        .collect();

    eligible.shuffle(rng);
    eligible.truncate(limit);
    eligible
}

/// Stand-in for a real network probe
///
/// Produces synthetic candidates after a bounded simulated latency. One-shot
/// and cancel-safe: dropping the future leaves no state behind.
#[derive(Debug, Clone)]
pub struct SimulatedScanner {
    limit: usize,
    latency: Duration,
    seed: Option<u64>,
}

impl SimulatedScanner {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_SCAN_LIMIT,
            latency: Duration::from_millis(150),
            seed: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fix the RNG seed; used by tests for reproducible candidate sets
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for SimulatedScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RogueScan for SimulatedScanner {
    async fn scan(
        &self,
        subnet: &SubnetDescriptor,
        devices: &[DeviceRecord],
        customers: &[CustomerRecord],
    ) -> DcimResult<Vec<Ipv4Addr>> {
        tokio::time::sleep(self.latency).await;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let candidates = scan_candidates(subnet, devices, customers, self.limit, &mut rng);
        debug!(subnet = %subnet, count = candidates.len(), "simulated rogue scan complete");
        Ok(candidates)
    }
}
