//! Tests for the topology vocabulary shared with the placement engine.
//!
//! # Test Strategy
//!
//! 1. **Band normalization**: replica bands never allow zero distance
//! 2. **Address projection**: host:port round-trips through a resource id
//! 3. **Topology seam**: a trait object can be shared across threads

use std::sync::Arc;

use corelib::network::resource_of;
use corelib::{
    Distance, DistanceBand, HostAddr, ResourceId, TopologyMap, INFINITE_DISTANCE,
    NIC_RESOURCE_CLASS, ZERO_DISTANCE,
};
use proptest::prelude::*;

// ============================================================================
// Band Normalization
// ============================================================================

proptest! {
    #[test]
    fn replica_band_never_allows_zero_distance(min in any::<u16>(), max in any::<u16>()) {
        let band = DistanceBand::new(min, max).for_replicas();
        prop_assert!(band.min > ZERO_DISTANCE);
        prop_assert!(band.max > band.min || band.is_unbounded());
    }

    #[test]
    fn normalized_band_is_never_inverted(min in any::<u16>(), max in any::<u16>()) {
        let band = DistanceBand::new(min, max).normalized();
        prop_assert_eq!(band.min, min);
        if max > min {
            prop_assert_eq!(band.max, max);
        } else {
            prop_assert_eq!(band.max, INFINITE_DISTANCE);
        }
    }
}

#[test]
fn test_infinite_band_stays_unbounded() {
    let band = DistanceBand::new(INFINITE_DISTANCE - 1, INFINITE_DISTANCE).for_replicas();
    assert!(band.is_unbounded());
    assert_eq!(band.min, INFINITE_DISTANCE - 1);
}

// ============================================================================
// Address Projection
// ============================================================================

#[test]
fn test_address_round_trips_through_resource() {
    let addr = HostAddr::parse("store-7:6190").unwrap();
    let resource = addr.resource();
    assert_eq!(resource, resource_of("store-7:6190"));
    assert_eq!(HostAddr::join(&resource, addr.port()), addr);
}

// ============================================================================
// Topology Seam
// ============================================================================

/// Returns the pool prefix when the band admits distance one.
struct FlatTopology;

impl TopologyMap for FlatTopology {
    fn find_resources(
        &self,
        pool: &[ResourceId],
        _sources: &[ResourceId],
        resource_class: &str,
        count: usize,
        min: Distance,
        max: Distance,
    ) -> corelib::Result<Vec<ResourceId>> {
        if resource_class != NIC_RESOURCE_CLASS || !(min..=max).contains(&1) {
            return Err(corelib::Error::Topology("no resources in band".into()));
        }
        Ok(pool.iter().take(count).cloned().collect())
    }
}

#[test]
fn test_topology_map_is_shareable() {
    let map: Arc<dyn TopologyMap> = Arc::new(FlatTopology);
    let pool: Vec<ResourceId> = ["a", "b", "c"].into_iter().map(ResourceId::new).collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let map = Arc::clone(&map);
            let pool = pool.clone();
            std::thread::spawn(move || {
                map.find_resources(&pool, &[], NIC_RESOURCE_CLASS, 2, 1, INFINITE_DISTANCE)
            })
        })
        .collect();

    for handle in handles {
        let picked = handle.join().unwrap().unwrap();
        assert_eq!(picked, vec![ResourceId::new("a"), ResourceId::new("b")]);
    }

    assert!(map
        .find_resources(&pool, &[], NIC_RESOURCE_CLASS, 2, 2, 5)
        .is_err());
}
