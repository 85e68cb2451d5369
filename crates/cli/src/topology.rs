//! Label-path topology map.
//!
//! Each resource carries a location path such as `dc1/rack4/host17`. The
//! distance between two resources is the number of path levels below their
//! longest common prefix, so hosts in one rack are 1 apart, racks in one
//! datacenter 2 apart, and so on.

use std::collections::HashMap;

use corelib::{Distance, Error, ResourceId, TopologyMap, NIC_RESOURCE_CLASS, ZERO_DISTANCE};

/// Topology map over location paths, searched greedily in pool order.
#[derive(Debug, Clone, Default)]
pub struct LabelTopology {
    locations: HashMap<ResourceId, Vec<String>>,
}

impl LabelTopology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `resource` at a `/`-separated location path.
    pub fn insert(&mut self, resource: ResourceId, path: &str) {
        let labels = path
            .split('/')
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect();
        self.locations.insert(resource, labels);
    }

    pub fn distance(&self, a: &ResourceId, b: &ResourceId) -> corelib::Result<Distance> {
        if a == b {
            return Ok(ZERO_DISTANCE);
        }
        let la = self.location(a)?;
        let lb = self.location(b)?;
        let common = la.iter().zip(lb).take_while(|(x, y)| x == y).count();
        let depth = la.len().max(lb.len());
        // Distinct resources at the same path are still one hop apart.
        let hops = (depth - common).max(1);
        Ok(Distance::try_from(hops).unwrap_or(Distance::MAX))
    }

    fn location(&self, resource: &ResourceId) -> corelib::Result<&Vec<String>> {
        self.locations
            .get(resource)
            .ok_or_else(|| Error::Topology(format!("unknown resource {resource}")))
    }
}

impl TopologyMap for LabelTopology {
    fn find_resources(
        &self,
        pool: &[ResourceId],
        sources: &[ResourceId],
        resource_class: &str,
        count: usize,
        min: Distance,
        max: Distance,
    ) -> corelib::Result<Vec<ResourceId>> {
        if resource_class != NIC_RESOURCE_CLASS {
            return Err(Error::Topology(format!(
                "unsupported resource class {resource_class:?}"
            )));
        }
        let in_band = |d: Distance| (min..=max).contains(&d);

        let mut picked: Vec<ResourceId> = Vec::with_capacity(count);
        for candidate in pool {
            if picked.len() == count {
                break;
            }
            if picked.contains(candidate) {
                continue;
            }
            let anchors = if sources.is_empty() { &picked[..] } else { sources };
            let mut fits = true;
            for anchor in anchors {
                if !in_band(self.distance(candidate, anchor)?) {
                    fits = false;
                    break;
                }
            }
            if fits {
                picked.push(candidate.clone());
            }
        }

        if picked.len() != count {
            return Err(Error::Topology(format!(
                "found {} of {count} resources within [{min}, {max}]",
                picked.len()
            )));
        }
        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::INFINITE_DISTANCE;

    fn r(id: &str) -> ResourceId {
        ResourceId::new(id)
    }

    fn two_racks() -> LabelTopology {
        let mut topology = LabelTopology::new();
        topology.insert(r("h1"), "dc1/rack1/h1");
        topology.insert(r("h2"), "dc1/rack1/h2");
        topology.insert(r("h3"), "dc1/rack2/h3");
        topology.insert(r("h4"), "dc2/rack9/h4");
        topology
    }

    #[test]
    fn test_distances() {
        let topology = two_racks();
        assert_eq!(topology.distance(&r("h1"), &r("h1")).unwrap(), 0);
        assert_eq!(topology.distance(&r("h1"), &r("h2")).unwrap(), 1);
        assert_eq!(topology.distance(&r("h1"), &r("h3")).unwrap(), 2);
        assert_eq!(topology.distance(&r("h1"), &r("h4")).unwrap(), 3);
        assert!(topology.distance(&r("h1"), &r("nope")).is_err());
    }

    #[test]
    fn test_replica_separation() {
        let topology = two_racks();
        let pool = vec![r("h1"), r("h2"), r("h3"), r("h4")];

        let picked = topology
            .find_resources(&pool, &[], NIC_RESOURCE_CLASS, 2, 2, INFINITE_DISTANCE)
            .unwrap();
        assert_eq!(picked, vec![r("h1"), r("h3")]);

        let picked = topology
            .find_resources(&pool, &[], NIC_RESOURCE_CLASS, 3, 2, INFINITE_DISTANCE)
            .unwrap();
        assert_eq!(picked, vec![r("h1"), r("h3"), r("h4")]);

        assert!(topology
            .find_resources(&pool, &[], NIC_RESOURCE_CLASS, 3, 3, INFINITE_DISTANCE)
            .is_err());
    }

    #[test]
    fn test_source_constraint() {
        let topology = two_racks();
        let pool = vec![r("h2"), r("h3"), r("h4")];

        let picked = topology
            .find_resources(&pool, &[r("h1")], NIC_RESOURCE_CLASS, 1, 0, 1)
            .unwrap();
        assert_eq!(picked, vec![r("h2")]);
    }

    #[test]
    fn test_rejects_other_resource_classes() {
        let topology = two_racks();
        assert!(topology
            .find_resources(&[r("h1")], &[], "disk", 1, 0, INFINITE_DISTANCE)
            .is_err());
    }
}
