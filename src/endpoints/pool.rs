//! Ready / not-ready address pools of one endpoint subset.
//!
//! # Responsibilities
//! - Hold an in-memory copy of a subset's two address lists
//! - Move address records between the lists (enable / disable)
//! - Report the current classification for diffing
//! - Write the pools back into the subset before persisting
//!
//! # Design Decisions
//! - Records are moved whole; hostname, nodeName and targetRef are carried along untouched
//! - A moved record is appended to the end of its destination list
//! - Remaining records keep their relative order

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{EndpointAddress, EndpointSubset};

use crate::endpoints::diff::{Classification, Mutation};

/// The two disjoint address lists of an endpoint subset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressPool {
    ready: Vec<EndpointAddress>,
    not_ready: Vec<EndpointAddress>,
}

impl AddressPool {
    pub fn new(ready: Vec<EndpointAddress>, not_ready: Vec<EndpointAddress>) -> Self {
        Self { ready, not_ready }
    }

    /// Copy the address lists out of a subset.
    pub fn from_subset(subset: &EndpointSubset) -> Self {
        Self {
            ready: subset.addresses.clone().unwrap_or_default(),
            not_ready: subset.not_ready_addresses.clone().unwrap_or_default(),
        }
    }

    /// Store the pools back into `subset`, leaving its ports alone.
    ///
    /// Empty lists are written as absent, the way the API server returns them.
    pub fn write_into(self, subset: &mut EndpointSubset) {
        subset.addresses = non_empty(self.ready);
        subset.not_ready_addresses = non_empty(self.not_ready);
    }

    pub fn ready(&self) -> &[EndpointAddress] {
        &self.ready
    }

    pub fn not_ready(&self) -> &[EndpointAddress] {
        &self.not_ready
    }

    /// Map every address to whether it currently sits in the ready pool.
    ///
    /// Should an ip appear in both pools, the not-ready entry wins.
    pub fn classification(&self) -> Classification {
        let mut current = BTreeMap::new();
        for address in &self.ready {
            current.insert(address.ip.clone(), true);
        }
        for address in &self.not_ready {
            current.insert(address.ip.clone(), false);
        }
        Classification::from(current)
    }

    /// Move `ip` from ready to not-ready. Returns false if it was not ready.
    pub fn disable(&mut self, ip: &str) -> bool {
        move_address(&mut self.ready, &mut self.not_ready, ip)
    }

    /// Move `ip` from not-ready to ready. Returns false if it was not in not-ready.
    pub fn enable(&mut self, ip: &str) -> bool {
        move_address(&mut self.not_ready, &mut self.ready, ip)
    }

    /// Apply one mutation, returning whether a record actually moved.
    pub fn apply(&mut self, mutation: &Mutation) -> bool {
        match mutation {
            Mutation::Disable(ip) => self.disable(ip),
            Mutation::Enable(ip) => self.enable(ip),
        }
    }
}

fn move_address(from: &mut Vec<EndpointAddress>, to: &mut Vec<EndpointAddress>, ip: &str) -> bool {
    let (moved, kept): (Vec<_>, Vec<_>) = std::mem::take(from)
        .into_iter()
        .partition(|address| address.ip == ip);

    *from = kept;
    let found = !moved.is_empty();
    to.extend(moved);
    found
}

fn non_empty(addresses: Vec<EndpointAddress>) -> Option<Vec<EndpointAddress>> {
    if addresses.is_empty() {
        None
    } else {
        Some(addresses)
    }
}
