// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Machine and interface selectors.

use std::collections::{BTreeMap, BTreeSet};

use nic::pci::{DeviceId, PciAddress, VendorId};

use crate::vfrange::PfNameToken;

/// Label selector over machines.
///
/// Every pair must be present on a machine for it to match; the empty
/// selector matches every machine.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NodeSelector(BTreeMap<String, String>);

impl NodeSelector {
    /// True when every selector pair appears in `labels`.
    #[must_use]
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.0
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
    }

    /// True when the selector constrains nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of label pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl From<BTreeMap<String, String>> for NodeSelector {
    fn from(labels: BTreeMap<String, String>) -> NodeSelector {
        NodeSelector(labels)
    }
}

impl FromIterator<(String, String)> for NodeSelector {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> NodeSelector {
        NodeSelector(pairs.into_iter().collect())
    }
}

/// Filter over the physical interfaces of a machine.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NicSelector {
    /// Restrict to one vendor.
    pub vendor: Option<VendorId>,
    /// Restrict to one device model.
    pub device: Option<DeviceId>,
    /// PF name tokens, optionally range-suffixed. Kept raw: whether a
    /// token is well formed is ruled on during validation, not here.
    pub pf_names: Vec<String>,
    /// Restrict to specific PCI addresses.
    pub root_devices: BTreeSet<PciAddress>,
    /// Platform network tag to match in virtual deployments.
    pub net_filter: Option<String>,
}

impl NicSelector {
    /// True when no field constrains anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vendor.is_none()
            && self.device.is_none()
            && self.pf_names.is_empty()
            && self.root_devices.is_empty()
            && self.net_filter.is_none()
    }

    /// The PF names with any range suffix stripped.
    #[must_use]
    pub fn base_pf_names(&self) -> BTreeSet<&str> {
        self.pf_names
            .iter()
            .map(|token| PfNameToken::base_name(token))
            .collect()
    }
}
