// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! Typed descriptions of machines and the SR-IOV hardware they carry.

use std::collections::BTreeMap;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::pci::{DeviceId, PciAddress, VendorId};

/// One SR-IOV capable physical function on a machine.
#[derive(Builder, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct InterfaceDescriptor {
    /// Kernel name of the physical function.
    pub name: String,
    /// The vendor that manufactured the device.
    pub vendor: VendorId,
    /// The device model, scoped by `vendor`.
    pub device: DeviceId,
    /// Where the physical function sits on the PCI bus.
    pub pci_address: PciAddress,
    /// VF capacity advertised by the device.  Zero when the device does not
    /// expose `sriov_totalvfs`.
    #[builder(default)]
    #[serde(default)]
    pub total_vfs: u32,
    /// Platform network tag carried by virtual deployments.
    #[builder(default)]
    pub net_filter: Option<String>,
}

/// A machine that may host VF allocations.
#[derive(Builder, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct MachineDescriptor {
    /// Kubernetes node name.
    pub name: String,
    /// Labels carried by the node object.
    #[builder(default)]
    pub labels: BTreeMap<String, String>,
    /// Cloud provider identifier, e.g. `openstack:///<uuid>`.
    #[builder(default)]
    pub provider_id: Option<String>,
}

/// The SR-IOV inventory one machine reported.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct NodeState {
    /// Machine the inventory belongs to.
    pub node: String,
    /// Discovered physical functions.
    pub interfaces: Vec<InterfaceDescriptor>,
}
