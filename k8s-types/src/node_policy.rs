// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! The `SriovNodePolicy` custom resource.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One VF allocation request: which machines it applies to, which physical
/// functions it claims, and how the allocated VFs must be configured.
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "sriovgate.dev",
    version = "v1",
    kind = "SriovNodePolicy",
    plural = "sriovnodepolicies",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct SriovNodePolicySpec {
    /// Resource-pool name the allocated VFs are exported under.
    pub resource_name: Option<String>,
    /// Label selector over machines; all pairs must match.
    pub node_selector: Option<BTreeMap<String, String>>,
    /// Precedence among policies claiming the same interface (0 wins).
    pub priority: Option<u32>,
    /// MTU to configure on the allocated VFs.
    pub mtu: Option<u32>,
    /// Number of VFs to create on each matched interface.
    pub num_vfs: Option<u32>,
    /// Filter over the physical interfaces of a selected machine.
    pub nic_selector: Option<SriovNicSelector>,
    /// Driver binding for the VFs: `netdevice` (default) or `vfio-pci`.
    pub device_type: Option<String>,
    /// Whether the VFs run in RDMA mode.
    pub is_rdma: Option<bool>,
    /// Link layer of the device: `eth` or `ib`.
    pub link_type: Option<String>,
    /// VF datapath acceleration mode: `none` (default) or `virtio`.
    pub vdpa_type: Option<String>,
    /// Embedded switch mode required on the device: `legacy` or `switchdev`.
    pub eswitch_mode: Option<String>,
}

/// Interface filter carried by [`SriovNodePolicySpec`]. Every set field
/// must match; PF names may carry a VF index sub-range (`ens1f0#2-5`).
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SriovNicSelector {
    /// PCI vendor identifier, 4 hex digits.
    pub vendor: Option<String>,
    /// PCI device identifier, 4 hex digits.
    pub device_id: Option<String>,
    /// Physical function names, optionally suffixed with a VF range.
    pub pf_names: Option<Vec<String>>,
    /// PCI addresses of acceptable physical functions.
    pub root_devices: Option<Vec<String>>,
    /// Platform network tag for virtual deployments.
    pub net_filter: Option<String>,
}
