// SPDX-License-Identifier: Apache-2.0
// Copyright Sriovgate Authors

//! The `SriovNodeState` custom resource.
//!
//! One object per machine, published by the node agent. The interesting
//! content is the discovered interface inventory under `status`; the
//! `spec` stanza is empty since the object is not user-authored.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired state of a node agent object. Nothing is configurable.
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "sriovgate.dev",
    version = "v1",
    kind = "SriovNodeState",
    plural = "sriovnodestates",
    namespaced,
    status = "SriovNodeStateStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct SriovNodeStateSpec {}

/// Hardware inventory reported by the node agent.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SriovNodeStateStatus {
    /// SR-IOV capable interfaces discovered on the machine.
    pub interfaces: Option<Vec<SriovInterface>>,
    /// Agent sync outcome, e.g. `Succeeded` or `Failed`.
    pub sync_status: Option<String>,
}

/// One discovered physical function and its capabilities.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SriovInterface {
    /// Kernel name of the physical function.
    pub name: Option<String>,
    /// MAC address of the physical function.
    pub mac: Option<String>,
    /// Kernel driver currently bound to the device.
    pub driver: Option<String>,
    /// PCI address of the physical function.
    pub pci_address: Option<String>,
    /// PCI vendor identifier, 4 hex digits.
    pub vendor: Option<String>,
    /// PCI device identifier, 4 hex digits.
    pub device_id: Option<String>,
    /// Current MTU.
    pub mtu: Option<u32>,
    /// VFs currently configured.
    pub num_vfs: Option<u32>,
    /// VF capacity advertised by the device.
    pub total_vfs: Option<u32>,
    /// Link layer reported by the device.
    pub link_type: Option<String>,
    /// Platform network tag for virtual deployments.
    pub net_filter: Option<String>,
}
